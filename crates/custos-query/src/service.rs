//! Read-only query surface over committed audit entries.

use std::sync::Arc;

use tracing::debug;

use custos_contracts::{
    AuditError, AuditLogEntry, AuditResult, EntryFilter, EntryHash, EntryPage, PageRequest,
    QueryConfig, TenantId,
};
use custos_store::ChainStore;

/// Serves filtered, paginated reads for audit and observability UIs.
///
/// Strictly read-only and tenant-scoped: every call names a tenant and
/// sees that tenant's chain only.  Page limits are clamped here so a
/// caller can never pull an unbounded result set through the public
/// surface.
pub struct QueryService {
    store: Arc<dyn ChainStore>,
    config: QueryConfig,
}

impl QueryService {
    pub fn new(store: Arc<dyn ChainStore>, config: QueryConfig) -> Self {
        Self { store, config }
    }

    /// List `tenant`'s entries matching `filter`, one page at a time.
    ///
    /// A zero or absent limit falls back to the configured default page
    /// size; anything larger than `max_page_size` is clamped down.  The
    /// returned page carries the cursor for the next call, or `None`
    /// when the listing is exhausted.
    pub fn list(
        &self,
        tenant: &TenantId,
        filter: &EntryFilter,
        page: &PageRequest,
    ) -> AuditResult<EntryPage> {
        let clamped = PageRequest {
            order: page.order,
            cursor: page.cursor,
            limit: self.clamp_limit(page.limit),
        };
        debug!(
            tenant_id = %tenant,
            limit = clamped.limit,
            cursor = ?clamped.cursor,
            "listing audit entries"
        );
        self.store.list(tenant, filter, &clamped)
    }

    /// Fetch a single entry by its hash, e.g. to follow a `prev_hash`
    /// link from an entry already on screen.
    pub fn get_by_hash(
        &self,
        tenant: &TenantId,
        hash: &EntryHash,
    ) -> AuditResult<AuditLogEntry> {
        self.store
            .get_by_hash(tenant, hash)?
            .ok_or_else(|| AuditError::NotFound {
                what: format!("audit entry with hash '{hash}' for tenant '{tenant}'"),
            })
    }

    fn clamp_limit(&self, requested: usize) -> usize {
        if requested == 0 {
            self.config.default_page_size
        } else {
            requested.min(self.config.max_page_size)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
