//! The append service: validate, link, hash, commit.
//!
//! Appending is the only operation that must be serialized per tenant.
//! The service uses optimistic concurrency: build the entry against a
//! just-read head and let the store's sequence constraint reject the
//! insert if another writer got there first, then retry against a fresh
//! head.  Retries are bounded — exhaustion surfaces `ChainContention`
//! instead of waiting indefinitely.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};

use custos_canonical::{canonical_timestamp, hash_entry};
use custos_contracts::{
    AppendConfig, AppendRequest, AuditError, AuditLogEntry, AuditResult, EntryHash, EntryId,
    TenantId,
};
use custos_store::ChainStore;

use crate::validate::validate;

/// Accepts audit events from business modules and commits them to the
/// tenant's hash chain.
///
/// The store is an injected dependency shared with the verification and
/// query services.  The service itself is stateless; wrap it in an `Arc`
/// to share across writer threads.
pub struct AppendService {
    store: Arc<dyn ChainStore>,
    config: AppendConfig,
}

impl AppendService {
    pub fn new(store: Arc<dyn ChainStore>, config: AppendConfig) -> Self {
        Self { store, config }
    }

    /// Append one audit event to `tenant`'s chain.
    ///
    /// Either a fully linked, correctly hashed entry is committed and
    /// returned, or nothing is — there is no partial success state.
    ///
    /// Fails with `Validation` before touching storage on a malformed
    /// payload, and with `ChainContention` when the per-tenant race is
    /// lost more than the configured number of times.
    pub fn append(
        &self,
        tenant: &TenantId,
        request: AppendRequest,
    ) -> AuditResult<AuditLogEntry> {
        self.append_by(tenant, request, None)
    }

    /// Like [`append`](Self::append), aborting with `DeadlineExceeded`
    /// once `deadline` has passed.  The deadline is checked between
    /// attempts; an in-flight storage call is never abandoned halfway.
    pub fn append_by(
        &self,
        tenant: &TenantId,
        request: AppendRequest,
        deadline: Option<Instant>,
    ) -> AuditResult<AuditLogEntry> {
        validate(tenant, &request)?;

        let max_attempts = self.config.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(AuditError::DeadlineExceeded);
            }

            let head = self.store.head(tenant)?;

            let mut entry = AuditLogEntry {
                id: EntryId::new(),
                tenant_id: tenant.clone(),
                sequence: head.sequence + 1,
                actor: request.actor.clone(),
                action: request.action.clone(),
                entity_type: request.entity_type.clone(),
                entity_id: request.entity_id.clone(),
                metadata: request.metadata.clone(),
                diff: request.diff.clone(),
                // Truncated before hashing; the persisted value is exactly
                // the hashed one.
                created_at: canonical_timestamp(Utc::now()),
                prev_hash: head.hash,
                hash: EntryHash::genesis(),
            };
            entry.hash = hash_entry(&entry)?;

            match self.store.insert(entry.clone()) {
                Ok(()) => {
                    info!(
                        tenant_id = %entry.tenant_id,
                        sequence = entry.sequence,
                        hash = %entry.hash,
                        action = %entry.action,
                        "audit entry committed"
                    );
                    return Ok(entry);
                }
                Err(AuditError::SequenceConflict { sequence, .. }) => {
                    debug!(
                        tenant_id = %tenant,
                        sequence,
                        attempt,
                        "lost append race; retrying against fresh head"
                    );
                    if attempt < max_attempts {
                        std::thread::sleep(self.config.backoff(attempt));
                    }
                }
                Err(other) => return Err(other),
            }
        }

        warn!(
            tenant_id = %tenant,
            attempts = max_attempts,
            "append retry budget exhausted"
        );
        Err(AuditError::ChainContention {
            tenant_id: tenant.clone(),
            attempts: max_attempts,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use custos_contracts::{ChainHead, EntryFilter, EntryPage, PageRequest};
    use custos_store::MemoryChainStore;
    use serde_json::json;

    fn service_with(config: AppendConfig) -> (Arc<MemoryChainStore>, AppendService) {
        let store = Arc::new(MemoryChainStore::new());
        let service = AppendService::new(store.clone(), config);
        (store, service)
    }

    fn widget_request(action: &str) -> AppendRequest {
        AppendRequest::new("user-1", action, "widget", "widget-1")
            .with_metadata(json!({ "source": "test" }))
    }

    // ── Happy path ────────────────────────────────────────────────────────────

    /// A create/update/delete lifecycle forms one correctly linked chain.
    #[test]
    fn sequential_appends_form_a_linked_chain() {
        let (store, service) = service_with(AppendConfig::default());
        let tenant = TenantId::new("acme");

        let e1 = service.append(&tenant, widget_request("widget.created")).unwrap();
        let e2 = service.append(&tenant, widget_request("widget.updated")).unwrap();
        let e3 = service.append(&tenant, widget_request("widget.deleted")).unwrap();

        assert_eq!((e1.sequence, e2.sequence, e3.sequence), (1, 2, 3));
        assert!(e1.prev_hash.is_genesis());
        assert_eq!(e2.prev_hash, e1.hash);
        assert_eq!(e3.prev_hash, e2.hash);

        // Each committed hash matches a fresh recomputation.
        for entry in [&e1, &e2, &e3] {
            assert_eq!(hash_entry(entry).unwrap(), entry.hash);
        }

        let head = store.head(&tenant).unwrap();
        assert_eq!(head.sequence, 3);
        assert_eq!(head.hash, e3.hash);
    }

    #[test]
    fn committed_timestamp_is_on_the_canonical_profile() {
        let (_, service) = service_with(AppendConfig::default());
        let entry = service
            .append(&TenantId::new("acme"), widget_request("widget.created"))
            .unwrap();

        assert_eq!(entry.created_at.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    // ── Validation ────────────────────────────────────────────────────────────

    #[test]
    fn empty_actor_is_rejected_before_storage() {
        let (store, service) = service_with(AppendConfig::default());
        let tenant = TenantId::new("acme");

        let request = AppendRequest::new("  ", "widget.created", "widget", "widget-1");
        let err = service.append(&tenant, request).unwrap_err();

        assert!(matches!(err, AuditError::Validation { .. }));
        assert_eq!(store.head(&tenant).unwrap(), ChainHead::empty());
    }

    #[test]
    fn empty_tenant_is_rejected() {
        let (_, service) = service_with(AppendConfig::default());
        let err = service
            .append(&TenantId::new(""), widget_request("widget.created"))
            .unwrap_err();
        assert!(matches!(err, AuditError::Validation { .. }));
    }

    #[test]
    fn uncanonicalizable_metadata_is_rejected() {
        let (_, service) = service_with(AppendConfig::default());

        let mut nested = json!(1);
        for _ in 0..200 {
            nested = json!([nested]);
        }
        let request = widget_request("widget.created").with_metadata(nested);

        let err = service.append(&TenantId::new("acme"), request).unwrap_err();
        match err {
            AuditError::Validation { reason } => {
                assert!(reason.contains("metadata"), "reason: {reason}")
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    // ── Contention & deadline ─────────────────────────────────────────────────

    /// A store wrapper that injects sequence conflicts for the first N
    /// inserts, simulating concurrent writers winning the race.
    struct ConflictingStore {
        inner: MemoryChainStore,
        conflicts_left: AtomicU32,
    }

    impl ConflictingStore {
        fn new(conflicts: u32) -> Self {
            Self {
                inner: MemoryChainStore::new(),
                conflicts_left: AtomicU32::new(conflicts),
            }
        }
    }

    impl ChainStore for ConflictingStore {
        fn head(&self, tenant: &TenantId) -> AuditResult<ChainHead> {
            self.inner.head(tenant)
        }

        fn insert(&self, entry: AuditLogEntry) -> AuditResult<()> {
            let left = self.conflicts_left.load(Ordering::SeqCst);
            if left > 0 {
                self.conflicts_left.store(left - 1, Ordering::SeqCst);
                return Err(AuditError::SequenceConflict {
                    tenant_id: entry.tenant_id.clone(),
                    sequence: entry.sequence,
                });
            }
            self.inner.insert(entry)
        }

        fn list(
            &self,
            tenant: &TenantId,
            filter: &EntryFilter,
            page: &PageRequest,
        ) -> AuditResult<EntryPage> {
            self.inner.list(tenant, filter, page)
        }

        fn get_by_hash(
            &self,
            tenant: &TenantId,
            hash: &EntryHash,
        ) -> AuditResult<Option<AuditLogEntry>> {
            self.inner.get_by_hash(tenant, hash)
        }
    }

    #[test]
    fn transient_conflicts_are_retried() {
        let store = Arc::new(ConflictingStore::new(2));
        let service = AppendService::new(
            store.clone(),
            AppendConfig {
                max_attempts: 5,
                backoff_ms: 0,
            },
        );

        let entry = service
            .append(&TenantId::new("acme"), widget_request("widget.created"))
            .unwrap();
        assert_eq!(entry.sequence, 1);
        assert_eq!(store.head(&TenantId::new("acme")).unwrap().sequence, 1);
    }

    #[test]
    fn exhausted_budget_surfaces_chain_contention() {
        let store = Arc::new(ConflictingStore::new(u32::MAX));
        let service = AppendService::new(
            store,
            AppendConfig {
                max_attempts: 3,
                backoff_ms: 0,
            },
        );

        let err = service
            .append(&TenantId::new("acme"), widget_request("widget.created"))
            .unwrap_err();
        match err {
            AuditError::ChainContention { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("expected ChainContention, got {other:?}"),
        }
    }

    #[test]
    fn elapsed_deadline_aborts_before_any_attempt() {
        let (store, service) = service_with(AppendConfig::default());
        let tenant = TenantId::new("acme");

        let err = service
            .append_by(&tenant, widget_request("widget.created"), Some(Instant::now()))
            .unwrap_err();
        assert!(matches!(err, AuditError::DeadlineExceeded));
        assert_eq!(store.head(&tenant).unwrap(), ChainHead::empty());
    }

    // ── Concurrency ───────────────────────────────────────────────────────────

    /// K concurrent writers on one tenant produce exactly K entries with
    /// gapless sequences and intact linkage.
    #[test]
    fn concurrent_appends_yield_a_gapless_chain() {
        const WRITERS: usize = 8;

        let store = Arc::new(MemoryChainStore::new());
        // Worst case a writer loses to every other writer once; keep the
        // budget above that so the test cannot flake on scheduling.
        let service = Arc::new(AppendService::new(
            store.clone(),
            AppendConfig {
                max_attempts: 16,
                backoff_ms: 1,
            },
        ));
        let tenant = TenantId::new("acme");

        let handles: Vec<_> = (0..WRITERS)
            .map(|i| {
                let service = Arc::clone(&service);
                let tenant = tenant.clone();
                std::thread::spawn(move || {
                    service.append(&tenant, widget_request(&format!("widget.op-{i}")))
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap().expect("append must succeed");
        }

        let page = store
            .list(&tenant, &EntryFilter::default(), &PageRequest::ascending(None, 0))
            .unwrap();
        assert_eq!(page.entries.len(), WRITERS);

        let mut expected_prev = EntryHash::genesis();
        for (i, entry) in page.entries.iter().enumerate() {
            assert_eq!(entry.sequence, i as u64 + 1);
            assert_eq!(entry.prev_hash, expected_prev);
            assert_eq!(hash_entry(entry).unwrap(), entry.hash);
            expected_prev = entry.hash.clone();
        }
    }
}
