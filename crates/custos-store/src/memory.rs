//! In-memory implementation of `ChainStore`.
//!
//! `MemoryChainStore` is the reference implementation: one mutex per
//! tenant chain, so appends for different tenants never contend, plus a
//! per-tenant hash index for `get_by_hash`.  The contiguous-sequence check
//! in `insert` plays the role a relational uniqueness constraint on
//! `(tenant_id, sequence)` plays in a database-backed store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use tracing::debug;

use custos_contracts::{
    AuditError, AuditLogEntry, AuditResult, ChainHead, EntryFilter, EntryHash, EntryPage,
    PageRequest, SortOrder, TenantId,
};

use crate::traits::ChainStore;

// ── Internal per-tenant state ─────────────────────────────────────────────────

/// One tenant's committed chain, in sequence order.
///
/// `entries[i]` always holds sequence `i + 1`, so the head and any lookup
/// by sequence are O(1).
struct TenantChain {
    entries: Vec<AuditLogEntry>,
    by_hash: HashMap<EntryHash, usize>,
}

impl TenantChain {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            by_hash: HashMap::new(),
        }
    }

    fn head(&self) -> ChainHead {
        match self.entries.last() {
            Some(last) => ChainHead {
                sequence: last.sequence,
                hash: last.hash.clone(),
            },
            None => ChainHead::empty(),
        }
    }
}

// ── Public store ──────────────────────────────────────────────────────────────

/// An in-memory, append-only chain store.
///
/// # Thread safety
///
/// The tenant map is behind an `RwLock` taken only long enough to clone a
/// chain's `Arc`; each chain has its own `Mutex` held for the duration of
/// a single operation.  The per-tenant head is the only contended
/// resource, scoped as narrowly as possible.
pub struct MemoryChainStore {
    tenants: RwLock<HashMap<TenantId, Arc<Mutex<TenantChain>>>>,
}

impl MemoryChainStore {
    pub fn new() -> Self {
        Self {
            tenants: RwLock::new(HashMap::new()),
        }
    }

    /// Clone the chain handle for `tenant`, or `None` when the tenant has
    /// never been written.
    fn chain(&self, tenant: &TenantId) -> AuditResult<Option<Arc<Mutex<TenantChain>>>> {
        let tenants = self.tenants.read().map_err(|_| AuditError::Storage {
            reason: "tenant map lock poisoned".to_string(),
        })?;
        Ok(tenants.get(tenant).cloned())
    }

    /// Clone the chain handle for `tenant`, creating an empty chain first
    /// if necessary.
    fn chain_or_create(&self, tenant: &TenantId) -> AuditResult<Arc<Mutex<TenantChain>>> {
        if let Some(chain) = self.chain(tenant)? {
            return Ok(chain);
        }
        let mut tenants = self.tenants.write().map_err(|_| AuditError::Storage {
            reason: "tenant map lock poisoned".to_string(),
        })?;
        Ok(tenants
            .entry(tenant.clone())
            .or_insert_with(|| Arc::new(Mutex::new(TenantChain::new())))
            .clone())
    }

    /// Test support: overwrite a committed entry in place, bypassing the
    /// append-only contract.  Simulates out-of-band storage corruption so
    /// integrity tests and the demo can exercise the verifier.  Returns
    /// false when the tenant or sequence does not exist.
    #[doc(hidden)]
    pub fn tamper_with(
        &self,
        tenant: &TenantId,
        sequence: u64,
        mutate: impl FnOnce(&mut AuditLogEntry),
    ) -> bool {
        let Ok(Some(chain)) = self.chain(tenant) else {
            return false;
        };
        let Ok(mut chain) = chain.lock() else {
            return false;
        };

        let Some(index) = sequence.checked_sub(1).map(|i| i as usize) else {
            return false;
        };
        let Some(entry) = chain.entries.get_mut(index) else {
            return false;
        };
        mutate(entry);

        // The mutation may have changed a hash; rebuild the index.
        let rebuilt: HashMap<EntryHash, usize> = chain
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.hash.clone(), i))
            .collect();
        chain.by_hash = rebuilt;
        true
    }
}

impl Default for MemoryChainStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainStore for MemoryChainStore {
    fn head(&self, tenant: &TenantId) -> AuditResult<ChainHead> {
        match self.chain(tenant)? {
            None => Ok(ChainHead::empty()),
            Some(chain) => {
                let chain = chain.lock().map_err(|_| AuditError::Storage {
                    reason: format!("chain lock poisoned for tenant '{tenant}'"),
                })?;
                Ok(chain.head())
            }
        }
    }

    fn insert(&self, entry: AuditLogEntry) -> AuditResult<()> {
        let chain = self.chain_or_create(&entry.tenant_id)?;
        let mut chain = chain.lock().map_err(|_| AuditError::Storage {
            reason: format!("chain lock poisoned for tenant '{}'", entry.tenant_id),
        })?;

        // The uniqueness/contiguity constraint: the next sequence is
        // exactly one past the number of committed entries.  A writer that
        // linked against a stale head fails here and retries.
        let expected = chain.entries.len() as u64 + 1;
        if entry.sequence != expected {
            debug!(
                tenant_id = %entry.tenant_id,
                sequence = entry.sequence,
                expected,
                "insert rejected: sequence conflict"
            );
            return Err(AuditError::SequenceConflict {
                tenant_id: entry.tenant_id.clone(),
                sequence: entry.sequence,
            });
        }

        let index = chain.entries.len();
        chain.by_hash.insert(entry.hash.clone(), index);
        chain.entries.push(entry);
        Ok(())
    }

    fn list(
        &self,
        tenant: &TenantId,
        filter: &EntryFilter,
        page: &PageRequest,
    ) -> AuditResult<EntryPage> {
        let Some(chain) = self.chain(tenant)? else {
            return Ok(EntryPage::empty());
        };
        let chain = chain.lock().map_err(|_| AuditError::Storage {
            reason: format!("chain lock poisoned for tenant '{tenant}'"),
        })?;

        let limit = if page.limit == 0 { usize::MAX } else { page.limit };

        let matching: Vec<&AuditLogEntry> = match page.order {
            SortOrder::Ascending => chain
                .entries
                .iter()
                .filter(|e| page.cursor.map_or(true, |c| e.sequence > c))
                .filter(|e| filter.matches(e))
                .collect(),
            SortOrder::Descending => chain
                .entries
                .iter()
                .rev()
                .filter(|e| page.cursor.map_or(true, |c| e.sequence < c))
                .filter(|e| filter.matches(e))
                .collect(),
        };

        let has_more = matching.len() > limit;
        let entries: Vec<AuditLogEntry> =
            matching.into_iter().take(limit).cloned().collect();
        let next_cursor = if has_more {
            entries.last().map(|e| e.sequence)
        } else {
            None
        };

        Ok(EntryPage {
            entries,
            next_cursor,
        })
    }

    fn get_by_hash(
        &self,
        tenant: &TenantId,
        hash: &EntryHash,
    ) -> AuditResult<Option<AuditLogEntry>> {
        let Some(chain) = self.chain(tenant)? else {
            return Ok(None);
        };
        let chain = chain.lock().map_err(|_| AuditError::Storage {
            reason: format!("chain lock poisoned for tenant '{tenant}'"),
        })?;

        Ok(chain
            .by_hash
            .get(hash)
            .and_then(|&i| chain.entries.get(i))
            .cloned())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
