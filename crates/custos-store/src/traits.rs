//! The chain store trait: the persistence seam of the engine.
//!
//! `ChainStore` is the only abstraction the append, verification, and
//! query services talk to.  It deliberately exposes no update or delete
//! operation — committed entries are immutable, and the trait makes the
//! alternative unrepresentable.

use custos_contracts::{
    AuditLogEntry, AuditResult, ChainHead, EntryFilter, EntryHash, EntryPage, PageRequest,
    TenantId,
};

/// Append-only persistence keyed by tenant.
///
/// Implementations model a transactional relational table with a
/// uniqueness constraint on `(tenant_id, sequence)`: `insert` must reject
/// any entry whose sequence is not exactly one past the current head, so
/// an optimistic writer that lost the race gets a conflict instead of a
/// forked chain.  Cross-tenant operations must never contend with each
/// other.
pub trait ChainStore: Send + Sync {
    /// The last committed entry's `(sequence, hash)` for `tenant`, or
    /// `(0, genesis)` when the tenant has no entries yet.
    ///
    /// An absent chain is a valid empty chain, never an error.
    fn head(&self, tenant: &TenantId) -> AuditResult<ChainHead>;

    /// Persist a fully formed entry.
    ///
    /// Returns `AuditError::SequenceConflict` unless `entry.sequence` is
    /// exactly `head.sequence + 1` for the entry's tenant — the
    /// compare-and-swap the append service's retry loop is built on.
    /// Committed entries are never modified or removed.
    fn insert(&self, entry: AuditLogEntry) -> AuditResult<()>;

    /// One page of entries ordered by sequence, filtered and
    /// cursor-paginated.  Read-only.
    ///
    /// A `limit` of 0 means unbounded at this layer; the query service
    /// clamps caller-supplied limits before delegating.
    fn list(
        &self,
        tenant: &TenantId,
        filter: &EntryFilter,
        page: &PageRequest,
    ) -> AuditResult<EntryPage>;

    /// Look up a single entry by its hash, or `None` when no entry with
    /// that hash exists for the tenant.
    fn get_by_hash(
        &self,
        tenant: &TenantId,
        hash: &EntryHash,
    ) -> AuditResult<Option<AuditLogEntry>>;
}
