//! Error taxonomy for the CUSTOS audit trail engine.
//!
//! All fallible operations in the engine return `AuditResult<T>`.  Variants
//! carry enough context to log actionable messages and to let callers
//! distinguish retryable conditions (`ChainContention`, `Storage`) from
//! terminal ones (`Validation`, `IntegrityViolation`).

use thiserror::Error;

use crate::entry::TenantId;

/// The unified error type for the CUSTOS engine.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The producer payload is malformed or not canonicalizable.
    ///
    /// Raised before storage is touched — a request that fails validation
    /// never reaches the chain.
    #[error("invalid audit payload: {reason}")]
    Validation { reason: String },

    /// The canonical encoder could not produce deterministic bytes for a
    /// value (non-finite number, nesting beyond the depth bound).
    #[error("canonical encoding failed: {reason}")]
    Encoding { reason: String },

    /// A single append lost the per-tenant race: another writer committed
    /// the sequence this insert was built against.
    ///
    /// Internal to the append retry loop; callers see `ChainContention`
    /// once the retry budget is exhausted.
    #[error("sequence {sequence} for tenant '{tenant_id}' was claimed by a concurrent append")]
    SequenceConflict { tenant_id: TenantId, sequence: u64 },

    /// The append retry budget was exhausted without winning the per-tenant
    /// race.  Retryable at the business-transaction level.
    #[error("append for tenant '{tenant_id}' lost the chain-head race {attempts} times")]
    ChainContention { tenant_id: TenantId, attempts: u32 },

    /// A caller-supplied deadline elapsed before the operation completed.
    #[error("operation deadline exceeded")]
    DeadlineExceeded,

    /// The requested entry, hash, or resource does not exist.
    ///
    /// An absent chain is a valid empty chain, not an error — this variant
    /// is for lookups of specific entries.
    #[error("not found: {what}")]
    NotFound { what: String },

    /// Verification found a digest or linkage mismatch.
    ///
    /// Never auto-corrected.  Must reach an operator/alerting path and
    /// stay loud until investigated.
    #[error("integrity violation in chain for tenant '{tenant_id}' at sequence {sequence}: {reason}")]
    IntegrityViolation {
        tenant_id: TenantId,
        sequence: u64,
        reason: String,
    },

    /// Transport or storage failure, including poisoned locks.  Retryable
    /// with backoff.
    #[error("storage error: {reason}")]
    Storage { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

/// Convenience alias used throughout the CUSTOS crates.
pub type AuditResult<T> = Result<T, AuditError>;
