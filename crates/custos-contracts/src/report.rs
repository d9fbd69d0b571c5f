//! Verification report shapes.
//!
//! These are the structures audit/observability UIs render: either a clean
//! verdict with the verified head, or a pointer to the first broken entry.
//! A broken chain is a loud, persistent signal — the report carries enough
//! detail to name the offending sequence and the exact mismatch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::{ActorId, AuditLogEntry, ChainHead, EntryHash, TenantId};
use crate::error::{AuditError, AuditResult};

/// The exact mismatch verification found at one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FaultKind {
    /// The sequence numbering has a gap or duplicate — the store's
    /// contiguity guarantee was violated out-of-band.
    SequenceGap { expected: u64, found: u64 },

    /// The entry's `prev_hash` does not match the hash of the entry before
    /// it (or the checkpoint/genesis value).
    PrevHashMismatch { expected: EntryHash, found: EntryHash },

    /// The entry's stored `hash` does not match the digest recomputed from
    /// its own fields.
    HashMismatch {
        stored: EntryHash,
        recomputed: EntryHash,
    },

    /// The stored entry could not be canonically encoded — itself evidence
    /// of tampering, since it encoded successfully at append time.
    Unencodable { reason: String },
}

impl std::fmt::Display for FaultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SequenceGap { expected, found } => {
                write!(f, "sequence gap: expected {expected}, found {found}")
            }
            Self::PrevHashMismatch { expected, found } => {
                write!(f, "prev_hash mismatch: expected {expected}, found {found}")
            }
            Self::HashMismatch { stored, recomputed } => {
                write!(f, "hash mismatch: stored {stored}, recomputed {recomputed}")
            }
            Self::Unencodable { reason } => {
                write!(f, "entry is not canonically encodable: {reason}")
            }
        }
    }
}

/// The first point of divergence found while replaying a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainFault {
    /// Sequence of the first offending entry.
    pub sequence: u64,

    /// What exactly did not match.
    pub kind: FaultKind,
}

impl std::fmt::Display for ChainFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "at sequence {}: {}", self.sequence, self.kind)
    }
}

/// The outcome of a full or incremental chain verification.
///
/// `head` is the last successfully verified `(sequence, hash)` pair — on a
/// clean run it is the chain head and can be stored as the checkpoint for
/// the next incremental check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// The tenant whose chain was replayed.
    pub tenant_id: TenantId,

    /// True when every examined entry passed linkage and digest checks.
    pub valid: bool,

    /// Number of entries examined in this pass.  For a full replay this is
    /// the chain length; for an incremental check it is the length of the
    /// suffix after the checkpoint.
    pub entries_checked: u64,

    /// Last verified `(sequence, hash)`, or `None` when nothing was
    /// verified (empty chain with no checkpoint).
    pub head: Option<ChainHead>,

    /// The first point of divergence, when `valid` is false.
    pub fault: Option<ChainFault>,
}

impl VerificationReport {
    /// Convert the report into a hard error when the chain is broken.
    ///
    /// Used by scheduled integrity jobs whose alerting path wants an
    /// `Err(IntegrityViolation)` rather than a report to inspect.
    pub fn into_result(self) -> AuditResult<Self> {
        match &self.fault {
            None => Ok(self),
            Some(fault) => Err(AuditError::IntegrityViolation {
                tenant_id: self.tenant_id.clone(),
                sequence: fault.sequence,
                reason: fault.kind.to_string(),
            }),
        }
    }
}

/// A UI-facing projection of one entry, returned by single-entry checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySummary {
    pub sequence: u64,
    pub hash: EntryHash,
    pub actor: ActorId,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<&AuditLogEntry> for EntrySummary {
    fn from(entry: &AuditLogEntry) -> Self {
        Self {
            sequence: entry.sequence,
            hash: entry.hash.clone(),
            actor: entry.actor.clone(),
            action: entry.action.clone(),
            entity_type: entry.entity_type.clone(),
            entity_id: entry.entity_id.clone(),
            created_at: entry.created_at,
        }
    }
}

/// The outcome of verifying a single entry in isolation.
///
/// Proves only that the entry's own digest is self-consistent — it cannot
/// by itself prove linkage into the chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryCheck {
    /// True when the recomputed digest matches the stored hash.
    pub valid: bool,

    /// Summary of the checked entry.
    pub entry: EntrySummary,
}
