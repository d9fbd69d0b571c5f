//! Audit entry types and identifiers.
//!
//! `AuditLogEntry` is a single entry in a tenant's hash chain — it wraps the
//! business-facing event fields with sequence numbering and the SHA-256
//! hashes that make tampering detectable.  `AppendRequest` is the payload a
//! business module hands to the append service; it knows nothing about
//! hashing, sequencing, or chains.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Partition key for the audit trail.
///
/// Every chain invariant — linkage, sequence contiguity, the head — is
/// scoped to one tenant.  Chains for different tenants never interact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(pub String);

impl TenantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the principal that caused an event — a user, a system
/// account, or a service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque unique identifier for a single audit entry.
///
/// Assigned once at creation, immutable afterwards, and part of the hashed
/// content.  Appears in every log line and verification fault.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub uuid::Uuid);

impl EntryId {
    /// Create a new, unique entry ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A SHA-256 digest in lowercase hex, 64 ASCII characters.
///
/// Used both for an entry's own hash and for its link to the previous
/// entry.  The genesis value (64 hex zeros) can never be the SHA-256 of
/// real data, making the start of a chain unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryHash(pub String);

impl EntryHash {
    /// The sentinel `prev_hash` for the first entry in every chain.
    pub const GENESIS_HEX: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";

    /// The genesis value: the fixed placeholder "previous hash" used by the
    /// first entry in a chain.
    pub fn genesis() -> Self {
        Self(Self::GENESIS_HEX.to_string())
    }

    pub fn is_genesis(&self) -> bool {
        self.0 == Self::GENESIS_HEX
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntryHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The most recently committed entry's `(sequence, hash)` for a tenant.
///
/// Also serves as a verification checkpoint: a previously verified head can
/// be handed back to the verifier to bound an incremental re-check to the
/// unverified suffix of the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainHead {
    /// Sequence of the last committed entry, or 0 for an empty chain.
    pub sequence: u64,

    /// Hash of the last committed entry, or the genesis value for an empty
    /// chain.
    pub hash: EntryHash,
}

impl ChainHead {
    /// The head of a chain with no entries: `(0, genesis)`.
    pub fn empty() -> Self {
        Self {
            sequence: 0,
            hash: EntryHash::genesis(),
        }
    }
}

/// A single entry in one tenant's SHA-256 hash chain.
///
/// Each entry commits to the previous entry via `prev_hash`, forming an
/// append-only chain.  Modifying any field — including the opaque
/// `metadata` and `diff` values — invalidates `hash` and every subsequent
/// `prev_hash`, which the verifier detects.
///
/// Entries are created exactly once by the append service and never
/// mutated or removed by this subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Opaque unique identifier, assigned at creation.
    pub id: EntryId,

    /// The tenant whose chain this entry belongs to.
    pub tenant_id: TenantId,

    /// Monotonically increasing position in the chain, starting at 1,
    /// assigned at insert time.  Defines chain order unambiguously —
    /// wall-clock timestamps alone are not a safe ordering key under
    /// concurrency.
    pub sequence: u64,

    /// The principal that caused the event.
    pub actor: ActorId,

    /// Free-form classification of what happened (e.g. "lead.created").
    pub action: String,

    /// The kind of entity the action touched (e.g. "timesheet").
    pub entity_type: String,

    /// The identifier of the touched entity within its module.
    pub entity_id: String,

    /// Opaque structured context for the event.  Hashed via its canonical
    /// encoding; the engine never inspects it.
    pub metadata: serde_json::Value,

    /// Opaque before/after state for the event.  Same treatment as
    /// `metadata`.
    pub diff: serde_json::Value,

    /// Wall-clock time (UTC) the entry was created, truncated to
    /// millisecond precision *before* hashing and persisted exactly as
    /// hashed.
    pub created_at: DateTime<Utc>,

    /// Hash of the previous entry in this tenant's chain, or the genesis
    /// value for the first entry.
    pub prev_hash: EntryHash,

    /// SHA-256 hash (hex) of this entry's canonical encoding, including
    /// `prev_hash`.  Computed at creation.
    pub hash: EntryHash,
}

/// The payload a business module submits to the append service.
///
/// Producers fill in who did what to which entity; the engine assigns the
/// id, sequence, timestamp, and hashes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppendRequest {
    /// The principal that caused the event.
    pub actor: ActorId,

    /// Free-form classification of what happened.
    pub action: String,

    /// The kind of entity the action touched.
    pub entity_type: String,

    /// The identifier of the touched entity.
    pub entity_id: String,

    /// Opaque structured context.  Defaults to JSON null.
    #[serde(default)]
    pub metadata: serde_json::Value,

    /// Opaque before/after state.  Defaults to JSON null.
    #[serde(default)]
    pub diff: serde_json::Value,
}

impl AppendRequest {
    /// Build a request with null `metadata` and `diff`.
    pub fn new(
        actor: impl Into<String>,
        action: impl Into<String>,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        Self {
            actor: ActorId::new(actor),
            action: action.into(),
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            metadata: serde_json::Value::Null,
            diff: serde_json::Value::Null,
        }
    }

    /// Attach structured context to the request.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// Attach a before/after diff to the request.
    pub fn with_diff(mut self, diff: serde_json::Value) -> Self {
        self.diff = diff;
        self
    }
}
