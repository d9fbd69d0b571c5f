//! Entry digest computation.
//!
//! Every field that contributes to an entry's hash is listed explicitly so
//! nothing is accidentally omitted.  All digest paths flow through the
//! canonical encoder — there is no way to hash bytes that were not
//! canonicalized.
//!
//! Hash input layout (bytes, in order):
//!   1. tenant_id as UTF-8 bytes
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. canonical JSON of the entry body: an object with the keys
//!      `action`, `actor`, `created_at` (canonical timestamp string),
//!      `diff`, `entity_id`, `entity_type`, `id`, `metadata`, encoded with
//!      sorted keys by `canonicalize`

use sha2::{Digest, Sha256};

use custos_contracts::{AuditLogEntry, AuditResult, EntryHash};

use crate::encode::canonicalize;
use crate::time::format_timestamp;

/// Compute the SHA-256 hash for a single audit entry.
///
/// The hash commits to every field except `hash` itself: the entry's
/// position in the chain (`sequence`), its tenant, its link to the
/// previous entry (`prev_hash`), and the full event body.  The value
/// currently held in `entry.hash` is not an input, so the same function
/// serves both creation (placeholder hash) and verification (recompute
/// and compare).
///
/// Returns a lowercase 64-character hex digest, or `AuditError::Encoding`
/// when the body cannot be canonicalized.
pub fn hash_entry(entry: &AuditLogEntry) -> AuditResult<EntryHash> {
    let body = serde_json::json!({
        "action": entry.action,
        "actor": entry.actor,
        "created_at": format_timestamp(&entry.created_at),
        "diff": entry.diff,
        "entity_id": entry.entity_id,
        "entity_type": entry.entity_type,
        "id": entry.id,
        "metadata": entry.metadata,
    });
    let body_bytes = canonicalize(&body)?;

    let mut hasher = Sha256::new();
    hasher.update(entry.tenant_id.as_str().as_bytes());
    hasher.update(entry.sequence.to_le_bytes());
    hasher.update(entry.prev_hash.as_str().as_bytes());
    hasher.update(&body_bytes);

    Ok(EntryHash(hex::encode(hasher.finalize())))
}
