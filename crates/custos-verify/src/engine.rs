//! Streaming chain verification.
//!
//! Verification replays a tenant's chain in ascending sequence order,
//! checking three rules per entry, in order:
//!
//! 1. **Sequence contiguity** — the entry's sequence is exactly one past
//!    the previous one (or the checkpoint).
//! 2. **Prev-hash linkage** — the entry's `prev_hash` equals the hash of
//!    the preceding entry (or the checkpoint hash / genesis).
//! 3. **Hash correctness** — the entry's stored `hash` matches the digest
//!    recomputed from its own fields.
//!
//! The replay streams in bounded batches through the store cursor, so
//! memory use is independent of chain length, and a checkpoint bounds an
//! incremental re-check to the unverified suffix.  The first mismatch
//! stops the scan; a detected violation is reported, never auto-repaired.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use custos_canonical::hash_entry;
use custos_contracts::{
    AuditError, AuditLogEntry, AuditResult, ChainFault, ChainHead, EntryCheck, EntryFilter,
    EntryHash, EntrySummary, FaultKind, PageRequest, TenantId, VerificationReport, VerifyConfig,
};
use custos_store::ChainStore;

/// Replays tenant chains and reports the first point of divergence.
///
/// Read-only: verification never mutates state, and runs safely alongside
/// ongoing appends — it simply may not yet see the newest entries.
pub struct ChainVerifier {
    store: Arc<dyn ChainStore>,
    config: VerifyConfig,
}

impl ChainVerifier {
    pub fn new(store: Arc<dyn ChainStore>, config: VerifyConfig) -> Self {
        Self { store, config }
    }

    /// Fully replay `tenant`'s chain from genesis.
    ///
    /// An empty chain is valid: `{valid: true, entries_checked: 0}`.
    pub fn verify(&self, tenant: &TenantId) -> AuditResult<VerificationReport> {
        self.verify_from(tenant, None, None)
    }

    /// Replay `tenant`'s chain from a previously verified checkpoint, or
    /// from genesis when none is given.
    ///
    /// Cost is proportional to the unverified suffix only.  The returned
    /// report's `head` is the checkpoint for the next incremental check.
    /// Aborts with `DeadlineExceeded` if `deadline` passes between
    /// batches.
    pub fn verify_from(
        &self,
        tenant: &TenantId,
        checkpoint: Option<ChainHead>,
        deadline: Option<Instant>,
    ) -> AuditResult<VerificationReport> {
        let mut expected_prev = checkpoint
            .as_ref()
            .map(|c| c.hash.clone())
            .unwrap_or_else(EntryHash::genesis);
        let mut expected_seq = checkpoint.as_ref().map_or(0, |c| c.sequence) + 1;
        let mut cursor = checkpoint.as_ref().map(|c| c.sequence);
        let mut head = checkpoint;
        let mut checked = 0u64;

        let batch = self.config.batch_size.max(1);

        loop {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(AuditError::DeadlineExceeded);
            }

            let page = self.store.list(
                tenant,
                &EntryFilter::default(),
                &PageRequest::ascending(cursor, batch),
            )?;
            if page.entries.is_empty() {
                break;
            }

            for entry in &page.entries {
                if let Err(kind) = check_entry(entry, expected_seq, &expected_prev) {
                    let fault = ChainFault {
                        sequence: entry.sequence,
                        kind,
                    };
                    warn!(
                        tenant_id = %tenant,
                        sequence = entry.sequence,
                        fault = %fault.kind,
                        "chain integrity fault detected"
                    );
                    return Ok(VerificationReport {
                        tenant_id: tenant.clone(),
                        valid: false,
                        entries_checked: checked,
                        head,
                        fault: Some(fault),
                    });
                }

                checked += 1;
                expected_prev = entry.hash.clone();
                expected_seq = entry.sequence + 1;
                head = Some(ChainHead {
                    sequence: entry.sequence,
                    hash: entry.hash.clone(),
                });
            }

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        debug!(
            tenant_id = %tenant,
            entries_checked = checked,
            "chain verification complete"
        );
        Ok(VerificationReport {
            tenant_id: tenant.clone(),
            valid: true,
            entries_checked: checked,
            head,
            fault: None,
        })
    }

    /// Verify a single entry's digest in isolation.
    ///
    /// Useful for ad hoc spot-checks from a UI.  Proves only that the
    /// entry is self-consistent — linkage into the chain requires a
    /// replay.  Fails with `NotFound` when no entry with `hash` exists
    /// for the tenant.
    pub fn verify_one(&self, tenant: &TenantId, hash: &EntryHash) -> AuditResult<EntryCheck> {
        let entry = self
            .store
            .get_by_hash(tenant, hash)?
            .ok_or_else(|| AuditError::NotFound {
                what: format!("audit entry with hash '{hash}' for tenant '{tenant}'"),
            })?;

        // An entry that stopped canonicalizing after it was committed is
        // itself evidence of tampering.
        let valid = match hash_entry(&entry) {
            Ok(recomputed) => recomputed == entry.hash,
            Err(_) => false,
        };

        if !valid {
            warn!(
                tenant_id = %tenant,
                sequence = entry.sequence,
                hash = %entry.hash,
                "single-entry digest check failed"
            );
        }

        Ok(EntryCheck {
            valid,
            entry: EntrySummary::from(&entry),
        })
    }
}

/// Apply the three verification rules to one entry.
fn check_entry(
    entry: &AuditLogEntry,
    expected_seq: u64,
    expected_prev: &EntryHash,
) -> Result<(), FaultKind> {
    if entry.sequence != expected_seq {
        return Err(FaultKind::SequenceGap {
            expected: expected_seq,
            found: entry.sequence,
        });
    }

    if entry.prev_hash != *expected_prev {
        return Err(FaultKind::PrevHashMismatch {
            expected: expected_prev.clone(),
            found: entry.prev_hash.clone(),
        });
    }

    let recomputed = hash_entry(entry).map_err(|e| FaultKind::Unencodable {
        reason: e.to_string(),
    })?;
    if recomputed != entry.hash {
        return Err(FaultKind::HashMismatch {
            stored: entry.hash.clone(),
            recomputed,
        });
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
