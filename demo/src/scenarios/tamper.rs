//! Scenario 3: Tamper Detection
//!
//! Commits a short chain, verifies it cleanly and keeps the head as a
//! checkpoint, then mutates a committed entry in place — simulating a
//! malicious UPDATE against the underlying storage.  Both a full replay
//! and an incremental re-check from the checkpoint must pinpoint the
//! forged entry.
//!
//! Pipeline walk-through for the demo run:
//!   1. Three entries appended and verified; head saved as checkpoint
//!   2. Two more entries appended (the unverified suffix)
//!   3. Entry 4's metadata is rewritten behind the engine's back
//!   4. Incremental replay from the checkpoint flags sequence 4
//!   5. A by-hash spot-check of the forged entry also fails

use custos_contracts::{AppendRequest, AuditResult, EngineConfig, TenantId};
use serde_json::json;

use super::build_stack;

/// Run Scenario 3: Tamper Detection.
pub fn run_scenario() -> AuditResult<()> {
    println!("=== Scenario 3: Tamper Detection ===");
    println!();

    let (store, appender, verifier, _query) = build_stack(EngineConfig::default());
    let tenant = TenantId::new("acme");

    for i in 1..=3 {
        appender.append(
            &tenant,
            AppendRequest::new("clerk-1", "invoice.posted", "invoice", format!("inv-{i}"))
                .with_metadata(json!({ "amount_cents": 1_000 * i })),
        )?;
    }

    let clean = verifier.verify(&tenant)?;
    let checkpoint = clean.head.clone();
    println!(
        "  Initial chain:        VERIFIED ({} entries); head saved as checkpoint",
        clean.entries_checked
    );

    let mut forged_hash = None;
    for i in 4..=5 {
        let entry = appender.append(
            &tenant,
            AppendRequest::new("clerk-1", "invoice.posted", "invoice", format!("inv-{i}"))
                .with_metadata(json!({ "amount_cents": 1_000 * i })),
        )?;
        if i == 4 {
            forged_hash = Some(entry.hash);
        }
    }

    // Rewrite the committed amount behind the engine's back, the way a
    // privileged attacker with direct storage access would.
    let tampered = store.tamper_with(&tenant, 4, |entry| {
        entry.metadata = json!({ "amount_cents": 999_999 });
    });
    assert!(tampered, "entry 4 must exist");
    println!("  Tampering:            rewrote metadata of committed entry seq 4");
    println!();

    // ── Incremental replay from the checkpoint ────────────────────────────────

    let report = verifier.verify_from(&tenant, checkpoint, None)?;
    match &report.fault {
        Some(fault) => {
            println!("  Incremental replay:   BROKEN — {fault}");
            println!(
                "  Verified past checkpoint before the fault: {} entries",
                report.entries_checked
            );
        }
        None => println!("  Incremental replay:   unexpectedly clean"),
    }

    // ── Spot-check the forged entry by hash ───────────────────────────────────

    let hash = forged_hash.expect("entry 4 was appended");
    let check = verifier.verify_one(&tenant, &hash)?;
    println!(
        "  Spot-check of seq 4:  {}",
        if check.valid { "PASS" } else { "FAIL — digest no longer matches" }
    );
    println!();

    if report.valid {
        println!("  Tamper detection FAILED — forged entry went unnoticed.");
    } else {
        println!("  The forged entry was pinpointed without scanning the verified prefix.");
    }
    println!();

    Ok(())
}
