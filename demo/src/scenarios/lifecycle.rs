//! Scenario 1: Entity Lifecycle
//!
//! Walks one business entity (a timesheet) through create, update,
//! approve, and delete, then reads the trail back through the query
//! service and verifies the whole chain.
//!
//! Pipeline walk-through for the demo run:
//!   1. Four business events appended to the tenant's chain
//!   2. Query service lists the trail newest-first, as an audit UI would
//!   3. A single entry is fetched by hash and spot-checked
//!   4. Full chain replay confirms contiguity, linkage, and digests

use custos_contracts::{AppendRequest, AuditResult, EngineConfig, EntryFilter, PageRequest, TenantId};
use serde_json::json;

use super::build_stack;

/// Run Scenario 1: Entity Lifecycle.
pub fn run_scenario() -> AuditResult<()> {
    println!("=== Scenario 1: Entity Lifecycle ===");
    println!();

    let (_store, appender, verifier, query) = build_stack(EngineConfig::default());
    let tenant = TenantId::new("acme");

    // ── Append the lifecycle events ───────────────────────────────────────────

    let events = [
        AppendRequest::new("user-7", "timesheet.created", "timesheet", "ts-312")
            .with_metadata(json!({ "period": "2026-08", "hours": 0 })),
        AppendRequest::new("user-7", "timesheet.updated", "timesheet", "ts-312")
            .with_diff(json!({ "hours": { "from": 0, "to": 152 } })),
        AppendRequest::new("manager-2", "timesheet.approved", "timesheet", "ts-312")
            .with_metadata(json!({ "comment": "looks good" })),
        AppendRequest::new("admin-1", "timesheet.deleted", "timesheet", "ts-312"),
    ];

    let mut last_hash = None;
    for request in events {
        let entry = appender.append(&tenant, request)?;
        println!(
            "  Appended #{}: {:<22} by {:<10} hash {}…",
            entry.sequence,
            entry.action,
            entry.actor,
            &entry.hash.0[..12]
        );
        last_hash = Some(entry.hash);
    }
    println!();

    // ── Read the trail back, newest first ─────────────────────────────────────

    let page = query.list(
        &tenant,
        &EntryFilter::default(),
        &PageRequest::descending(None, 10),
    )?;
    println!("  Audit UI view (newest first):");
    for entry in &page.entries {
        println!(
            "    [{}] seq {} {} {} {}",
            entry.created_at.format("%H:%M:%S%.3f"),
            entry.sequence,
            entry.actor,
            entry.action,
            entry.entity_id
        );
    }
    println!();

    // ── Spot-check the head entry by hash ─────────────────────────────────────

    let head_hash = last_hash.expect("four entries were appended");
    let check = verifier.verify_one(&tenant, &head_hash)?;
    println!(
        "  Spot-check of head entry:  {} (seq {}, {})",
        if check.valid { "PASS" } else { "FAIL" },
        check.entry.sequence,
        check.entry.action
    );

    // ── Full chain replay ─────────────────────────────────────────────────────

    let report = verifier.verify(&tenant)?;
    println!(
        "  Chain integrity:           {} ({} entries checked, head seq {})",
        if report.valid { "VERIFIED" } else { "BROKEN" },
        report.entries_checked,
        report.head.as_ref().map_or(0, |h| h.sequence)
    );
    println!();

    report.into_result().map(|_| ())
}
