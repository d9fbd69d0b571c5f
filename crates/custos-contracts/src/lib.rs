//! # custos-contracts
//!
//! Shared types, schemas, and contracts for the CUSTOS audit trail engine.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions, the error taxonomy, verification
//! report shapes, and engine configuration.

pub mod config;
pub mod entry;
pub mod error;
pub mod query;
pub mod report;

pub use config::{AppendConfig, EngineConfig, QueryConfig, VerifyConfig};
pub use entry::{
    ActorId, AppendRequest, AuditLogEntry, ChainHead, EntryHash, EntryId, TenantId,
};
pub use error::{AuditError, AuditResult};
pub use query::{EntryFilter, EntryPage, PageRequest, SortOrder};
pub use report::{ChainFault, EntryCheck, EntrySummary, FaultKind, VerificationReport};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    // ── Fixtures ─────────────────────────────────────────────────────────────

    fn sample_entry() -> AuditLogEntry {
        AuditLogEntry {
            id: EntryId::new(),
            tenant_id: TenantId::new("acme"),
            sequence: 7,
            actor: ActorId::new("user-42"),
            action: "lead.created".to_string(),
            entity_type: "lead".to_string(),
            entity_id: "lead-9".to_string(),
            metadata: serde_json::json!({ "source": "webform" }),
            diff: serde_json::Value::Null,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            prev_hash: EntryHash::genesis(),
            hash: EntryHash("ab".repeat(32)),
        }
    }

    // ── EntryHash / ChainHead ────────────────────────────────────────────────

    #[test]
    fn genesis_hash_is_64_hex_zeros() {
        let genesis = EntryHash::genesis();
        assert_eq!(genesis.as_str().len(), 64);
        assert!(genesis.as_str().chars().all(|c| c == '0'));
        assert!(genesis.is_genesis());
    }

    #[test]
    fn empty_chain_head_is_zero_and_genesis() {
        let head = ChainHead::empty();
        assert_eq!(head.sequence, 0);
        assert!(head.hash.is_genesis());
    }

    #[test]
    fn entry_ids_are_unique() {
        let ids: std::collections::HashSet<String> =
            (0..100).map(|_| EntryId::new().to_string()).collect();
        assert_eq!(ids.len(), 100);
    }

    // ── EntryFilter ──────────────────────────────────────────────────────────

    #[test]
    fn empty_filter_matches_everything() {
        assert!(EntryFilter::default().matches(&sample_entry()));
    }

    #[test]
    fn filter_matches_on_actor_and_action() {
        let entry = sample_entry();

        let matching = EntryFilter {
            actor: Some(ActorId::new("user-42")),
            action: Some("lead.created".to_string()),
            ..EntryFilter::default()
        };
        assert!(matching.matches(&entry));

        let wrong_actor = EntryFilter {
            actor: Some(ActorId::new("someone-else")),
            ..EntryFilter::default()
        };
        assert!(!wrong_actor.matches(&entry));
    }

    #[test]
    fn filter_time_range_is_inclusive() {
        let entry = sample_entry();

        let exact = EntryFilter {
            since: Some(entry.created_at),
            until: Some(entry.created_at),
            ..EntryFilter::default()
        };
        assert!(exact.matches(&entry));

        let before = EntryFilter {
            until: Some(entry.created_at - chrono::Duration::seconds(1)),
            ..EntryFilter::default()
        };
        assert!(!before.matches(&entry));

        let after = EntryFilter {
            since: Some(entry.created_at + chrono::Duration::seconds(1)),
            ..EntryFilter::default()
        };
        assert!(!after.matches(&entry));
    }

    // ── Report shapes ────────────────────────────────────────────────────────

    #[test]
    fn fault_kind_round_trips_through_json() {
        let original = FaultKind::PrevHashMismatch {
            expected: EntryHash::genesis(),
            found: EntryHash("ff".repeat(32)),
        };
        let json = serde_json::to_string(&original).unwrap();
        let decoded: FaultKind = serde_json::from_str(&json).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn fault_display_names_the_sequence() {
        let fault = ChainFault {
            sequence: 12,
            kind: FaultKind::SequenceGap {
                expected: 12,
                found: 14,
            },
        };
        let msg = fault.to_string();
        assert!(msg.contains("sequence 12"));
        assert!(msg.contains("found 14"));
    }

    #[test]
    fn valid_report_passes_into_result() {
        let report = VerificationReport {
            tenant_id: TenantId::new("acme"),
            valid: true,
            entries_checked: 3,
            head: Some(ChainHead {
                sequence: 3,
                hash: EntryHash("cd".repeat(32)),
            }),
            fault: None,
        };
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn broken_report_becomes_integrity_violation() {
        let report = VerificationReport {
            tenant_id: TenantId::new("acme"),
            valid: false,
            entries_checked: 1,
            head: None,
            fault: Some(ChainFault {
                sequence: 2,
                kind: FaultKind::HashMismatch {
                    stored: EntryHash("aa".repeat(32)),
                    recomputed: EntryHash("bb".repeat(32)),
                },
            }),
        };

        let err = report.into_result().unwrap_err();
        match err {
            AuditError::IntegrityViolation {
                tenant_id,
                sequence,
                ..
            } => {
                assert_eq!(tenant_id.as_str(), "acme");
                assert_eq!(sequence, 2);
            }
            other => panic!("expected IntegrityViolation, got {other:?}"),
        }
    }

    #[test]
    fn entry_summary_projects_the_entry() {
        let entry = sample_entry();
        let summary = EntrySummary::from(&entry);
        assert_eq!(summary.sequence, entry.sequence);
        assert_eq!(summary.hash, entry.hash);
        assert_eq!(summary.action, "lead.created");
        assert_eq!(summary.created_at, entry.created_at);
    }

    // ── Config ───────────────────────────────────────────────────────────────

    #[test]
    fn empty_toml_yields_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config.append.max_attempts, 5);
        assert_eq!(config.verify.batch_size, 256);
        assert_eq!(config.query.default_page_size, 50);
        assert_eq!(config.query.max_page_size, 500);
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config = EngineConfig::from_toml_str(
            r#"
            [append]
            max_attempts = 9

            [query]
            max_page_size = 100
            "#,
        )
        .unwrap();
        assert_eq!(config.append.max_attempts, 9);
        assert_eq!(config.append.backoff_ms, 10);
        assert_eq!(config.query.max_page_size, 100);
        assert_eq!(config.query.default_page_size, 50);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = EngineConfig::from_toml_str("[append\nmax_attempts = ").unwrap_err();
        assert!(matches!(err, AuditError::Config { .. }));
    }

    #[test]
    fn backoff_grows_linearly_with_attempts() {
        let config = AppendConfig {
            max_attempts: 5,
            backoff_ms: 10,
        };
        assert_eq!(config.backoff(1).as_millis(), 10);
        assert_eq!(config.backoff(3).as_millis(), 30);
    }

    // ── Error display ────────────────────────────────────────────────────────

    #[test]
    fn error_chain_contention_display() {
        let err = AuditError::ChainContention {
            tenant_id: TenantId::new("acme"),
            attempts: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("acme"));
        assert!(msg.contains('5'));
    }

    #[test]
    fn error_validation_display() {
        let err = AuditError::Validation {
            reason: "actor must not be empty".to_string(),
        };
        assert!(err.to_string().contains("actor must not be empty"));
    }

    #[test]
    fn error_not_found_display() {
        let err = AuditError::NotFound {
            what: "entry with hash 'abcd'".to_string(),
        };
        assert!(err.to_string().contains("abcd"));
    }
}
