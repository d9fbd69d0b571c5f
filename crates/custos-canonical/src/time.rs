//! The canonical timestamp profile: UTC, millisecond precision.
//!
//! An entry's `created_at` is truncated to this profile *before* hashing
//! and persisted exactly as hashed.  Trusting a storage-assigned timestamp
//! to match the hashed one is how verification comes to fail for reasons
//! unrelated to tampering — the engine never does that.

use chrono::{DateTime, Utc};

/// Truncate `t` to millisecond precision.
///
/// Idempotent: a value already on the profile is returned unchanged.
pub fn canonical_timestamp(t: DateTime<Utc>) -> DateTime<Utc> {
    let extra_nanos = t.timestamp_subsec_nanos() % 1_000_000;
    t - chrono::Duration::nanoseconds(i64::from(extra_nanos))
}

/// Render `t` in the canonical profile: `YYYY-MM-DDTHH:MM:SS.mmmZ`.
///
/// Exactly three fractional digits and a literal `Z`, so the same instant
/// always produces the same bytes.
pub fn format_timestamp(t: &DateTime<Utc>) -> String {
    t.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn truncation_drops_sub_millisecond_precision() {
        let t = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let truncated = canonical_timestamp(t);

        assert_eq!(truncated.timestamp_subsec_nanos(), 123_000_000);
        assert_eq!(truncated.timestamp(), t.timestamp());
    }

    #[test]
    fn truncation_is_idempotent() {
        let t = canonical_timestamp(Utc::now());
        assert_eq!(canonical_timestamp(t), t);
    }

    #[test]
    fn format_has_three_fraction_digits_and_z() {
        let t = Utc.timestamp_opt(1_700_000_000, 7_000_000).unwrap();
        let rendered = format_timestamp(&t);

        assert!(rendered.ends_with("Z"));
        let fraction = rendered
            .rsplit('.')
            .next()
            .unwrap()
            .trim_end_matches('Z');
        assert_eq!(fraction.len(), 3, "rendered: {rendered}");
        assert_eq!(fraction, "007");
    }

    #[test]
    fn same_instant_always_renders_identically() {
        let t = canonical_timestamp(Utc::now());
        assert_eq!(format_timestamp(&t), format_timestamp(&t));
    }
}
