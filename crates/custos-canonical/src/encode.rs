//! Canonical JSON byte encoding.
//!
//! `canonicalize` turns a `serde_json::Value` into a byte sequence that is
//! identical for identical logical content, regardless of how the value was
//! built in memory:
//!
//! - object keys are sorted bytewise, recursively
//! - no insignificant whitespace
//! - integers render as-is; floats must be finite and render in their
//!   shortest round-trip form
//! - strings use serde_json's escaping, which is itself deterministic
//!
//! This determinism is the load-bearing property of the whole subsystem:
//! if two encodings of the same logical entry differ, verification falsely
//! reports tampering.

use custos_contracts::{AuditError, AuditResult};
use serde_json::Value;

/// Maximum nesting depth accepted by the encoder.
///
/// Audit metadata is shallow in practice; the bound exists so a
/// pathological payload cannot overflow the stack during recursion.
pub const MAX_DEPTH: usize = 128;

/// Encode `value` into canonical bytes.
///
/// Fails with `AuditError::Encoding` when the value contains a non-finite
/// number or nests deeper than [`MAX_DEPTH`].
pub fn canonicalize(value: &Value) -> AuditResult<Vec<u8>> {
    let mut out = Vec::new();
    write_value(value, &mut out, 0)?;
    Ok(out)
}

fn write_value(value: &Value, out: &mut Vec<u8>, depth: usize) -> AuditResult<()> {
    if depth > MAX_DEPTH {
        return Err(AuditError::Encoding {
            reason: format!("nesting depth exceeds the canonical bound of {MAX_DEPTH}"),
        });
    }

    match value {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),

        Value::Number(n) => {
            // serde_json numbers are finite by construction, but the
            // canonical contract requires the check — a non-finite value
            // has no stable textual form.
            if !n.is_i64() && !n.is_u64() {
                match n.as_f64() {
                    Some(f) if f.is_finite() => {}
                    _ => {
                        return Err(AuditError::Encoding {
                            reason: format!("non-finite number '{n}' cannot be canonicalized"),
                        })
                    }
                }
            }
            out.extend_from_slice(n.to_string().as_bytes());
        }

        Value::String(s) => write_string(s, out),

        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(item, out, depth + 1)?;
            }
            out.push(b']');
        }

        Value::Object(map) => {
            // Sort keys explicitly rather than relying on the map's
            // iteration order, so the encoding is stable even when
            // serde_json is built with insertion-order maps.
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();

            out.push(b'{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_string(key, out);
                out.push(b':');
                // Key presence is guaranteed: we are iterating the map's
                // own keys.
                if let Some(v) = map.get(key.as_str()) {
                    write_value(v, out, depth + 1)?;
                }
            }
            out.push(b'}');
        }
    }

    Ok(())
}

/// Write a JSON string literal, delegating escaping to serde_json.
fn write_string(s: &str, out: &mut Vec<u8>) {
    // Serializing a bare &str cannot fail.
    match serde_json::to_string(s) {
        Ok(quoted) => out.extend_from_slice(quoted.as_bytes()),
        Err(_) => unreachable!("string serialization is infallible"),
    }
}
