//! # custos-canonical
//!
//! Deterministic canonical encoding and SHA-256 entry digests for the
//! CUSTOS audit trail.
//!
//! ## Overview
//!
//! Chain verification only works if the same logical entry always hashes
//! to the same bytes — across processes, versions, and map orderings in
//! memory.  This crate owns that contract end to end:
//!
//! - [`canonicalize`] encodes an opaque JSON value with recursively sorted
//!   keys and fixed scalar formatting
//! - [`canonical_timestamp`] / [`format_timestamp`] pin timestamps to the
//!   UTC-millisecond profile that gets hashed and persisted
//! - [`hash_entry`] computes the SHA-256 digest over an explicit,
//!   documented byte layout covering every entry field except `hash`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use custos_canonical::hash_entry;
//!
//! let digest = hash_entry(&entry)?;
//! assert_eq!(digest, entry.hash);
//! ```

pub mod digest;
pub mod encode;
pub mod time;

pub use digest::hash_entry;
pub use encode::{canonicalize, MAX_DEPTH};
pub use time::{canonical_timestamp, format_timestamp};
