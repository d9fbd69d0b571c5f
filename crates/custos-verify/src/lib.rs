//! # custos-verify
//!
//! Streaming integrity verification for the CUSTOS audit trail.
//!
//! ## Overview
//!
//! [`ChainVerifier`] replays a tenant's chain in ascending order and
//! checks, per entry: sequence contiguity, prev-hash linkage, and the
//! stored digest against a fresh recomputation.  The first mismatch
//! stops the scan and is reported with its sequence and fault kind.
//!
//! Replays stream through the store in bounded batches, so memory use
//! stays flat regardless of chain length.  A report's `head` doubles as
//! a checkpoint: feed it back to
//! [`verify_from`](ChainVerifier::verify_from) to re-check only the
//! entries appended since.
//!
//! Verification is strictly read-only.  A detected violation is
//! evidence to be preserved, not repaired.

pub mod engine;

pub use engine::ChainVerifier;
