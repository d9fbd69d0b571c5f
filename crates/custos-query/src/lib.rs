//! # custos-query
//!
//! Read-only query surface for the CUSTOS audit trail.
//!
//! [`QueryService`] serves audit and observability UIs: filtered,
//! cursor-paginated listings plus direct lookup by entry hash.  Page
//! limits are clamped to the configured maximum so no caller can pull an
//! unbounded result set.  Queries never mutate chain state.

pub mod service;

pub use service::QueryService;
