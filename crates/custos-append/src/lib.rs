//! # custos-append
//!
//! Atomic, hash-linked append service for the CUSTOS audit trail.
//!
//! ## Overview
//!
//! Business modules call [`AppendService::append`] after completing their
//! own write.  The service validates the payload, links it to the
//! tenant's current head, computes its SHA-256 digest over the canonical
//! encoding, and commits it — retrying with backoff when a concurrent
//! writer wins the per-tenant race, up to a bounded budget.
//!
//! The producer never sees hashing, sequencing, or chains; it hands over
//! who did what to which entity and gets back the committed entry.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use custos_append::AppendService;
//! use custos_contracts::{AppendConfig, AppendRequest, TenantId};
//!
//! let service = AppendService::new(store, AppendConfig::default());
//! let entry = service.append(
//!     &TenantId::new("acme"),
//!     AppendRequest::new("user-7", "timesheet.approved", "timesheet", "ts-312"),
//! )?;
//! ```

pub mod service;
mod validate;

pub use service::AppendService;
