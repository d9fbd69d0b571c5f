//! # custos-store
//!
//! Append-only, per-tenant chain store abstraction for the CUSTOS audit
//! trail.
//!
//! ## Overview
//!
//! The [`ChainStore`] trait is the persistence seam the append,
//! verification, and query services are built on: get the current head,
//! insert the next entry (rejected on a stale sequence), and read the
//! chain back in order.  No update or delete is exposed — committed
//! entries are immutable by construction.
//!
//! [`MemoryChainStore`] is the reference implementation, modelling a
//! relational table with a uniqueness constraint on
//! `(tenant_id, sequence)` using one mutex per tenant chain.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use custos_store::{ChainStore, MemoryChainStore};
//!
//! let store = MemoryChainStore::new();
//! let head = store.head(&tenant)?;
//! store.insert(entry)?;
//! ```

pub mod memory;
pub mod traits;

pub use memory::MemoryChainStore;
pub use traits::ChainStore;
