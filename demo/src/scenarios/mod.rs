//! The three demo scenarios, each a self-contained walk through the
//! CUSTOS services over a fresh in-memory store.

pub mod contention;
pub mod lifecycle;
pub mod tamper;

use std::sync::Arc;

use custos_append::AppendService;
use custos_contracts::EngineConfig;
use custos_query::QueryService;
use custos_store::MemoryChainStore;
use custos_verify::ChainVerifier;

/// Wire the full service stack over one shared in-memory store.
pub fn build_stack(
    config: EngineConfig,
) -> (
    Arc<MemoryChainStore>,
    AppendService,
    ChainVerifier,
    QueryService,
) {
    let store = Arc::new(MemoryChainStore::new());
    let appender = AppendService::new(store.clone(), config.append);
    let verifier = ChainVerifier::new(store.clone(), config.verify);
    let query = QueryService::new(store.clone(), config.query);
    (store, appender, verifier, query)
}
