//! Engine configuration, loadable from TOML.
//!
//! All fields have serde defaults, so an empty document (or a partial one)
//! yields a usable configuration.  Example:
//!
//! ```toml
//! [append]
//! max_attempts = 5
//! backoff_ms = 10
//!
//! [verify]
//! batch_size = 256
//!
//! [query]
//! default_page_size = 50
//! max_page_size = 500
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AuditError, AuditResult};

/// Top-level configuration for the CUSTOS engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub append: AppendConfig,
    pub verify: VerifyConfig,
    pub query: QueryConfig,
}

impl EngineConfig {
    /// Parse `s` as TOML and build an `EngineConfig`.
    ///
    /// Returns `AuditError::Config` if the TOML is malformed or does not
    /// match the expected schema.
    pub fn from_toml_str(s: &str) -> AuditResult<Self> {
        toml::from_str(s).map_err(|e| AuditError::Config {
            reason: format!("failed to parse engine TOML: {}", e),
        })
    }

    /// Read the file at `path` and parse it as TOML configuration.
    pub fn from_file(path: &Path) -> AuditResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| AuditError::Config {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }
}

/// Tuning for the append service's optimistic retry loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppendConfig {
    /// Maximum number of insert attempts before surfacing
    /// `ChainContention`.  Must be at least 1.
    pub max_attempts: u32,

    /// Base backoff between attempts, in milliseconds.  The wait grows
    /// linearly with the attempt number.
    pub backoff_ms: u64,
}

impl AppendConfig {
    /// The backoff to wait after losing attempt number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.backoff_ms.saturating_mul(u64::from(attempt)))
    }
}

impl Default for AppendConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_ms: 10,
        }
    }
}

/// Tuning for the verification service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Entries fetched per store round-trip while streaming a chain.
    /// Bounds verification memory regardless of chain length.
    pub batch_size: usize,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self { batch_size: 256 }
    }
}

/// Tuning for the query service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Page size used when the caller requests 0.
    pub default_page_size: usize,

    /// Hard ceiling on page size; caller-requested limits are clamped to
    /// this to bound response size for long histories.
    pub max_page_size: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: 50,
            max_page_size: 500,
        }
    }
}
