//! Run configuration shared by every layer.

use std::path::PathBuf;
use std::time::Duration;

use crate::policy::RetryConfig;

pub const DEFAULT_EXECUTION_URL: &str = "http://localhost:8545";
pub const DEFAULT_CONSENSUS_URL: &str = "http://localhost:5052";

/// Configuration for one health-check run. Immutable once built.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Execution-layer JSON-RPC endpoint.
    pub execution_url: String,
    /// Consensus-layer endpoint. Reported but not used by the health logic.
    pub consensus_url: String,
    /// Append-only health log.
    pub log_file: PathBuf,
    /// Hard deadline per JSON-RPC attempt.
    pub timeout: Duration,
    /// Deadline for the pre-flight reachability GET.
    pub reachability_timeout: Duration,
    pub retry: RetryConfig,
    /// Print request and response bodies to stdout.
    pub debug: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            execution_url: DEFAULT_EXECUTION_URL.into(),
            consensus_url: DEFAULT_CONSENSUS_URL.into(),
            log_file: default_log_file(),
            timeout: Duration::from_secs(10),
            reachability_timeout: Duration::from_secs(2),
            retry: RetryConfig::default(),
            debug: false,
        }
    }
}

/// `$HOME/.ethereum/health-check.log`, or relative to the working directory
/// when no home directory is known.
pub fn default_log_file() -> PathBuf {
    let home = std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    home.join(".ethereum").join("health-check.log")
}
