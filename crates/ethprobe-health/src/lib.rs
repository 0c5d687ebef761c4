//! ethprobe-health — node probes, health classification and reporting.
//!
//! ```text
//! Reporter ← HealthEvaluator ← NodeProbes ← RpcTransport
//! ```

pub mod evaluator;
pub mod log;
pub mod probes;
pub mod report;
pub mod reporter;

pub use evaluator::{classify_peers, HealthEvaluator, MIN_HEALTHY_PEERS, STALE_BLOCK_AGE};
pub use log::{FileLog, LogSink, MemoryLog};
pub use probes::{NetworkId, NodeProbes, SyncProgress, SyncStatus};
pub use report::{Finding, HealthReport, Level, Verdict};
pub use reporter::Reporter;
