//! The outcome of one health-check run.

use std::time::Duration;

use crate::probes::{NetworkId, SyncProgress, SyncStatus};

/// Final classification of the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Healthy,
    Degraded,
    Unhealthy,
}

impl Verdict {
    /// Process exit code. Degraded and Unhealthy share `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Healthy => 0,
            Self::Degraded | Self::Unhealthy => 1,
        }
    }

    /// Log level of the verdict line.
    pub fn level(&self) -> Level {
        match self {
            Self::Healthy => Level::Info,
            Self::Degraded => Level::Warning,
            Self::Unhealthy => Level::Error,
        }
    }

    /// The worse of two verdicts.
    pub fn worst(self, other: Self) -> Self {
        use Verdict::*;
        match (self, other) {
            (Unhealthy, _) | (_, Unhealthy) => Unhealthy,
            (Degraded, _) | (_, Degraded) => Degraded,
            _ => Healthy,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "HEALTHY"),
            Self::Degraded => write!(f, "DEGRADED"),
            Self::Unhealthy => write!(f, "UNHEALTHY"),
        }
    }
}

/// Severity tag for findings and log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Something noteworthy observed during the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub level: Level,
    pub message: String,
}

impl Finding {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }
}

/// Facts gathered about the node plus the verdict. `None` means unknown.
#[derive(Debug, Clone)]
pub struct HealthReport {
    pub endpoint: String,
    pub reachable: bool,
    pub client_version: Option<String>,
    pub latest_block: Option<u64>,
    pub sync: Option<SyncStatus>,
    pub peer_count: Option<u64>,
    pub network: Option<NetworkId>,
    pub last_block_age: Option<Duration>,
    pub verdict: Verdict,
    pub findings: Vec<Finding>,
    /// Remediation steps; only filled when the endpoint was unreachable.
    pub troubleshooting: Vec<String>,
}

impl HealthReport {
    /// An empty report for `endpoint`; the evaluator fills it in.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            reachable: true,
            client_version: None,
            latest_block: None,
            sync: None,
            peer_count: None,
            network: None,
            last_block_age: None,
            verdict: Verdict::Healthy,
            findings: Vec::new(),
            troubleshooting: Vec::new(),
        }
    }

    pub fn is_syncing(&self) -> Option<bool> {
        self.sync.map(|s| s.is_syncing())
    }

    pub fn sync_progress(&self) -> Option<SyncProgress> {
        self.sync.and_then(|s| s.progress())
    }

    pub fn exit_code(&self) -> i32 {
        self.verdict.exit_code()
    }

    pub(crate) fn warn(&mut self, message: impl Into<String>) {
        self.findings.push(Finding::warning(message));
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.findings.push(Finding::error(message));
        self.verdict = Verdict::Unhealthy;
    }
}

/// Render a duration as `1h 2m 3s`, dropping leading zero units.
pub fn format_age(age: Duration) -> String {
    let secs = age.as_secs();
    let (h, m, s) = (secs / 3600, secs % 3600 / 60, secs % 60);
    match (h, m) {
        (0, 0) => format!("{s}s"),
        (0, _) => format!("{m}m {s}s"),
        _ => format!("{h}h {m}m {s}s"),
    }
}
