//! Health classification.
//!
//! One pass, in order:
//! 1. reachability pre-flight (unreachable → Unhealthy, nothing else is called)
//! 2. client version (informational)
//! 3. latest block and peer count (mandatory, failure → Unhealthy)
//! 4. sync status, network id, block age (best-effort, failure → unknown)
//! 5. peer thresholds: 0 → Unhealthy, 1 → Degraded, 2+ → Healthy
//!
//! A stale head block is reported as a warning and never changes the verdict.

use std::time::Duration;

use chrono::{DateTime, Utc};

use ethprobe_core::transport::{Reachability, RpcTransport};

use crate::probes::{NodeProbes, SyncStatus};
use crate::report::{format_age, HealthReport, Verdict};

/// Fewest peers for a Healthy verdict.
pub const MIN_HEALTHY_PEERS: u64 = 2;

/// Head blocks older than this are flagged while the node claims to be synced.
pub const STALE_BLOCK_AGE: Duration = Duration::from_secs(60 * 60);

/// Peer-count thresholds on their own.
pub fn classify_peers(peer_count: u64) -> Verdict {
    match peer_count {
        0 => Verdict::Unhealthy,
        n if n < MIN_HEALTHY_PEERS => Verdict::Degraded,
        _ => Verdict::Healthy,
    }
}

/// Runs the probes against one transport and builds a [`HealthReport`].
pub struct HealthEvaluator<'a, T: ?Sized> {
    transport: &'a T,
}

impl<'a, T: RpcTransport + ?Sized> HealthEvaluator<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    pub async fn evaluate(&self) -> HealthReport {
        self.evaluate_at(Utc::now()).await
    }

    /// Evaluate with an explicit clock reading for the block-age check.
    pub async fn evaluate_at(&self, now: DateTime<Utc>) -> HealthReport {
        let url = self.transport.url();
        let mut report = HealthReport::new(url);

        if let Reachability::Unreachable { reason } = self.transport.reachability().await {
            tracing::error!(url, %reason, "endpoint unreachable");
            report.reachable = false;
            report.fail(format!("Execution RPC endpoint at {url} is not reachable: {reason}"));
            report.troubleshooting = troubleshooting(url);
            return report;
        }

        let probes = NodeProbes::new(self.transport);

        match probes.client_version().await {
            Ok(version) => report.client_version = Some(version),
            Err(e) => report.warn(format!("Failed to get client version: {e}")),
        }

        match probes.latest_block_number().await {
            Ok(block) => report.latest_block = Some(block),
            Err(e) => report.fail(format!("Failed to get latest block number: {e}")),
        }

        match probes.peer_count().await {
            Ok(peers) => report.peer_count = Some(peers),
            Err(e) => report.fail(format!("Failed to get peer count: {e}")),
        }

        match probes.sync_status().await {
            Ok(status) => {
                if let SyncStatus::Syncing(p) = status {
                    report.warn(format!(
                        "Node is syncing: {:.2}% complete ({}/{} blocks)",
                        p.percent(),
                        p.current,
                        p.highest
                    ));
                }
                report.sync = Some(status);
            }
            Err(e) => report.warn(format!("Failed to get sync status: {e}")),
        }

        match probes.network_id().await {
            Ok(network) => report.network = Some(network),
            Err(e) => report.warn(format!("Failed to get network ID: {e}")),
        }

        if let Some(block) = report.latest_block {
            match probes.block_timestamp(block).await {
                Ok(timestamp) => {
                    let age = block_age(timestamp, now);
                    report.last_block_age = Some(age);
                    if age > STALE_BLOCK_AGE && report.sync == Some(SyncStatus::Synced) {
                        report.warn(format!(
                            "Last block is over an hour old ({} ago)",
                            format_age(age)
                        ));
                    }
                }
                Err(e) => report.warn(format!("Failed to get block timestamp: {e}")),
            }
        }

        if let Some(peers) = report.peer_count {
            match classify_peers(peers) {
                Verdict::Unhealthy => report.warn("No peers connected"),
                Verdict::Degraded => report.warn(format!(
                    "Low peer count: {peers} (minimum for healthy: {MIN_HEALTHY_PEERS})"
                )),
                Verdict::Healthy => {}
            }
            report.verdict = report.verdict.worst(classify_peers(peers));
        }

        tracing::info!(url, verdict = %report.verdict, "health check finished");
        report
    }
}

fn block_age(timestamp: u64, now: DateTime<Utc>) -> Duration {
    let block_secs = i64::try_from(timestamp).unwrap_or(i64::MAX);
    let age = now.timestamp().saturating_sub(block_secs).max(0);
    Duration::from_secs(age as u64)
}

fn troubleshooting(url: &str) -> Vec<String> {
    vec![
        "Check if the Geth pod is running:\n   kubectl get pod geth-0".into(),
        "Check Geth pod logs:\n   kubectl logs geth-0".into(),
        "Verify the service definition:\n   kubectl get svc geth -o yaml".into(),
        "Try port-forwarding directly to the pod:\n   kubectl port-forward pod/geth-0 8545:8545"
            .into(),
        format!("Confirm HTTP-RPC is enabled on the node and reachable at {url}"),
    ]
}
