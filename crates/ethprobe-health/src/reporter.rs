//! Console rendering, log records and exit code for a [`HealthReport`].

use std::io::{self, Write};

use crate::log::LogSink;
use crate::probes::SyncStatus;
use crate::report::{format_age, HealthReport, Level};

const RULE: &str = "====================================";

pub struct Reporter<W, L> {
    out: W,
    log: L,
}

impl<W: Write, L: LogSink> Reporter<W, L> {
    pub fn new(out: W, log: L) -> Self {
        Self { out, log }
    }

    /// Render to the console, append to the log and return the exit code.
    ///
    /// Log write failures are reported but do not change the exit code.
    pub fn report(&mut self, report: &HealthReport) -> io::Result<i32> {
        self.render(report)?;
        if let Err(e) = self.write_log(report) {
            tracing::error!(error = %e, "failed to write health log");
            writeln!(self.out, "ERROR: failed to write health log: {e}")?;
        }
        Ok(report.exit_code())
    }

    /// Facts first, findings, troubleshooting, verdict banner last.
    pub fn render(&mut self, report: &HealthReport) -> io::Result<()> {
        let out = &mut self.out;
        writeln!(out, "{RULE}")?;
        writeln!(out, "  Ethereum Node Health Check")?;
        writeln!(out, "{RULE}")?;
        writeln!(out, "Endpoint:        {}", report.endpoint)?;

        if report.reachable {
            writeln!(out, "Client version:  {}", known(report.client_version.as_deref()))?;
            writeln!(out, "Latest block:    {}", known(report.latest_block))?;
            writeln!(out, "Sync status:     {}", sync_text(report.sync))?;
            writeln!(out, "Connected peers: {}", known(report.peer_count))?;
            writeln!(out, "Network:         {}", known(report.network.as_ref()))?;
            writeln!(
                out,
                "Last block age:  {}",
                known(report.last_block_age.map(format_age))
            )?;
        }

        if !report.findings.is_empty() {
            writeln!(out)?;
            for finding in &report.findings {
                writeln!(out, "{}: {}", finding.level, finding.message)?;
            }
        }

        if !report.troubleshooting.is_empty() {
            writeln!(out, "\nTroubleshooting steps:")?;
            for (i, step) in report.troubleshooting.iter().enumerate() {
                writeln!(out, "{}. {step}", i + 1)?;
            }
        }

        writeln!(out, "\n{RULE}")?;
        writeln!(out, "Node health status: {}", report.verdict)?;
        writeln!(out, "{RULE}")?;
        out.flush()
    }

    fn write_log(&mut self, report: &HealthReport) -> io::Result<()> {
        let log = &mut self.log;
        if let Some(version) = &report.client_version {
            log.record(Level::Info, &format!("Client version: {version}"))?;
        }
        if let Some(block) = report.latest_block {
            log.record(Level::Info, &format!("Latest block number: {block}"))?;
        }
        if let Some(peers) = report.peer_count {
            log.record(Level::Info, &format!("Connected peers: {peers}"))?;
        }
        if report.sync.is_some() {
            log.record(Level::Info, &format!("Node sync status: {}", sync_text(report.sync)))?;
        }
        if let Some(network) = &report.network {
            log.record(Level::Info, &format!("Network: {network}"))?;
        }
        for finding in &report.findings {
            log.record(finding.level, &finding.message)?;
        }
        log.record(
            report.verdict.level(),
            &format!("Node health status: {}", report.verdict),
        )
    }

    pub fn into_inner(self) -> (W, L) {
        (self.out, self.log)
    }
}

fn known<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "unknown".to_string(), |v| v.to_string())
}

fn sync_text(sync: Option<SyncStatus>) -> String {
    match sync {
        Some(SyncStatus::Synced) => "up to date".into(),
        Some(SyncStatus::Syncing(p)) => format!(
            "syncing, {:.2}% ({}/{} blocks)",
            p.percent(),
            p.current,
            p.highest
        ),
        None => "unknown".into(),
    }
}
