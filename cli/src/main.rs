//! ethprobe CLI — check an execution-layer node from the terminal.
//!
//! Usage:
//! ```bash
//! # Check the local node
//! ethprobe
//!
//! # Check a remote node with a shorter timeout and no retries
//! ethprobe --execution-url http://10.0.0.5:8545 --timeout 3 --retries 0
//!
//! # Same, configured through the environment
//! GETH_URL=http://10.0.0.5:30545 LOG_FILE=/var/log/eth-health.log DEBUG=true ethprobe
//! ```
//!
//! Exits 0 when the node is healthy, 1 otherwise.

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::builder::FalseyValueParser;
use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ethprobe_core::config::{self, ProbeConfig, DEFAULT_CONSENSUS_URL, DEFAULT_EXECUTION_URL};
use ethprobe_core::policy::RetryConfig;
use ethprobe_health::{FileLog, HealthEvaluator, Reporter};
use ethprobe_http::HttpRpcClient;

#[derive(Parser, Debug)]
#[command(
    name = "ethprobe",
    about = "Health check for an Ethereum execution-layer node",
    long_about = "
Queries an execution client over JSON-RPC (client version, latest block, sync
status, peer count, network id) and classifies it as HEALTHY, DEGRADED or
UNHEALTHY. Results are printed and appended to a log file.

Exit code: 0 when healthy, 1 otherwise.
",
    version
)]
struct Cli {
    /// Execution-layer JSON-RPC endpoint
    #[arg(long, env = "GETH_URL", default_value = DEFAULT_EXECUTION_URL)]
    execution_url: String,

    /// Consensus-layer endpoint (shown in the summary only)
    #[arg(long, env = "LIGHTHOUSE_URL", default_value = DEFAULT_CONSENSUS_URL)]
    consensus_url: String,

    /// Health log file [default: $HOME/.ethereum/health-check.log]
    #[arg(long, env = "LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Per-attempt JSON-RPC timeout in seconds
    #[arg(long, env = "RPC_TIMEOUT", default_value_t = 10)]
    timeout: u64,

    /// Retries after the first failed attempt
    #[arg(long, env = "RPC_RETRIES", default_value_t = 3)]
    retries: u32,

    /// Seconds to wait between attempts
    #[arg(long, env = "RPC_RETRY_DELAY", default_value_t = 2)]
    retry_delay: u64,

    /// Timeout in seconds for the pre-flight reachability check
    #[arg(long, env = "REACHABILITY_TIMEOUT", default_value_t = 2)]
    reachability_timeout: u64,

    /// Print request and response bodies
    #[arg(long, env = "DEBUG", value_parser = FalseyValueParser::new())]
    debug: bool,
}

impl Cli {
    fn into_config(self) -> ProbeConfig {
        ProbeConfig {
            execution_url: self.execution_url,
            consensus_url: self.consensus_url,
            log_file: self.log_file.unwrap_or_else(config::default_log_file),
            timeout: Duration::from_secs(self.timeout),
            reachability_timeout: Duration::from_secs(self.reachability_timeout),
            retry: RetryConfig {
                max_retries: self.retries,
                delay: Duration::from_secs(self.retry_delay),
            },
            debug: self.debug,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = match Cli::try_parse() {
        Ok(cli) => cli.into_config(),
        Err(e) => {
            let code = usage_exit_code(&e);
            let _ = e.print();
            process::exit(code);
        }
    };
    init_tracing(config.debug);

    match run(&config).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}

/// Help and version requests exit 0; every other argument or environment
/// error exits 1 like any failed check.
fn usage_exit_code(e: &clap::Error) -> i32 {
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(config: &ProbeConfig) -> Result<i32> {
    print_config(config);

    let log = FileLog::open(&config.log_file).context("opening health log")?;
    if log.path() != config.log_file {
        println!("Log file: {} (fallback)", log.path().display());
    }

    let client = HttpRpcClient::for_execution(config).context("building RPC client")?;
    println!("Checking if execution RPC endpoint is reachable...\n");
    let report = HealthEvaluator::new(&client).evaluate().await;

    let mut reporter = Reporter::new(std::io::stdout().lock(), log);
    let code = reporter.report(&report).context("writing report")?;
    Ok(code)
}

fn print_config(config: &ProbeConfig) {
    println!("Starting health check with the following configuration:");
    println!("  Execution URL: {}", config.execution_url);
    println!("  Consensus URL: {}", config.consensus_url);
    println!("  Log file:      {}", config.log_file.display());
    println!("  Timeout:       {:?}", config.timeout);
    println!("  Retries:       {}", config.retry.max_retries);
    println!("  Retry delay:   {:?}", config.retry.delay);
    if config.debug {
        println!("  Debug mode enabled");
    }
    println!();
}
