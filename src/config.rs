use anyhow::{anyhow, Result};
use clap::Parser;
use std::{ffi::OsString, path::PathBuf, time::Duration};

use crate::theme::ColorScheme;

/// blockrain - falling-text visualizer for a Monero daemon
///
/// Watches the daemon's ZMQ pub socket and JSON-RPC socket and rains block and
/// mempool hashes down the terminal.
/// Configuration priority: CLI args > Environment variables > Defaults
#[derive(Parser, Debug)]
#[command(name = "blockrain")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Falling-text visualizer for a Monero daemon", long_about = None)]
pub struct CliArgs {
    /// Daemon ZMQ pub socket (e.g. tcp://127.0.0.1:18083)
    #[arg(env = "BLOCKRAIN_PUB")]
    pub pub_address: String,

    /// Daemon ZMQ JSON-RPC socket (e.g. tcp://127.0.0.1:18082)
    #[arg(env = "BLOCKRAIN_RPC")]
    pub rpc_address: String,

    /// Color scheme: auto, monero, monero_alt, standard
    #[arg(env = "BLOCKRAIN_COLORS", default_value = "auto")]
    pub color_scheme: String,

    /// RPC reply timeout in milliseconds (1000-600000)
    #[arg(long, env = "BLOCKRAIN_RPC_TIMEOUT_MS")]
    pub rpc_timeout_ms: Option<u64>,

    /// Write logs to this file (RUST_LOG sets the filter)
    #[arg(long, env = "BLOCKRAIN_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub pub_address: String,
    pub rpc_address: String,
    pub color_scheme: ColorScheme,
    pub rpc_timeout: Duration,
    pub log_file: Option<PathBuf>,
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// Validate ZMQ endpoint format (basic check)
fn validate_address(address: &str, name: &str) -> Result<()> {
    if address.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }

    if address.starts_with("tcp://")
        || address.starts_with("ipc://")
        || address.starts_with("inproc://")
    {
        Ok(())
    } else {
        Err(anyhow!(
            "{name} must start with tcp://, ipc://, or inproc://, got '{address}'"
        ))
    }
}

/// Load configuration from CLI args and environment variables
pub fn load() -> Result<Config> {
    from_cli(CliArgs::parse())
}

/// Parse an explicit argument list (first item is the program name)
pub fn from_args<I, T>(args: I) -> Result<Config>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    from_cli(CliArgs::try_parse_from(args)?)
}

fn from_cli(args: CliArgs) -> Result<Config> {
    validate_address(&args.pub_address, "pub address")?;
    validate_address(&args.rpc_address, "rpc address")?;

    let color_scheme: ColorScheme = args.color_scheme.parse().map_err(|e: String| anyhow!(e))?;

    let rpc_timeout_ms = args.rpc_timeout_ms.unwrap_or(30_000);
    let rpc_timeout_ms =
        validate_in_range(rpc_timeout_ms, 1000, 600_000, "BLOCKRAIN_RPC_TIMEOUT_MS")?;

    Ok(Config {
        pub_address: args.pub_address,
        rpc_address: args.rpc_address,
        color_scheme,
        rpc_timeout: Duration::from_millis(rpc_timeout_ms),
        log_file: args.log_file,
    })
}

impl Config {
    /// Human readable configuration, one setting per line.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            "blockrain configuration:".to_string(),
            format!("  Pub socket: {}", self.pub_address),
            format!("  RPC socket: {}", self.rpc_address),
            format!("  Color scheme: {}", self.color_scheme),
            format!("  RPC timeout: {}ms", self.rpc_timeout.as_millis()),
        ];
        if let Some(path) = &self.log_file {
            lines.push(format!("  Log file: {}", path.display()));
        }
        lines
    }

    /// Logs the configuration at debug level; stderr belongs to the display.
    pub fn print_summary(&self) {
        for line in self.summary_lines() {
            log::debug!("{line}");
        }
    }
}
