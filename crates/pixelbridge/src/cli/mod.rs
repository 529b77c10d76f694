//! CLI subcommands — strip status, power, color, identify, watch.

mod config_cmd;
mod identify_cmd;
mod power;
mod set;
mod status;
mod watch;

use clap::Subcommand;
use serde::Serialize;

pub(super) use crate::RUNNING;
pub(super) use pixelbridge_lib::BridgeError;
pub(super) use pixelbridge_lib::bridge::ColorBridge;
pub(super) use pixelbridge_lib::client::HttpStripClient;
pub(super) use pixelbridge_lib::codec;
pub(super) use pixelbridge_lib::config::Config;
pub(super) use pixelbridge_lib::error::Result;

const PADDING: usize = 2;

/// Compute alignment width for a command's key-value output.
/// Ensures at least PADDING spaces after the longest key in either level,
/// with top-level and indent values aligned to the same column.
pub(super) fn kv_width(top: &[&str], indent: &[&str]) -> usize {
    let top_max = top.iter().map(|k| k.len()).max().unwrap_or(0);
    let indent_max = indent.iter().map(|k| k.len()).max().unwrap_or(0);
    let top_need = if top.is_empty() { 0 } else { top_max + PADDING };
    // Indent keys lose 2 chars of inner width to the "  " prefix
    let indent_need = if indent.is_empty() {
        0
    } else {
        indent_max + PADDING + 2
    };
    top_need.max(indent_need)
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{key:<width$}{value}", width = w);
}

pub(super) fn kv_indent(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("  {key:<width$}{value}", width = w - 2);
}

// ── JSON output structs ──

#[derive(Debug, Serialize)]
pub(super) struct StatusOutput {
    pub version: String,
    pub host: String,
    pub pixels: usize,
    pub power: String,
    pub color: String,
    pub hue: f64,
    pub saturation: f64,
    pub brightness: i32,
}

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show strip status (power, color, pixel count)
    Status,

    /// Turn the strip on, restoring the last on-color
    On,

    /// Turn the strip off
    Off,

    /// Set a solid color across all pixels
    Set {
        /// Color as hex (#RRGGBB) or a name (red, green, blue, ...)
        color: String,
    },

    /// Blink the strip so it can be located, then restore its state
    Identify,

    /// Poll strip status at an interval until Ctrl+C
    Watch {
        /// Poll interval in milliseconds (default: from config)
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Show current configuration and file paths
    Config,
}

/// Warn if `--json` was passed to a command that doesn't support it.
fn warn_json_unsupported(cmd_name: &str) {
    log::warn!("--json is not supported for `{cmd_name}` (ignored)");
}

/// Resolve the device host: CLI flag wins, then the config file.
pub(super) fn resolve_host(host: Option<&str>, config: &Config) -> Result<String> {
    match host {
        Some(h) => Ok(h.to_string()),
        None if !config.host.trim().is_empty() => Ok(config.host.clone()),
        None => Err(BridgeError::Config(
            "no device host configured (set `host` in the config file or pass --host)".into(),
        )),
    }
}

/// Resolve the host and construct an initialized bridge.
pub(super) fn connect(
    host: Option<&str>,
    config: &Config,
) -> Result<ColorBridge<HttpStripClient>> {
    let host = resolve_host(host, config)?;
    let client = HttpStripClient::new(&host)?;
    Ok(ColorBridge::new(client)?)
}

pub fn run(cmd: Command, json: bool, host: Option<&str>) -> Result<()> {
    let config = Config::load();
    match cmd {
        Command::Status => status::cmd_status(json, host, &config),
        Command::On => {
            if json {
                warn_json_unsupported("on");
            }
            power::cmd_power(host, &config, true)
        }
        Command::Off => {
            if json {
                warn_json_unsupported("off");
            }
            power::cmd_power(host, &config, false)
        }
        Command::Set { color } => {
            if json {
                warn_json_unsupported("set");
            }
            set::cmd_set(host, &config, &color)
        }
        Command::Identify => {
            if json {
                warn_json_unsupported("identify");
            }
            identify_cmd::cmd_identify(host, &config)
        }
        Command::Watch { interval_ms } => {
            if json {
                warn_json_unsupported("watch");
            }
            watch::cmd_watch(host, &config, interval_ms)
        }
        Command::Config => config_cmd::cmd_config(json),
    }
}
