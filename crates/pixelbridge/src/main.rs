//! PixelBridge CLI — HomeKit-style color control for WiFi NeoPixel LED strips.

use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;

mod cli;

/// Shared shutdown flag — set by Ctrl+C handler.
pub static RUNNING: AtomicBool = AtomicBool::new(true);

#[derive(Parser)]
#[command(
    name = "pixelbridge",
    version,
    about = "Color control bridge for WiFi NeoPixel LED strips"
)]
struct Args {
    /// Output as JSON (for status and config)
    #[arg(long, global = true)]
    json: bool,

    /// Device base URL (overrides the config file)
    #[arg(long, global = true)]
    host: Option<String>,

    #[command(subcommand)]
    command: cli::Command,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let args = Args::parse();

    ctrlc::set_handler(move || {
        RUNNING.store(false, Ordering::SeqCst);
    })
    .ok();

    if let Err(e) = cli::run(args.command, args.json, args.host.as_deref()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
