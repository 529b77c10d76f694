//! `watch` subcommand — poll strip status until Ctrl+C.

use std::sync::atomic::Ordering;
use std::time::Duration;

use pixelbridge_lib::bridge::ColorBridge;
use pixelbridge_lib::client::HttpStripClient;

use super::{Config, RUNNING, Result, codec, resolve_host};

pub(super) fn cmd_watch(
    host: Option<&str>,
    config: &Config,
    interval_ms: Option<u64>,
) -> Result<()> {
    let interval = Duration::from_millis(interval_ms.unwrap_or(config.watch_interval_ms).max(1));
    let host = resolve_host(host, config)?;
    let client = HttpStripClient::new(&host)?;
    let mut bridge = ColorBridge::new(client)?;

    println!(
        "Watching {host} ({} pixels, every {}ms) — Ctrl+C to stop",
        bridge.len(),
        interval.as_millis()
    );

    while RUNNING.load(Ordering::SeqCst) {
        match bridge.current_hsv() {
            Ok(_) => {
                let color = bridge.state().first().copied().unwrap_or(codec::BLACK);
                if bridge.is_on() {
                    println!("  ON  {}", codec::format_color(color));
                } else {
                    println!("  OFF");
                }
            }
            Err(e) => log::warn!("poll failed: {e}"),
        }
        std::thread::sleep(interval);
    }
    Ok(())
}
