//! `on` / `off` subcommands — toggle strip power.

use super::{Config, Result, codec, connect};

pub(super) fn cmd_power(host: Option<&str>, config: &Config, on: bool) -> Result<()> {
    let mut bridge = connect(host, config)?;
    if on {
        bridge.turn_on()?;
    } else {
        bridge.turn_off()?;
    }

    let color = bridge.state().first().copied().unwrap_or(codec::BLACK);
    if bridge.is_on() {
        println!("Strip: ON ({})", codec::format_color(color));
    } else {
        println!("Strip: OFF");
    }
    Ok(())
}
