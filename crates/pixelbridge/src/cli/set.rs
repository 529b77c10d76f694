//! `set` subcommand — apply a solid color to every pixel.

use super::{Config, Result, codec, connect};

pub(super) fn cmd_set(host: Option<&str>, config: &Config, color: &str) -> Result<()> {
    // Parse before touching the network so a typo fails fast
    let color = codec::parse_color(color)?;
    let mut bridge = connect(host, config)?;
    bridge.set_solid(color)?;
    println!(
        "Color: {} on {} pixel{}",
        codec::format_color(color),
        bridge.len(),
        if bridge.len() == 1 { "" } else { "s" }
    );
    Ok(())
}
