//! `status` subcommand — show strip power, color, and pixel count.

use super::{
    Config, Result, StatusOutput, codec, connect, kv, kv_indent, kv_width, resolve_host,
};

/// Collect a status snapshot from the device.
fn collect_status(host: Option<&str>, config: &Config) -> Result<StatusOutput> {
    let host = resolve_host(host, config)?;
    let mut bridge = connect(Some(&host), config)?;
    let (h, s, v) = bridge.current_hsv()?;
    let color = bridge.state().first().copied().unwrap_or(codec::BLACK);

    Ok(StatusOutput {
        version: env!("CARGO_PKG_VERSION").to_string(),
        host,
        pixels: bridge.len(),
        power: if bridge.is_on() { "on" } else { "off" }.to_string(),
        color: codec::format_color(color),
        hue: h,
        saturation: s * 100.0,
        brightness: (v * 100.0).round() as i32,
    })
}

fn print_status(output: &StatusOutput, json: bool) -> Result<()> {
    if json {
        let json_str = serde_json::to_string_pretty(output)
            .map_err(|e| super::BridgeError::Config(format!("JSON serialization failed: {e}")))?;
        println!("{json_str}");
        return Ok(());
    }

    let w = kv_width(
        &["Version:", "Host:", "Strip:"],
        &["Pixels:", "Color:", "Hue:", "Saturation:", "Brightness:"],
    );

    kv("Version:", &output.version, w);
    kv("Host:", &output.host, w);
    println!();

    kv("Strip:", output.power.to_uppercase(), w);
    kv_indent("Pixels:", output.pixels, w);
    kv_indent("Color:", &output.color, w);
    kv_indent("Hue:", format!("{:.1}", output.hue), w);
    kv_indent("Saturation:", format!("{:.0}%", output.saturation), w);
    kv_indent("Brightness:", format!("{}%", output.brightness), w);

    Ok(())
}

pub(super) fn cmd_status(json: bool, host: Option<&str>, config: &Config) -> Result<()> {
    let output = collect_status(host, config)?;
    print_status(&output, json)
}
