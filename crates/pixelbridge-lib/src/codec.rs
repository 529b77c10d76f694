//! Wire codec — packed `0xAARRGGBB` words exchanged with the strip device.
//!
//! The device speaks 32-bit color words, most-significant byte first:
//! alpha (always written fully opaque, ignored on read), then red, green,
//! blue. Everything else in the crate works in [`Srgb<u8>`] and converts
//! through HSV at the accessory boundary.

use palette::{FromColor, Hsv, Srgb};

/// Solid red — the default on-color for a strip first seen dark.
pub const RED: Srgb<u8> = Srgb::new(255, 0, 0);

/// All channels zero.
pub const BLACK: Srgb<u8> = Srgb::new(0, 0, 0);

/// Unpack a device word into a color. Alpha is discarded.
pub fn decode(word: u32) -> Srgb<u8> {
    Srgb::new((word >> 16) as u8, (word >> 8) as u8, word as u8)
}

/// Pack a color into a device word with alpha forced fully opaque.
pub fn encode(color: Srgb<u8>) -> u32 {
    0xFF00_0000 | (color.red as u32) << 16 | (color.green as u32) << 8 | color.blue as u32
}

/// Element-wise [`decode`], preserving order and length.
pub fn decode_all(words: &[u32]) -> Vec<Srgb<u8>> {
    words.iter().map(|&w| decode(w)).collect()
}

/// Element-wise [`encode`], preserving order and length.
pub fn encode_all(colors: &[Srgb<u8>]) -> Vec<u32> {
    colors.iter().map(|&c| encode(c)).collect()
}

/// HSV decomposition: hue in degrees [0, 360), saturation and value in [0, 1].
pub fn hsv_of(color: Srgb<u8>) -> (f64, f64, f64) {
    let hsv = Hsv::from_color(color.into_format::<f32>());
    (
        hsv.hue.into_positive_degrees() as f64,
        hsv.saturation as f64,
        hsv.value as f64,
    )
}

/// Build a color from HSV components (hue in degrees, sat/val in [0, 1]).
pub fn from_hsv(h: f64, s: f64, v: f64) -> Srgb<u8> {
    let hsv = Hsv::new(h as f32, s as f32, v as f32);
    Srgb::from_color(hsv).into_format()
}

/// Parse a color string.
///
/// Accepts:
/// - Hex: `"#FF0000"`, `"FF0000"`, `"#ff0000"`
/// - Named: `"red"`, `"green"`, `"blue"`, `"white"`, `"orange"`, `"yellow"`,
///   `"purple"`, `"cyan"`, `"black"`/`"off"`
pub fn parse_color(s: &str) -> crate::error::Result<Srgb<u8>> {
    let s = s.trim();

    // Named colors
    match s.to_lowercase().as_str() {
        "red" => return Ok(Srgb::new(0xFF, 0x00, 0x00)),
        "green" => return Ok(Srgb::new(0x00, 0xFF, 0x00)),
        "blue" => return Ok(Srgb::new(0x00, 0x00, 0xFF)),
        "white" => return Ok(Srgb::new(0xFF, 0xFF, 0xFF)),
        "orange" => return Ok(Srgb::new(0xFF, 0x80, 0x00)),
        "yellow" => return Ok(Srgb::new(0xFF, 0xFF, 0x00)),
        "purple" => return Ok(Srgb::new(0x80, 0x00, 0xFF)),
        "cyan" => return Ok(Srgb::new(0x00, 0xFF, 0xFF)),
        "off" | "black" => return Ok(BLACK),
        _ => {}
    }

    // Hex color
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 {
        return Err(crate::BridgeError::Color(format!(
            "Invalid color: {s} (use #RRGGBB or a color name)"
        )));
    }
    let val = u32::from_str_radix(hex, 16)
        .map_err(|_| crate::BridgeError::Color(format!("Invalid hex color: {s}")))?;
    Ok(decode(val))
}

/// Format a color as `#RRGGBB`.
pub fn format_color(color: Srgb<u8>) -> String {
    format!("#{:02X}{:02X}{:02X}", color.red, color.green, color.blue)
}
