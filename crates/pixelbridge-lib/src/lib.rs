//! PixelBridge — HomeKit-style color control for WiFi NeoPixel LED strips.

pub mod bridge;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod identify;
pub mod observe;
pub mod responder;

pub use error::BridgeError;
