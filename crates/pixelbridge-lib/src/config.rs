//! Application configuration — TOML-based, platform-aware paths.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Header comment prepended to saved config files.
const CONFIG_HEADER: &str =
    "# PixelBridge configuration — changes made outside the app may be overwritten.\n\n";

/// Environment variable overriding the config file path.
pub const CONFIG_ENV: &str = "PIXELBRIDGE_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Device base URL (e.g. "http://192.168.1.50:8888"). Empty = must be
    /// provided on the command line.
    #[serde(default)]
    pub host: String,

    /// Accessory name advertised to the smart-home framework.
    #[serde(default = "default_accessory_name")]
    pub accessory_name: String,

    /// Pairing setup code (8 digits).
    #[serde(default = "default_setup_code")]
    pub setup_code: String,

    /// Poll interval for the `watch` subcommand, in milliseconds.
    #[serde(default = "default_watch_interval_ms")]
    pub watch_interval_ms: u64,
}

fn default_accessory_name() -> String {
    "WiFi NeoPixel".into()
}
fn default_setup_code() -> String {
    "12344321".into()
}
fn default_watch_interval_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: String::new(),
            accessory_name: default_accessory_name(),
            setup_code: default_setup_code(),
            watch_interval_ms: default_watch_interval_ms(),
        }
    }
}

/// Validation errors that [`Config::validate`] can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The `host` field is not a valid http/https URL.
    InvalidHost(String),
    /// The `setup_code` field is not exactly 8 digits.
    InvalidSetupCode(String),
    /// The `accessory_name` field is empty or whitespace-only.
    EmptyAccessoryName,
    /// The `watch_interval_ms` field is zero.
    ZeroWatchInterval,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidHost(e) => write!(f, "Invalid host: {e}"),
            ValidationError::InvalidSetupCode(code) => {
                write!(f, "Invalid setup code: {code:?} (must be 8 digits)")
            }
            ValidationError::EmptyAccessoryName => write!(f, "Accessory name cannot be empty"),
            ValidationError::ZeroWatchInterval => write!(f, "Watch interval must be nonzero"),
        }
    }
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pixelbridge"))
    }

    /// Full path to the config file.
    ///
    /// The `PIXELBRIDGE_CONFIG` environment variable overrides the platform
    /// default.
    pub fn path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV)
            && !path.trim().is_empty()
        {
            return Some(PathBuf::from(path));
        }
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Load config from disk, or return defaults if not found.
    pub fn load() -> Self {
        let (config, warnings) = Self::load_with_warnings();
        for w in &warnings {
            log::warn!("{w}");
        }
        config
    }

    /// Load config from the default path, returning the config and any parse
    /// warnings.
    pub fn load_with_warnings() -> (Self, Vec<String>) {
        let Some(path) = Self::path() else {
            return (Self::default(), vec![]);
        };
        Self::load_from(&path)
    }

    /// Load config from an arbitrary path, returning the config and any parse
    /// warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file exists but can't be parsed.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, vec![]),
                Err(e) => {
                    let warning = format!(
                        "config parse error ({}), using defaults: {e}",
                        path.display()
                    );
                    (Self::default(), vec![warning])
                }
            },
            Err(_) => (Self::default(), vec![]),
        }
    }

    /// Save config to an arbitrary path atomically (write to temp file, then
    /// rename).
    ///
    /// A header comment is prepended to warn that manual edits may be
    /// overwritten.
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let serialized = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        let contents = format!("{CONFIG_HEADER}{serialized}");
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &contents)?;
        match std::fs::rename(&tmp, path) {
            Ok(()) => Ok(()),
            Err(_) => {
                // Rename can fail across filesystems; fall back to direct write + cleanup
                let result = std::fs::write(path, &contents);
                let _ = std::fs::remove_file(&tmp);
                result
            }
        }
    }

    /// Save config to the default path.
    pub fn save(&self) -> std::io::Result<()> {
        let Some(path) = Self::path() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config directory",
            ));
        };
        self.save_to(&path)
    }

    /// Validate the entire config, collecting all errors.
    ///
    /// An empty host passes — it means "provide one on the command line" —
    /// but a nonempty host must be a valid device URL.
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if !self.host.trim().is_empty()
            && let Err(e) = crate::client::validate_base_url(&self.host)
        {
            errors.push(ValidationError::InvalidHost(e.to_string()));
        }

        if self.setup_code.len() != 8 || !self.setup_code.bytes().all(|b| b.is_ascii_digit()) {
            errors.push(ValidationError::InvalidSetupCode(self.setup_code.clone()));
        }

        if self.accessory_name.trim().is_empty() {
            errors.push(ValidationError::EmptyAccessoryName);
        }

        if self.watch_interval_ms == 0 {
            errors.push(ValidationError::ZeroWatchInterval);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
