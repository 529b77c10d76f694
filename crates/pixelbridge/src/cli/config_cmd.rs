//! `config` subcommand — show current configuration and file paths.

use super::{Config, ConfigOutput, Result, kv, kv_indent, kv_width};

pub(super) fn cmd_config(json: bool) -> Result<()> {
    let (config, warnings) = Config::load_with_warnings();
    for w in &warnings {
        log::warn!("{w}");
    }
    let path = Config::path();
    let exists = path.as_ref().is_some_and(|p| p.exists());

    if json {
        let output = ConfigOutput {
            config_file: path.map(|p| p.display().to_string()),
            config_file_exists: exists,
            settings: config,
        };
        let json_str = serde_json::to_string_pretty(&output)
            .map_err(|e| super::BridgeError::Config(format!("JSON serialization failed: {e}")))?;
        println!("{json_str}");
        return Ok(());
    }

    let w = kv_width(
        &["Config file:"],
        &["Host:", "Accessory name:", "Setup code:", "Watch interval:"],
    );

    match &path {
        Some(p) => {
            let suffix = if exists { "" } else { " (not created yet)" };
            kv("Config file:", format!("{}{suffix}", p.display()), w);
        }
        None => kv("Config file:", "not available", w),
    }
    println!();

    println!("Settings:");
    kv_indent(
        "Host:",
        if config.host.is_empty() {
            "(unset)"
        } else {
            &config.host
        },
        w,
    );
    kv_indent("Accessory name:", &config.accessory_name, w);
    kv_indent("Setup code:", &config.setup_code, w);
    kv_indent("Watch interval:", format!("{}ms", config.watch_interval_ms), w);

    if let Err(errors) = config.validate() {
        println!();
        for e in errors {
            println!("  warning: {e}");
        }
    }

    Ok(())
}
