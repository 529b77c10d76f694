//! `identify` subcommand — blink the strip, then restore its state.

use pixelbridge_lib::identify::{self, ThreadSleeper};

use super::{Config, Result, connect};

pub(super) fn cmd_identify(host: Option<&str>, config: &Config) -> Result<()> {
    let mut bridge = connect(host, config)?;
    let was_on = bridge.is_on();
    identify::run_blink(&mut bridge, &ThreadSleeper)?;
    println!(
        "Identify complete — strip {}",
        if was_on { "restored" } else { "left off" }
    );
    Ok(())
}
