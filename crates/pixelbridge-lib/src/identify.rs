//! Identify blink sequence — planned as an explicit step list.
//!
//! The accessory's identify event blinks the strip so the user can find it.
//! The sequence is produced by a pure planner and executed against the
//! bridge through a [`Sleeper`], so tests run it against a recording fake
//! instead of sleeping for real. The pauses are plain delays; an in-progress
//! sequence is not cancellable.

use std::time::Duration;

use crate::bridge::ColorBridge;
use crate::client::{Result, StripClient};

/// Pause between blink steps.
pub const BLINK_PAUSE: Duration = Duration::from_millis(500);

/// Number of alternating clear/on toggles in the blink loop.
const BLINK_TOGGLES: usize = 5;

/// One step of the identify sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkStep {
    TurnOn,
    Clear,
    Pause,
}

/// Sleep provider for the pauses between blink steps.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Production sleeper — blocks the calling thread.
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Plan the blink sequence for a strip whose current power state is
/// `initial_on`.
///
/// A dark strip is lit first so the blinking is visible; a lit strip gets an
/// extra pause and a final turn-on to restore what was showing before.
/// Either way the toggles alternate starting with a clear, each followed by
/// a pause.
pub fn blink_plan(initial_on: bool) -> Vec<BlinkStep> {
    let mut plan = Vec::new();
    if !initial_on {
        plan.push(BlinkStep::TurnOn);
        plan.push(BlinkStep::Pause);
    }
    for i in 0..BLINK_TOGGLES {
        plan.push(if i % 2 == 0 {
            BlinkStep::Clear
        } else {
            BlinkStep::TurnOn
        });
        plan.push(BlinkStep::Pause);
    }
    if initial_on {
        plan.push(BlinkStep::Pause);
        plan.push(BlinkStep::TurnOn);
    }
    plan
}

/// Execute the blink sequence against the bridge.
///
/// The first failing step aborts the remainder; the error is returned for
/// the caller to log (identify has no other error channel).
pub fn run_blink<C: StripClient>(
    bridge: &mut ColorBridge<C>,
    sleeper: &impl Sleeper,
) -> Result<()> {
    for step in blink_plan(bridge.is_on()) {
        match step {
            BlinkStep::TurnOn => bridge.turn_on()?,
            BlinkStep::Clear => bridge.turn_off()?,
            BlinkStep::Pause => sleeper.sleep(BLINK_PAUSE),
        }
    }
    Ok(())
}

// ── Recording sleeper for tests ──

/// Fake sleeper that records requested durations instead of sleeping.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    pub struct FakeSleeper {
        pub slept: RefCell<Vec<Duration>>,
    }

    impl FakeSleeper {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl Sleeper for FakeSleeper {
        fn sleep(&self, duration: Duration) {
            self.slept.borrow_mut().push(duration);
        }
    }
}
