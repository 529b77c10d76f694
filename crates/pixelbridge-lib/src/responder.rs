//! Responder layer — binds accessory characteristic events to bridge calls.
//!
//! The external accessory framework delivers remote-update, remote-get, and
//! identify events; the [`Responder`] translates them into [`ColorBridge`]
//! operations and writes results back into the characteristic store. Events
//! for different characteristics may arrive close together, so all bridge
//! mutations go through a single mutex. The handlers never hold any
//! framework lock across a device call — the [`Lightbulb`] accessors are
//! required to be plain value reads/writes.
//!
//! A failed color update is logged and reported to the observer but never
//! crashes the process; only a failed initial sync is fatal, handled by the
//! caller before event registration.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use crate::bridge::ColorBridge;
use crate::client::{Result, StripClient};
use crate::codec;
use crate::identify::{self, Sleeper, ThreadSleeper};
use crate::observe::Observer;

// ── Collaborator traits ──

/// The external accessory's characteristic store.
///
/// Hue is degrees [0, 360); saturation and brightness are percent [0, 100]
/// (brightness an integer, as HomeKit models it). Implementations must be
/// non-blocking value accessors.
pub trait Lightbulb {
    fn hue(&self) -> f64;
    fn saturation(&self) -> f64;
    fn brightness(&self) -> i32;
    fn on(&self) -> bool;
    fn set_hue(&self, value: f64);
    fn set_saturation(&self, value: f64);
    fn set_brightness(&self, value: i32);
    fn set_on(&self, value: bool);
}

/// Capability interface the accessory framework invokes.
///
/// One method per event the framework can deliver; the framework's dispatch
/// mechanism stays outside this crate.
pub trait ColorSink {
    fn on_hue_changed(&self, value: f64);
    fn on_saturation_changed(&self, value: f64);
    fn on_brightness_changed(&self, value: i32);
    fn on_power_changed(&self, on: bool);
    fn on_power_requested(&self) -> bool;
    fn on_identify(&self);
}

// ── Responder ──

pub struct Responder<C: StripClient, L: Lightbulb, S: Sleeper = ThreadSleeper> {
    bridge: Mutex<ColorBridge<C>>,
    lightbulb: L,
    observer: Arc<dyn Observer>,
    sleeper: S,
}

impl<C: StripClient, L: Lightbulb> Responder<C, L> {
    pub fn new(bridge: ColorBridge<C>, lightbulb: L, observer: Arc<dyn Observer>) -> Self {
        Self::with_sleeper(bridge, lightbulb, observer, ThreadSleeper)
    }
}

impl<C: StripClient, L: Lightbulb, S: Sleeper> Responder<C, L, S> {
    pub fn with_sleeper(
        bridge: ColorBridge<C>,
        lightbulb: L,
        observer: Arc<dyn Observer>,
        sleeper: S,
    ) -> Self {
        Responder {
            bridge: Mutex::new(bridge),
            lightbulb,
            observer,
            sleeper,
        }
    }

    pub fn lightbulb(&self) -> &L {
        &self.lightbulb
    }

    /// Lock the bridge for direct access. Bridge mutations are serialized
    /// through this lock; hold it only for the duration of one operation.
    pub fn bridge(&self) -> MutexGuard<'_, ColorBridge<C>> {
        self.bridge.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Seed the characteristics from what the strip is currently showing.
    ///
    /// Run once at startup, before event registration; a failure here is
    /// fatal to the caller.
    pub fn sync_lightbulb(&self) -> Result<()> {
        let (h, s, v) = self.bridge().current_hsv()?;
        self.lightbulb.set_hue(h);
        self.lightbulb.set_saturation(s * 100.0);
        self.lightbulb.set_brightness((v * 100.0).round() as i32);
        Ok(())
    }

    /// Read all three color characteristics, convert, and push a solid color.
    ///
    /// Always reads all three fresh — the changed one arrives alongside the
    /// other two's current values, so near-simultaneous updates compose.
    fn update_color(&self) {
        let h = self.lightbulb.hue();
        let s = self.lightbulb.saturation() / 100.0;
        let v = f64::from(self.lightbulb.brightness()) / 100.0;
        log::debug!("update_color: hue={h} sat={s} val={v}");

        let color = codec::from_hsv(h, s, v);
        if let Err(e) = self.bridge().set_solid(color) {
            log::error!("update_color failed: {e}");
            self.observer.error("update_color", &e.to_string());
        }
    }

    fn observed_update(&self, subsystem: &str, work: impl FnOnce(&Self)) {
        let start = Instant::now();
        work(self);
        self.observer.duration(subsystem, "remote update", start.elapsed());
    }
}

impl<C: StripClient, L: Lightbulb, S: Sleeper> ColorSink for Responder<C, L, S> {
    fn on_hue_changed(&self, value: f64) {
        self.observed_update("hue", |r| {
            log::debug!("changed hue: {value}");
            r.update_color();
        });
    }

    fn on_saturation_changed(&self, value: f64) {
        self.observed_update("sat", |r| {
            log::debug!("changed saturation: {value}");
            r.update_color();
        });
    }

    fn on_brightness_changed(&self, value: i32) {
        self.observed_update("val", |r| {
            log::debug!("changed brightness: {value}");
            r.update_color();
        });
    }

    fn on_power_changed(&self, on: bool) {
        self.observed_update("on", |r| {
            let result = {
                let mut bridge = r.bridge();
                if on { bridge.turn_on() } else { bridge.turn_off() }
            };
            if let Err(e) = result {
                log::error!("power update (on={on}) failed: {e}");
                r.observer.error("power update", &e.to_string());
            }
            // the characteristic always tracks the requested value
            r.lightbulb.set_on(on);
        });
    }

    fn on_power_requested(&self) -> bool {
        let start = Instant::now();
        let is_on = self.bridge().is_on();
        self.observer.duration("on", "remote get", start.elapsed());
        is_on
    }

    fn on_identify(&self) {
        let start = Instant::now();
        let result = identify::run_blink(&mut self.bridge(), &self.sleeper);
        if let Err(e) = result {
            log::error!("identify sequence aborted: {e}");
            self.observer.error("identify", &e.to_string());
        }
        self.observer.duration("acc", "identify", start.elapsed());
    }
}

// ── Fake lightbulb for tests ──

/// In-memory characteristic store for unit and integration tests.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    pub struct FakeLightbulb {
        pub hue: Cell<f64>,
        pub saturation: Cell<f64>,
        pub brightness: Cell<i32>,
        pub on: Cell<bool>,
    }

    impl FakeLightbulb {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_hsv(hue: f64, saturation: f64, brightness: i32) -> Self {
            let lb = Self::new();
            lb.hue.set(hue);
            lb.saturation.set(saturation);
            lb.brightness.set(brightness);
            lb
        }
    }

    impl Lightbulb for FakeLightbulb {
        fn hue(&self) -> f64 {
            self.hue.get()
        }
        fn saturation(&self) -> f64 {
            self.saturation.get()
        }
        fn brightness(&self) -> i32 {
            self.brightness.get()
        }
        fn on(&self) -> bool {
            self.on.get()
        }
        fn set_hue(&self, value: f64) {
            self.hue.set(value);
        }
        fn set_saturation(&self, value: f64) {
            self.saturation.set(value);
        }
        fn set_brightness(&self, value: i32) {
            self.brightness.set(value);
        }
        fn set_on(&self, value: bool) {
            self.on.set(value);
        }
    }
}
