//! Color state bridge — cached strip state and on-color memory.
//!
//! [`ColorBridge`] owns two caches: the live per-pixel strip state and the
//! "on color" to restore when the strip is turned back on, so an off/on
//! cycle brings back the previous hue instead of defaulting to black. The
//! device stays the source of truth: `turn_on` and `turn_off` re-fetch the
//! state after acting, while `set_solid` trusts its own push.
//!
//! On/off is derived, never stored: the strip is "on" iff any cached pixel
//! has a nonzero channel, "off" iff every pixel is exactly black.

use palette::Srgb;

use crate::client::{Result, StripClient};
use crate::codec;

pub struct ColorBridge<C: StripClient> {
    client: C,
    state: Vec<Srgb<u8>>,
    on_state: Vec<Srgb<u8>>,
}

impl<C: StripClient> std::fmt::Debug for ColorBridge<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorBridge")
            .field("state", &self.state)
            .field("on_state", &self.on_state)
            .finish_non_exhaustive()
    }
}

impl<C: StripClient> ColorBridge<C> {
    /// Fetch the initial strip state and seed the on-color memory.
    ///
    /// A strip first seen dark gets solid red as its on-color, so the very
    /// first `turn_on` produces visible light. Fails with the client's error
    /// if the initial fetch fails; callers must not expose a controllable
    /// accessory whose state is unknown.
    pub fn new(client: C) -> Result<Self> {
        let state = codec::decode_all(&client.fetch_states()?);
        let on_state = if state.iter().any(|&c| c != codec::BLACK) {
            state.clone()
        } else {
            vec![codec::RED; state.len()]
        };
        Ok(ColorBridge {
            client,
            state,
            on_state,
        })
    }

    /// Push the remembered on-color, then re-fetch the live state.
    ///
    /// The re-fetched state (not the locally computed one) becomes the cache,
    /// and refreshes the on-color memory if it is lit. On failure the
    /// on-color memory is left unchanged.
    pub fn turn_on(&mut self) -> Result<()> {
        self.client.push_states(&codec::encode_all(&self.on_state))?;
        self.state = codec::decode_all(&self.client.fetch_states()?);
        if self.is_on() {
            self.on_state = self.state.clone();
        }
        Ok(())
    }

    /// Clear the strip, then re-fetch. Never touches the on-color memory.
    pub fn turn_off(&mut self) -> Result<()> {
        self.client.clear()?;
        self.state = codec::decode_all(&self.client.fetch_states()?);
        Ok(())
    }

    /// Replace every pixel with `color`.
    ///
    /// When the new color is visible (value > 0) and the strip is currently
    /// lit, the on-color memory takes the *previous* live state first — the
    /// just-applied color never overwrites the memory directly; only a
    /// `turn_on` re-fetch does. The push result is trusted: the local cache
    /// is updated without a re-fetch. On push failure both caches are left
    /// untouched.
    pub fn set_solid(&mut self, color: Srgb<u8>) -> Result<()> {
        let next = vec![color; self.state.len()];
        let (_, _, v) = codec::hsv_of(color);
        let remember_previous = v > 0.0 && self.is_on();
        self.client.push_states(&codec::encode_all(&next))?;
        if remember_previous {
            self.on_state = std::mem::take(&mut self.state);
        }
        self.state = next;
        Ok(())
    }

    /// Re-fetch the strip state and return the HSV decomposition of pixel 0.
    ///
    /// Pixel 0 stands in for the whole strip; per-pixel patterns are not
    /// individually exposed.
    pub fn current_hsv(&mut self) -> Result<(f64, f64, f64)> {
        self.state = codec::decode_all(&self.client.fetch_states()?);
        let first = self.state.first().copied().unwrap_or(codec::BLACK);
        Ok(codec::hsv_of(first))
    }

    /// True iff at least one cached pixel is non-black. Cache scan only.
    pub fn is_on(&self) -> bool {
        self.state.iter().any(|&c| c != codec::BLACK)
    }

    /// True iff every cached pixel is exactly black. Cache scan only.
    pub fn is_off(&self) -> bool {
        self.state.iter().all(|&c| c == codec::BLACK)
    }

    /// Cached pixel count.
    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// The cached strip state.
    pub fn state(&self) -> &[Srgb<u8>] {
        &self.state
    }

    /// The cached on-color memory.
    pub fn on_state(&self) -> &[Srgb<u8>] {
        &self.on_state
    }

    /// Shared access to the underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;
    use crate::client::mock::{MockStrip, StripCall};

    const RED_WORD: u32 = 0xFFFF_0000;
    const GREEN_WORD: u32 = 0xFF00_FF00;

    // ── initialization ──

    #[test]
    fn init_from_dark_strip_defaults_on_color_to_red() {
        let bridge = ColorBridge::new(MockStrip::dark(2)).unwrap();
        assert!(bridge.is_off());
        assert_eq!(bridge.on_state(), &[codec::RED, codec::RED]);
    }

    #[test]
    fn init_from_lit_strip_remembers_live_state() {
        let bridge = ColorBridge::new(MockStrip::new(vec![GREEN_WORD, GREEN_WORD])).unwrap();
        assert!(bridge.is_on());
        assert_eq!(bridge.on_state(), bridge.state());
        assert_eq!(bridge.state()[0], Srgb::new(0, 255, 0));
    }

    #[test]
    fn init_fetch_failure_propagates() {
        let mock = MockStrip::dark(2);
        mock.fail_fetch_states.set(true);
        let err = ColorBridge::new(mock).unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[test]
    fn init_single_lit_pixel_counts_as_on() {
        // One pixel lit, rest dark: "on", so the mixed state is remembered
        let bridge = ColorBridge::new(MockStrip::new(vec![RED_WORD, 0, 0])).unwrap();
        assert!(bridge.is_on());
        assert!(!bridge.is_off());
        assert_eq!(bridge.on_state()[0], codec::RED);
        assert_eq!(bridge.on_state()[1], codec::BLACK);
    }

    // ── on/off predicates ──

    #[test]
    fn on_and_off_are_never_both_true() {
        for words in [vec![0u32, 0], vec![RED_WORD, 0], vec![RED_WORD, RED_WORD]] {
            let bridge = ColorBridge::new(MockStrip::new(words)).unwrap();
            assert_ne!(bridge.is_on(), bridge.is_off());
        }
    }

    #[test]
    fn predicates_do_not_hit_the_network() {
        let bridge = ColorBridge::new(MockStrip::dark(2)).unwrap();
        let before = bridge.client().fetch_count();
        let _ = bridge.is_on();
        let _ = bridge.is_off();
        assert_eq!(bridge.client().fetch_count(), before);
    }

    #[test]
    fn alpha_only_word_is_off() {
        // 0xFF000000 decodes to black; alpha alone does not light a pixel
        let bridge = ColorBridge::new(MockStrip::new(vec![0xFF00_0000])).unwrap();
        assert!(bridge.is_off());
    }

    // ── turn_on ──

    #[test]
    fn turn_on_pushes_on_color_and_refetches() {
        let mut bridge = ColorBridge::new(MockStrip::dark(2)).unwrap();
        bridge.turn_on().unwrap();
        assert!(bridge.is_on());

        let calls = bridge.client().calls.borrow();
        // init fetch, push, re-fetch
        assert_eq!(
            *calls,
            vec![
                StripCall::FetchStates,
                StripCall::PushStates(vec![RED_WORD, RED_WORD]),
                StripCall::FetchStates,
            ]
        );
    }

    #[test]
    fn turn_on_refreshes_on_color_from_refetched_state() {
        let mut bridge = ColorBridge::new(MockStrip::dark(1)).unwrap();
        bridge.turn_on().unwrap();
        // the re-fetched lit state became both the cache and the memory
        assert_eq!(bridge.on_state(), bridge.state());
        assert_eq!(bridge.state(), &[codec::RED]);
    }

    #[test]
    fn turn_on_failure_leaves_on_color_unchanged() {
        let mut bridge = ColorBridge::new(MockStrip::dark(2)).unwrap();
        bridge.client().fail_push_states.set(true);
        assert!(bridge.turn_on().is_err());
        assert_eq!(bridge.on_state(), &[codec::RED, codec::RED]);
        assert!(bridge.is_off());
    }

    // ── turn_off ──

    #[test]
    fn turn_off_clears_and_refetches() {
        let mut bridge = ColorBridge::new(MockStrip::new(vec![GREEN_WORD])).unwrap();
        bridge.turn_off().unwrap();
        assert!(bridge.is_off());

        let calls = bridge.client().calls.borrow();
        assert_eq!(
            *calls,
            vec![StripCall::FetchStates, StripCall::Clear, StripCall::FetchStates]
        );
    }

    #[test]
    fn turn_off_preserves_on_color() {
        let mut bridge = ColorBridge::new(MockStrip::new(vec![GREEN_WORD, GREEN_WORD])).unwrap();
        let remembered = bridge.on_state().to_vec();
        bridge.turn_off().unwrap();
        assert_eq!(bridge.on_state(), remembered.as_slice());
    }

    // ── set_solid ──

    #[test]
    fn set_solid_pushes_full_length_and_trusts_push() {
        let mut bridge = ColorBridge::new(MockStrip::dark(3)).unwrap();
        let fetches_before = bridge.client().fetch_count();
        bridge.set_solid(Srgb::new(0, 255, 0)).unwrap();

        assert_eq!(bridge.state(), &[Srgb::new(0, 255, 0); 3]);
        // push is trusted: no re-fetch happened
        assert_eq!(bridge.client().fetch_count(), fetches_before);
        let calls = bridge.client().calls.borrow();
        assert!(calls.contains(&StripCall::PushStates(vec![GREEN_WORD; 3])));
    }

    #[test]
    fn set_solid_while_on_remembers_previous_state() {
        let mut bridge = ColorBridge::new(MockStrip::new(vec![RED_WORD, RED_WORD])).unwrap();
        bridge.set_solid(Srgb::new(0, 255, 0)).unwrap();
        // the memory holds the pre-push state, not the just-applied green
        assert_eq!(bridge.on_state(), &[codec::RED, codec::RED]);
        assert_eq!(bridge.state(), &[Srgb::new(0, 255, 0), Srgb::new(0, 255, 0)]);
    }

    #[test]
    fn set_solid_while_off_keeps_memory() {
        let mut bridge = ColorBridge::new(MockStrip::dark(2)).unwrap();
        bridge.set_solid(Srgb::new(0, 255, 0)).unwrap();
        // strip was off: memory stays at its red default
        assert_eq!(bridge.on_state(), &[codec::RED, codec::RED]);
        assert!(bridge.is_on());
    }

    #[test]
    fn set_solid_black_keeps_memory() {
        let mut bridge = ColorBridge::new(MockStrip::new(vec![GREEN_WORD])).unwrap();
        bridge.set_solid(codec::BLACK).unwrap();
        // zero-value color: memory untouched, never all-black
        assert_eq!(bridge.on_state()[0], Srgb::new(0, 255, 0));
        assert!(bridge.is_off());
    }

    #[test]
    fn set_solid_push_failure_leaves_both_caches_untouched() {
        let mut bridge = ColorBridge::new(MockStrip::new(vec![GREEN_WORD, GREEN_WORD])).unwrap();
        let state_before = bridge.state().to_vec();
        let memory_before = bridge.on_state().to_vec();

        bridge.client().fail_push_states.set(true);
        assert!(bridge.set_solid(Srgb::new(255, 0, 255)).is_err());

        assert_eq!(bridge.state(), state_before.as_slice());
        assert_eq!(bridge.on_state(), memory_before.as_slice());
    }

    // ── current_hsv ──

    #[test]
    fn current_hsv_refetches_and_reads_pixel_zero() {
        let mut bridge = ColorBridge::new(MockStrip::dark(2)).unwrap();
        // Device changed behind our back
        *bridge.client().words.borrow_mut() = vec![GREEN_WORD, 0];
        let (h, s, v) = bridge.current_hsv().unwrap();
        assert_eq!((h, s, v), (120.0, 1.0, 1.0));
        // the re-fetch also refreshed the cache
        assert!(bridge.is_on());
    }

    #[test]
    fn current_hsv_black_pixel() {
        let mut bridge = ColorBridge::new(MockStrip::dark(1)).unwrap();
        let (_, s, v) = bridge.current_hsv().unwrap();
        assert_eq!((s, v), (0.0, 0.0));
    }

    #[test]
    fn current_hsv_failure_propagates() {
        let mut bridge = ColorBridge::new(MockStrip::dark(1)).unwrap();
        bridge.client().fail_fetch_states.set(true);
        assert!(bridge.current_hsv().is_err());
    }

    // ── off/on cycling idempotence ──

    #[test]
    fn off_on_cycling_restores_the_same_color() {
        let mut bridge = ColorBridge::new(MockStrip::dark(2)).unwrap();
        bridge.turn_on().unwrap();
        let remembered = bridge.on_state().to_vec();

        bridge.turn_off().unwrap();
        assert!(bridge.is_off());

        bridge.turn_on().unwrap();
        let calls = bridge.client().calls.borrow();
        let last_push = calls
            .iter()
            .rev()
            .find_map(|c| match c {
                StripCall::PushStates(w) => Some(w.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(last_push, codec::encode_all(&remembered));
        drop(calls);
        assert!(bridge.is_on());
    }
}
