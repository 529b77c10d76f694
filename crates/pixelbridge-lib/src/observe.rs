//! Observability seam — named duration observations and error records.
//!
//! The bridge reports how long its handlers and device calls take, keyed by
//! (subsystem, event), and reports errors with their context. Any sink that
//! can record those two shapes works; the shipped implementation writes to
//! the `log` macros.

use std::time::Duration;

/// Sink for duration observations and error records.
pub trait Observer: Send + Sync {
    /// Record an elapsed wall-clock duration for an event within a subsystem.
    fn duration(&self, subsystem: &str, event: &str, elapsed: Duration);

    /// Record an error with its originating context.
    fn error(&self, context: &str, message: &str);
}

/// [`Observer`] backed by the `log` macros.
pub struct LogObserver;

impl Observer for LogObserver {
    fn duration(&self, subsystem: &str, event: &str, elapsed: Duration) {
        log::debug!("{subsystem}/{event} took {elapsed:?}");
    }

    fn error(&self, context: &str, message: &str) {
        log::error!("{context}: {message}");
    }
}

// ── Recording observer for tests ──

/// In-memory observer for unit and integration tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Records every observation for later assertions.
    #[derive(Default)]
    pub struct RecordingObserver {
        /// Recorded durations: (subsystem, event).
        pub durations: Mutex<Vec<(String, String)>>,
        /// Recorded errors: (context, message).
        pub errors: Mutex<Vec<(String, String)>>,
    }

    impl RecordingObserver {
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of duration records matching (subsystem, event).
        pub fn duration_count(&self, subsystem: &str, event: &str) -> usize {
            self.durations
                .lock()
                .unwrap()
                .iter()
                .filter(|(s, e)| s == subsystem && e == event)
                .count()
        }

        pub fn error_count(&self) -> usize {
            self.errors.lock().unwrap().len()
        }
    }

    impl Observer for RecordingObserver {
        fn duration(&self, subsystem: &str, event: &str, _elapsed: Duration) {
            self.durations
                .lock()
                .unwrap()
                .push((subsystem.into(), event.into()));
        }

        fn error(&self, context: &str, message: &str) {
            self.errors
                .lock()
                .unwrap()
                .push((context.into(), message.into()));
        }
    }
}
