//! Device communication — trait + HTTP backend.
//!
//! The WiFi NeoPixel device exposes four endpoints: `GET /states` (JSON array
//! of packed color words, one per pixel), `GET /size` (plain-text pixel
//! count), `GET /clear` (all pixels to black), and `POST /raw` (replace all
//! pixel colors atomically). Calls are synchronous and never retried; a
//! failure propagates immediately to the caller.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::observe::{LogObserver, Observer};

// ── Error type ──

/// Device communication errors.
///
/// String payloads follow the convention **"context: details"** where *context*
/// identifies the operation (e.g. `"GET /states"`) and *details* describes what
/// went wrong.  Bare descriptions (no colon) are acceptable when no inner error
/// is being wrapped.
#[derive(Debug)]
pub enum ClientError {
    /// Malformed device address. Fatal at client construction.
    InvalidAddress(String),
    /// Connection or protocol failure before a response arrived.
    Transport(String),
    /// Device answered with a non-success HTTP status.
    Status(u16, String),
    /// Response body could not be decoded.
    Parse(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::InvalidAddress(e) => write!(f, "Invalid device address: {e}"),
            ClientError::Transport(e) => write!(f, "Transport error: {e}"),
            ClientError::Status(code, ctx) => write!(f, "Device returned HTTP {code}: {ctx}"),
            ClientError::Parse(e) => write!(f, "Parse error: {e}"),
        }
    }
}

impl std::error::Error for ClientError {}

pub type Result<T> = std::result::Result<T, ClientError>;

// ── Trait ──

/// The four device operations. The bridge is generic over this seam so tests
/// can drive it against an in-memory strip.
pub trait StripClient {
    /// `GET /states` — one packed color word per pixel, in pixel order.
    fn fetch_states(&self) -> Result<Vec<u32>>;

    /// `GET /size` — number of physical pixels.
    fn fetch_pixel_count(&self) -> Result<usize>;

    /// `GET /clear` — device zeroes all pixels. Does not return the new
    /// state; callers must re-fetch.
    fn clear(&self) -> Result<()>;

    /// `POST /raw` — replace all pixel colors atomically.
    fn push_states(&self, words: &[u32]) -> Result<()>;
}

// ── Address validation ──

/// Validate a device base URL: http/https scheme and a nonempty host.
///
/// Returns the address with any trailing slash removed, ready for path
/// concatenation.
pub fn validate_base_url(addr: &str) -> Result<String> {
    let addr = addr.trim().trim_end_matches('/');
    let rest = addr
        .strip_prefix("http://")
        .or_else(|| addr.strip_prefix("https://"))
        .ok_or_else(|| {
            ClientError::InvalidAddress(format!("{addr}: expected http:// or https:// scheme"))
        })?;
    let host = rest.split('/').next().unwrap_or("");
    if host.is_empty() {
        return Err(ClientError::InvalidAddress(format!("{addr}: missing host")));
    }
    Ok(addr.to_string())
}

// ── HTTP implementation ──

/// Blocking HTTP client for the strip device.
///
/// No client-side retry or backoff, single in-flight call. No timeout is
/// enforced beyond the agent default, so a stalled device stalls the caller.
/// Each call reports its elapsed duration to the observer keyed by method
/// name; the observations are advisory and never affect the result.
pub struct HttpStripClient {
    base: String,
    agent: ureq::Agent,
    observer: Arc<dyn Observer>,
}

impl HttpStripClient {
    /// Connect-less construction; the address is validated but not probed.
    pub fn new(addr: &str) -> Result<Self> {
        Self::with_observer(addr, Arc::new(LogObserver))
    }

    pub fn with_observer(addr: &str, observer: Arc<dyn Observer>) -> Result<Self> {
        let base = validate_base_url(addr)?;
        Ok(HttpStripClient {
            base,
            agent: ureq::agent(),
            observer,
        })
    }

    /// The validated base URL.
    pub fn base(&self) -> &str {
        &self.base
    }

    fn observed<T>(&self, method: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let start = Instant::now();
        let result = f();
        self.observer.duration("client", method, start.elapsed());
        result
    }

    fn get_body(&self, path: &str) -> Result<String> {
        let url = format!("{}{path}", self.base);
        let resp = self.agent.get(&url).call().map_err(|e| match e {
            ureq::Error::Status(code, _) => ClientError::Status(code, format!("GET {path}")),
            e => ClientError::Transport(format!("GET {path}: {e}")),
        })?;
        resp.into_string()
            .map_err(|e| ClientError::Transport(format!("GET {path}: {e}")))
    }
}

impl StripClient for HttpStripClient {
    fn fetch_states(&self) -> Result<Vec<u32>> {
        self.observed("fetch_states", || {
            let body = self.get_body("/states")?;
            serde_json::from_str(&body)
                .map_err(|e| ClientError::Parse(format!("GET /states: {e}")))
        })
    }

    fn fetch_pixel_count(&self) -> Result<usize> {
        self.observed("fetch_pixel_count", || {
            let body = self.get_body("/size")?;
            body.trim()
                .parse()
                .map_err(|e| ClientError::Parse(format!("GET /size: {e} ({body:?})")))
        })
    }

    fn clear(&self) -> Result<()> {
        self.observed("clear", || {
            let body = self.get_body("/clear")?;
            log::debug!("clear: {body}");
            Ok(())
        })
    }

    fn push_states(&self, words: &[u32]) -> Result<()> {
        self.observed("push_states", || {
            let body = serde_json::to_string(words)
                .map_err(|e| ClientError::Parse(format!("POST /raw: {e}")))?;
            log::debug!("sending body: {body}");
            let url = format!("{}/raw", self.base);
            self.agent
                .post(&url)
                .set("Content-Type", "application/json")
                .send_string(&body)
                .map_err(|e| match e {
                    ureq::Error::Status(code, _) => {
                        ClientError::Status(code, "POST /raw".into())
                    }
                    e => ClientError::Transport(format!("POST /raw: {e}")),
                })?;
            Ok(())
        })
    }
}

// ── Mock strip for testing ──

/// In-memory mock strip for unit and integration tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// A recorded [`StripClient`] call.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum StripCall {
        FetchStates,
        FetchPixelCount,
        Clear,
        PushStates(Vec<u32>),
    }

    /// In-memory strip device. Behaves like the real device: `clear` zeroes
    /// all pixels, `push_states` replaces them, `fetch_states` returns the
    /// current words. Every call is recorded; `fail_*` cells inject a
    /// transport failure for the matching operation.
    pub struct MockStrip {
        pub words: RefCell<Vec<u32>>,
        /// Recorded calls in invocation order.
        pub calls: RefCell<Vec<StripCall>>,
        pub fail_fetch_states: Cell<bool>,
        pub fail_fetch_pixel_count: Cell<bool>,
        pub fail_clear: Cell<bool>,
        pub fail_push_states: Cell<bool>,
    }

    impl MockStrip {
        pub fn new(words: Vec<u32>) -> Self {
            MockStrip {
                words: RefCell::new(words),
                calls: RefCell::new(Vec::new()),
                fail_fetch_states: Cell::new(false),
                fail_fetch_pixel_count: Cell::new(false),
                fail_clear: Cell::new(false),
                fail_push_states: Cell::new(false),
            }
        }

        /// A strip of `len` pixels, all black.
        pub fn dark(len: usize) -> Self {
            Self::new(vec![0; len])
        }

        /// Projection of the call log onto state-changing toggles
        /// (`"push"` / `"clear"`), for asserting blink sequences.
        pub fn toggles(&self) -> Vec<&'static str> {
            self.calls
                .borrow()
                .iter()
                .filter_map(|c| match c {
                    StripCall::PushStates(_) => Some("push"),
                    StripCall::Clear => Some("clear"),
                    _ => None,
                })
                .collect()
        }

        /// Number of recorded `fetch_states` calls.
        pub fn fetch_count(&self) -> usize {
            self.calls
                .borrow()
                .iter()
                .filter(|c| matches!(c, StripCall::FetchStates))
                .count()
        }
    }

    impl StripClient for MockStrip {
        fn fetch_states(&self) -> Result<Vec<u32>> {
            self.calls.borrow_mut().push(StripCall::FetchStates);
            if self.fail_fetch_states.get() {
                return Err(ClientError::Transport(
                    "mock: fetch_states failure injected".into(),
                ));
            }
            Ok(self.words.borrow().clone())
        }

        fn fetch_pixel_count(&self) -> Result<usize> {
            self.calls.borrow_mut().push(StripCall::FetchPixelCount);
            if self.fail_fetch_pixel_count.get() {
                return Err(ClientError::Transport(
                    "mock: fetch_pixel_count failure injected".into(),
                ));
            }
            Ok(self.words.borrow().len())
        }

        fn clear(&self) -> Result<()> {
            self.calls.borrow_mut().push(StripCall::Clear);
            if self.fail_clear.get() {
                return Err(ClientError::Transport("mock: clear failure injected".into()));
            }
            self.words.borrow_mut().iter_mut().for_each(|w| *w = 0);
            Ok(())
        }

        fn push_states(&self, words: &[u32]) -> Result<()> {
            self.calls
                .borrow_mut()
                .push(StripCall::PushStates(words.to_vec()));
            if self.fail_push_states.get() {
                return Err(ClientError::Transport(
                    "mock: push_states failure injected".into(),
                ));
            }
            *self.words.borrow_mut() = words.to_vec();
            Ok(())
        }
    }
}
