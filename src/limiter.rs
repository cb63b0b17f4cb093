//! Self-imposed rate limiting with a cancellable pause.
//!
//! The upstream API is shared infrastructure; after every Nth page the
//! ingestion thread idles for a fixed duration. The pause is a timed wait
//! on a cancellation token rather than a raw sleep, so an operator can
//! stop a long-running ingestion without waiting the pause out.

use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use tracing::info;

// ---------------------------------------------------------------------------
// CancelToken
// ---------------------------------------------------------------------------

/// Cancellation handle shared between the ingestion thread and an operator.
///
/// Cloning yields another handle to the same underlying flag; any clone may
/// cancel, and cancellation is permanent for the lifetime of the token.
#[derive(Clone, Default)]
pub struct CancelToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation, waking any pause currently in progress.
    pub fn cancel(&self) {
        let (flag, cvar) = &*self.inner;
        *flag.lock().unwrap() = true;
        cvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        let (flag, _) = &*self.inner;
        *flag.lock().unwrap()
    }

    /// Block for `dur` or until cancelled, whichever comes first.
    ///
    /// Returns `true` if the token was cancelled.
    pub fn wait(&self, dur: Duration) -> bool {
        let (flag, cvar) = &*self.inner;
        let guard = flag.lock().unwrap();
        let (cancelled, _) = cvar
            .wait_timeout_while(guard, dur, |cancelled| !*cancelled)
            .unwrap();
        *cancelled
    }
}

// ---------------------------------------------------------------------------
// RateLimiter
// ---------------------------------------------------------------------------

/// Pauses the ingestion thread after every `pause_every` page fetches.
pub struct RateLimiter {
    pause_every: u64,
    pause: Duration,
}

impl RateLimiter {
    pub fn new(pause_every: u64, pause: Duration) -> Self {
        Self { pause_every, pause }
    }

    /// Whether a pause is due after `pages_fetched` completed fetches.
    ///
    /// Evaluated post-increment: the 10th fetch with `pause_every == 10`
    /// triggers a pause. `pause_every == 0` disables pausing.
    pub fn pause_due(&self, pages_fetched: u64) -> bool {
        self.pause_every > 0 && pages_fetched % self.pause_every == 0
    }

    /// Block for the configured pause duration, returning early if the
    /// token is cancelled. Returns `true` when cancelled.
    pub fn pause(&self, token: &CancelToken) -> bool {
        info!(
            pause_secs = self.pause.as_secs(),
            "rate limit reached, pausing"
        );
        token.wait(self.pause)
    }
}
