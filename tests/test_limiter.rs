//! Rate limiter and cancellation token tests.

use std::thread;
use std::time::{Duration, Instant};

use foodfacts_ingest::{CancelToken, RateLimiter};

// ---------------------------------------------------------------------------
// pause_due
// ---------------------------------------------------------------------------

#[test]
fn pause_is_due_after_every_nth_fetch() {
    let limiter = RateLimiter::new(10, Duration::from_secs(60));
    for n in 1..=9 {
        assert!(!limiter.pause_due(n), "no pause expected after {n} pages");
    }
    assert!(limiter.pause_due(10));
    assert!(!limiter.pause_due(11));
    assert!(limiter.pause_due(20));
}

#[test]
fn zero_interval_disables_pausing() {
    let limiter = RateLimiter::new(0, Duration::from_secs(60));
    for n in 1..=100 {
        assert!(!limiter.pause_due(n));
    }
}

// ---------------------------------------------------------------------------
// CancelToken
// ---------------------------------------------------------------------------

#[test]
fn wait_times_out_when_not_cancelled() {
    let token = CancelToken::new();
    assert!(!token.wait(Duration::from_millis(10)));
    assert!(!token.is_cancelled());
}

#[test]
fn cancellation_is_visible_through_clones() {
    let token = CancelToken::new();
    let clone = token.clone();
    clone.cancel();
    assert!(token.is_cancelled());
}

#[test]
fn wait_returns_immediately_when_already_cancelled() {
    let token = CancelToken::new();
    token.cancel();

    let started = Instant::now();
    assert!(token.wait(Duration::from_secs(60)));
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn cancellation_aborts_a_pause_in_bounded_time() {
    let limiter = RateLimiter::new(1, Duration::from_secs(60));
    let token = CancelToken::new();
    let remote = token.clone();

    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        remote.cancel();
    });

    let started = Instant::now();
    let cancelled = limiter.pause(&token);
    canceller.join().unwrap();

    assert!(cancelled);
    // Must return shortly after the signal, nowhere near the full minute
    assert!(started.elapsed() < Duration::from_secs(5));
}
