//! Pacing and cancellation primitives for the sequential fetch loop.
//!
//! Pages are requested one at a time with a minimum gap between requests,
//! and a run can be interrupted between requests without tearing down work
//! already completed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Enforces a minimum interval between consecutive requests.
///
/// The first call returns immediately; later calls sleep for whatever
/// remains of the interval since the previous one.
#[derive(Debug)]
pub struct RequestPacer {
    min_interval: Duration,
    last_request: Option<Instant>,
}

impl RequestPacer {
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: None,
        }
    }

    /// Waits until at least `min_interval` has passed since the previous
    /// call, then records the current instant.
    pub async fn pace(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}

/// Shared flag checked between requests to stop a run early.
///
/// Clones observe the same flag, so a token handed to a runner can be
/// cancelled from wherever the caller kept its copy.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pacer_spaces_out_consecutive_calls() {
        let mut pacer = RequestPacer::new(Duration::from_millis(50));
        let started = Instant::now();

        pacer.pace().await;
        pacer.pace().await;
        pacer.pace().await;

        // Two full intervals must separate three calls.
        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn zero_interval_pacer_does_not_wait() {
        let mut pacer = RequestPacer::new(Duration::ZERO);
        let started = Instant::now();

        pacer.pace().await;
        pacer.pace().await;

        assert!(started.elapsed() < Duration::from_millis(200));
    }

    #[test]
    fn cancel_token_clones_share_state() {
        let token = CancelToken::new();
        let observer = token.clone();
        assert!(!observer.is_cancelled());

        token.cancel();

        assert!(observer.is_cancelled());
        assert!(token.is_cancelled());
    }
}
