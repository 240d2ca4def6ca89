//! Leading+Trailing Debounce
//!
//! This is a debounce variant, not a simple throttle: a signal arriving
//! after the interval has elapsed executes immediately (leading edge),
//! while signals arriving inside the interval are coalesced into a single
//! deferred call carrying the *latest* payload (trailing edge). A burst
//! of N signals therefore collapses to at most one immediate call plus at
//! most one trailing call; intermediate payloads are dropped.
//!
//! # How It Works
//!
//! The debouncer tracks the timestamp of the last executed call. When a
//! signal arrives sooner than `interval` after that timestamp, any
//! pending deferred call is cancelled and a new one is scheduled for the
//! remaining interval with the new payload. When a signal arrives after
//! the interval (or no call has executed yet), the callback runs
//! immediately and the timestamp resets. The trailing execution resets
//! the timestamp as well, so a signal shortly after it is again deferred.
//!
//! Scheduling is entirely the host's [`Scheduler`]; nothing here blocks.
//! The callback runs synchronously on whichever thread delivers the
//! signal or the timer callback, with no internal lock held.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::host::{Scheduler, TimerToken};

struct DebounceState {
    last_exec: Option<Instant>,
    pending: Option<TimerToken>,
}

struct Shared<T> {
    scheduler: Arc<dyn Scheduler>,
    interval: Duration,
    callback: Box<dyn Fn(T) + Send + Sync>,
    state: Mutex<DebounceState>,
}

/// A leading+trailing debouncer over an injected scheduler.
///
/// Cloning shares state, so clones can be bound to several signal
/// sources while still acting as one rate limiter.
pub struct Debouncer<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Debouncer<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer invoking `callback` at most once per
    /// `interval` on the leading edge, plus one trailing call per burst.
    pub fn new<F>(scheduler: Arc<dyn Scheduler>, interval: Duration, callback: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            shared: Arc::new(Shared {
                scheduler,
                interval,
                callback: Box::new(callback),
                state: Mutex::new(DebounceState {
                    last_exec: None,
                    pending: None,
                }),
            }),
        }
    }

    /// Deliver a signal.
    ///
    /// Either invokes the callback synchronously (leading edge) or
    /// supersedes any pending deferred call with one carrying `payload`.
    pub fn signal(&self, payload: T) {
        let now = self.shared.scheduler.now();
        let mut state = self.shared.state.lock();

        let within_interval = state
            .last_exec
            .map(|last| now.duration_since(last) < self.shared.interval)
            .unwrap_or(false);

        if within_interval {
            if let Some(token) = state.pending.take() {
                self.shared.scheduler.cancel(token);
            }

            // last_exec is Some here; the remaining interval is what is
            // left of it as of now.
            let elapsed = state
                .last_exec
                .map(|last| now.duration_since(last))
                .unwrap_or_default();
            let remaining = self.shared.interval.saturating_sub(elapsed);

            let shared = Arc::clone(&self.shared);
            let token = self.shared.scheduler.schedule(
                remaining,
                Box::new(move || {
                    let fired_at = shared.scheduler.now();
                    {
                        let mut state = shared.state.lock();
                        state.pending = None;
                        state.last_exec = Some(fired_at);
                    }
                    (shared.callback)(payload);
                }),
            );
            state.pending = Some(token);
        } else {
            state.last_exec = Some(now);
            drop(state);
            (self.shared.callback)(payload);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::sim::SimHost;

    fn recording_debouncer(
        host: &SimHost,
        interval_ms: u64,
    ) -> (Debouncer<u32>, Arc<Mutex<Vec<u32>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = log.clone();
        let debouncer = Debouncer::new(
            Arc::new(host.clone()),
            Duration::from_millis(interval_ms),
            move |payload| log_clone.lock().push(payload),
        );
        (debouncer, log)
    }

    #[test]
    fn first_signal_executes_immediately() {
        let host = SimHost::new(800, 600);
        let (debouncer, log) = recording_debouncer(&host, 100);

        debouncer.signal(1);
        assert_eq!(*log.lock(), vec![1]);
    }

    #[test]
    fn burst_collapses_to_leading_plus_trailing_with_latest_payload() {
        let host = SimHost::new(800, 600);
        let (debouncer, log) = recording_debouncer(&host, 100);

        debouncer.signal(1);
        host.advance(Duration::from_millis(10));
        debouncer.signal(2);
        host.advance(Duration::from_millis(10));
        debouncer.signal(3);
        host.advance(Duration::from_millis(10));
        debouncer.signal(4);

        // Only the leading call has run so far.
        assert_eq!(*log.lock(), vec![1]);

        host.advance(Duration::from_millis(200));
        // One trailing call, carrying the last payload of the burst.
        assert_eq!(*log.lock(), vec![1, 4]);
    }

    #[test]
    fn signal_after_interval_executes_immediately_again() {
        let host = SimHost::new(800, 600);
        let (debouncer, log) = recording_debouncer(&host, 100);

        debouncer.signal(1);
        host.advance(Duration::from_millis(150));
        debouncer.signal(2);

        assert_eq!(*log.lock(), vec![1, 2]);
    }

    #[test]
    fn trailing_execution_resets_the_timestamp() {
        let host = SimHost::new(800, 600);
        let (debouncer, log) = recording_debouncer(&host, 100);

        debouncer.signal(1);
        host.advance(Duration::from_millis(50));
        debouncer.signal(2);
        host.advance(Duration::from_millis(100));
        assert_eq!(*log.lock(), vec![1, 2]);

        // Within the interval of the trailing execution: deferred again.
        debouncer.signal(3);
        assert_eq!(*log.lock(), vec![1, 2]);
        host.advance(Duration::from_millis(100));
        assert_eq!(*log.lock(), vec![1, 2, 3]);
    }

    #[test]
    fn deferred_call_is_scheduled_for_the_remaining_interval() {
        let host = SimHost::new(800, 600);
        let (debouncer, log) = recording_debouncer(&host, 100);

        debouncer.signal(1);
        host.advance(Duration::from_millis(60));
        debouncer.signal(2);

        // 40ms of the interval remain; 30ms is not enough.
        host.advance(Duration::from_millis(30));
        assert_eq!(*log.lock(), vec![1]);

        host.advance(Duration::from_millis(10));
        assert_eq!(*log.lock(), vec![1, 2]);
    }
}
