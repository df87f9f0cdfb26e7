// ScanBoard - app/poller.rs
//
// Cancellable repeating fetch: the engine behind the scan list and scan
// detail views.
//
// Architecture:
//   - `Poller` lives on the UI thread; `run_poll_loop` runs on a background
//     thread issuing one request at a time.
//   - An `Arc<AtomicBool>` cancel flag plus dropping the channel receiver stop
//     the loop. After `stop` returns, the view can no longer observe anything
//     the thread produces, even a response that was in flight at the time.
//   - A second flag lets the UI ask for an immediate refresh without waiting
//     out the interval.
//   - Results are delivered as `PollEvent` messages; the UI drains them each
//     frame (same pattern for every background worker in the app).
//
// Ordering: the next request is issued only after the previous response has
// been delivered and the interval has elapsed, so events arrive in request
// order and no staleness guard is needed.
//
// Failure policy:
//   - 401 ends the loop and reports `Unauthorized`.
//   - 404 reports `NotFound` and keeps polling.
//   - Anything else is logged and ignored; the next tick retries.

use crate::util::constants::POLL_CANCEL_CHECK_INTERVAL;
use crate::util::error::{ApiError, ApiResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

/// A message from a poller thread to its owning view.
#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent<T> {
    /// A fresh snapshot; replaces the view's cached copy wholesale.
    Updated(T),
    /// The resource does not exist (HTTP 404).
    NotFound,
    /// The credential was rejected; the loop has exited.
    Unauthorized,
    /// The loop exited on its own after a terminal snapshot.
    Finished,
}

/// Tuning for one poll loop.
#[derive(Debug, Clone, Copy)]
pub struct PollSchedule {
    /// Delay between the end of one fetch and the start of the next.
    pub interval: Duration,
    /// How often the sleeping thread checks its flags.
    pub check_every: Duration,
}

impl PollSchedule {
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            check_every: POLL_CANCEL_CHECK_INTERVAL.min(interval),
        }
    }
}

/// Predicate deciding that a snapshot is final and polling can stop.
pub type StopWhen<T> = fn(&T) -> bool;

/// Handle to a background poll loop.
pub struct Poller<T> {
    label: &'static str,
    events_rx: Option<mpsc::Receiver<PollEvent<T>>>,
    cancel_flag: Option<Arc<AtomicBool>>,
    refresh_flag: Option<Arc<AtomicBool>>,
}

impl<T: Send + 'static> Poller<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            events_rx: None,
            cancel_flag: None,
            refresh_flag: None,
        }
    }

    /// Start polling: `fetch` runs immediately, then once per `schedule.interval`.
    ///
    /// If a loop is already running it is stopped first. When `stop_when`
    /// matches a delivered snapshot the loop sends `Finished` and exits.
    pub fn start<F>(&mut self, schedule: PollSchedule, stop_when: Option<StopWhen<T>>, fetch: F)
    where
        F: FnMut() -> ApiResult<T> + Send + 'static,
    {
        self.stop();

        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let refresh = Arc::new(AtomicBool::new(false));

        self.events_rx = Some(rx);
        self.cancel_flag = Some(Arc::clone(&cancel));
        self.refresh_flag = Some(Arc::clone(&refresh));

        let label = self.label;
        std::thread::spawn(move || {
            run_poll_loop(label, schedule, stop_when, fetch, tx, cancel, refresh);
        });

        tracing::debug!(poller = label, interval_ms = schedule.interval.as_millis() as u64, "Poller started");
    }

    /// Stop the loop. Idempotent.
    ///
    /// Nothing the background thread does afterwards is observable through
    /// this handle: the receiver is dropped here, so an in-flight response is
    /// discarded and the thread exits at its next send or flag check.
    pub fn stop(&mut self) {
        if let Some(flag) = self.cancel_flag.take() {
            flag.store(true, Ordering::SeqCst);
            tracing::debug!(poller = self.label, "Poller stopped");
        }
        self.refresh_flag = None;
        self.events_rx = None;
    }

    /// Ask the loop to fetch now instead of waiting out the interval.
    /// No-op when stopped.
    pub fn refresh_now(&self) {
        if let Some(flag) = &self.refresh_flag {
            flag.store(true, Ordering::SeqCst);
        }
    }

    /// Returns `true` while a loop is attached to this handle.
    pub fn is_active(&self) -> bool {
        self.cancel_flag.is_some()
    }

    /// Drain up to `max` pending events without blocking.
    pub fn poll_events(&self, max: usize) -> Vec<PollEvent<T>> {
        let mut events = Vec::new();
        if let Some(ref rx) = self.events_rx {
            while events.len() < max {
                match rx.try_recv() {
                    Ok(event) => events.push(event),
                    Err(_) => break,
                }
            }
        }
        events
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        if let Some(flag) = &self.cancel_flag {
            flag.store(true, Ordering::SeqCst);
        }
    }
}

// =============================================================================
// Background loop
// =============================================================================

fn run_poll_loop<T, F>(
    label: &'static str,
    schedule: PollSchedule,
    stop_when: Option<StopWhen<T>>,
    mut fetch: F,
    tx: mpsc::Sender<PollEvent<T>>,
    cancel: Arc<AtomicBool>,
    refresh: Arc<AtomicBool>,
) where
    F: FnMut() -> ApiResult<T>,
{
    macro_rules! send {
        ($msg:expr) => {
            if cancel.load(Ordering::SeqCst) || tx.send($msg).is_err() {
                return; // Stopped or receiver dropped; exit quietly.
            }
        };
    }

    loop {
        if cancel.load(Ordering::SeqCst) {
            return;
        }
        refresh.store(false, Ordering::SeqCst);

        match fetch() {
            Ok(snapshot) => {
                let finished = stop_when.is_some_and(|done| done(&snapshot));
                send!(PollEvent::Updated(snapshot));
                if finished {
                    send!(PollEvent::Finished);
                    tracing::debug!(poller = label, "Terminal snapshot; poller finished");
                    return;
                }
            }
            Err(ApiError::NotFound { resource }) => {
                tracing::debug!(poller = label, resource = %resource, "Poll target not found");
                send!(PollEvent::NotFound);
            }
            Err(e) if e.is_auth() => {
                tracing::info!(poller = label, "Credential rejected while polling");
                send!(PollEvent::Unauthorized);
                return;
            }
            Err(e) => {
                tracing::warn!(poller = label, error = %e, "Poll failed; retrying next tick");
            }
        }

        // Interruptible sleep: wake early on cancel or refresh.
        let deadline = Instant::now() + schedule.interval;
        while Instant::now() < deadline {
            if cancel.load(Ordering::SeqCst) {
                return;
            }
            if refresh.load(Ordering::SeqCst) {
                break;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            std::thread::sleep(schedule.check_every.min(remaining));
        }
    }
}

// =============================================================================
// Unit tests
// =============================================================================
