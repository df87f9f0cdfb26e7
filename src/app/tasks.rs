// ScanBoard - app/tasks.rs
//
// One-shot background work (form submissions, session restore).
//
// Same shape as the pollers: the closure runs on a spawned thread and the
// result comes back over an mpsc channel that the UI drains once per frame.
// Cancelling drops the receiver, so a late result is discarded.

use std::sync::mpsc;

/// A single background job producing one `T`.
pub struct Task<T> {
    label: &'static str,
    result_rx: Option<mpsc::Receiver<T>>,
}

impl<T: Send + 'static> Task<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            result_rx: None,
        }
    }

    /// Run `job` on a background thread. Any previous job's result is discarded.
    pub fn spawn<F>(&mut self, job: F)
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        self.result_rx = Some(rx);
        let label = self.label;
        std::thread::spawn(move || {
            // Receiver gone means the caller cancelled; nothing to do.
            let _ = tx.send(job());
            tracing::trace!(task = label, "Task finished");
        });
        tracing::debug!(task = label, "Task started");
    }

    /// Returns `true` while a job is outstanding.
    pub fn is_running(&self) -> bool {
        self.result_rx.is_some()
    }

    /// Take the result if the job has finished. Never blocks.
    pub fn poll(&mut self) -> Option<T> {
        let rx = self.result_rx.as_ref()?;
        match rx.try_recv() {
            Ok(result) => {
                self.result_rx = None;
                Some(result)
            }
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                tracing::warn!(task = self.label, "Task thread exited without a result");
                self.result_rx = None;
                None
            }
        }
    }

    /// Forget the outstanding job; its result will be dropped.
    pub fn cancel(&mut self) {
        self.result_rx = None;
    }
}
