//! Dedicated background worker thread.
//!
//! Provider callbacks and notification refreshes execute here, keeping the
//! host's main sequencing thread free of blocking work and giving the
//! latest-fix state a single writer. `cancel_pending` drops queued jobs
//! without running them; `shutdown` does that and joins the thread.

use crossbeam_channel::{Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Single background worker executing jobs in submission order.
pub struct ServiceWorker {
    tx: Option<Sender<Job>>,
    handle: Option<JoinHandle<()>>,
    cancelled: Arc<AtomicBool>,
}

impl Default for ServiceWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceWorker {
    /// Spawn the worker thread.
    pub fn new() -> Self {
        let (tx, rx): (Sender<Job>, Receiver<Job>) = crossbeam_channel::unbounded();
        let cancelled = Arc::new(AtomicBool::new(false));
        let cancelled_clone = Arc::clone(&cancelled);

        let handle = std::thread::spawn(move || {
            tracing::debug!("service worker started");
            for job in rx.iter() {
                if cancelled_clone.load(Ordering::SeqCst) {
                    // Drain without running; teardown is in progress.
                    continue;
                }
                job();
            }
            tracing::debug!("service worker stopped");
        });

        Self {
            tx: Some(tx),
            handle: Some(handle),
            cancelled,
        }
    }

    /// Enqueue a job for execution on the worker thread.
    ///
    /// Returns `false` once the worker has been cancelled or shut down.
    pub fn execute(&self, job: impl FnOnce() + Send + 'static) -> bool {
        if self.cancelled.load(Ordering::SeqCst) {
            return false;
        }
        match &self.tx {
            Some(tx) => tx.send(Box::new(job)).is_ok(),
            None => false,
        }
    }

    /// Drop all pending jobs without running them.
    pub fn cancel_pending(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Cancel pending work and join the worker thread.
    pub fn shutdown(&mut self) {
        self.cancel_pending();
        // Closing the channel ends the drain loop.
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ServiceWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc;

    #[test]
    fn test_jobs_run_in_order() {
        let worker = ServiceWorker::new();
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let (done_tx, done_rx) = mpsc::channel();

        for i in 0..5 {
            let log_clone = Arc::clone(&log);
            let done = done_tx.clone();
            worker.execute(move || {
                log_clone.lock().unwrap().push(i);
                if i == 4 {
                    done.send(()).unwrap();
                }
            });
        }

        done_rx
            .recv_timeout(std::time::Duration::from_secs(2))
            .expect("worker should run jobs");
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_cancel_pending_drops_queued_jobs() {
        let worker = ServiceWorker::new();
        let ran = Arc::new(AtomicUsize::new(0));
        let (gate_tx, gate_rx) = mpsc::channel::<()>();

        // First job blocks the worker so the second stays queued.
        worker.execute(move || {
            let _ = gate_rx.recv();
        });

        let ran_clone = Arc::clone(&ran);
        worker.execute(move || {
            ran_clone.fetch_add(1, Ordering::SeqCst);
        });

        worker.cancel_pending();
        gate_tx.send(()).unwrap();

        let mut worker = worker;
        worker.shutdown();
        assert_eq!(ran.load(Ordering::SeqCst), 0, "queued job must not run");
    }

    #[test]
    fn test_execute_after_shutdown_rejected() {
        let mut worker = ServiceWorker::new();
        worker.shutdown();
        assert!(!worker.execute(|| {}));
    }
}
