/* 📖 # How is latency simulated?

Each execution gets its own worker thread that waits on a channel with a
timeout. The timeout firing means "the call came back", so the job runs. A
message on the channel, or the sender being dropped, means the execution was
cancelled and the job never runs. Cancelling is therefore just dropping the
[`PendingExecution`].
*/

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::debug;

/// Runs jobs after a fixed delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Executor {
    delay: Duration,
}

impl Executor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `job` after the delay unless the returned handle is cancelled or dropped first.
    ///
    /// With a zero delay the job runs on the calling thread before this returns.
    pub fn schedule<F>(&self, job: F) -> PendingExecution
    where
        F: FnOnce() + Send + 'static,
    {
        if self.delay.is_zero() {
            job();
            return PendingExecution {
                cancel: None,
                worker: None,
            };
        }
        let (cancel, cancelled) = mpsc::channel::<()>();
        let delay = self.delay;
        let worker = thread::spawn(move || match cancelled.recv_timeout(delay) {
            Err(RecvTimeoutError::Timeout) => job(),
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                debug!("Pending execution cancelled");
            }
        });
        PendingExecution {
            cancel: Some(cancel),
            worker: Some(worker),
        }
    }
}

/// Handle to a scheduled job. Dropping it cancels the job if it has not run yet.
#[derive(Debug)]
pub struct PendingExecution {
    cancel: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl PendingExecution {
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            // the worker may already be done, then nobody is listening
            let _ = cancel.send(());
        }
    }

    /// True once the job has run or been cancelled.
    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Block until the job has run. Does not cancel it.
    pub fn wait(mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter_job(counter: &Arc<AtomicUsize>) -> impl FnOnce() + Send + 'static {
        let counter = Arc::clone(counter);
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_zero_delay_runs_immediately() {
        let counter = Arc::new(AtomicUsize::new(0));
        let pending = Executor::from_millis(0).schedule(counter_job(&counter));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(pending.is_finished());
    }

    #[test]
    fn test_job_runs_after_delay() {
        let counter = Arc::new(AtomicUsize::new(0));
        let pending = Executor::from_millis(20).schedule(counter_job(&counter));
        pending.wait();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cancel_prevents_job() {
        let counter = Arc::new(AtomicUsize::new(0));
        let executor = Executor::from_millis(10_000);
        let pending = executor.schedule(counter_job(&counter));
        pending.cancel();
        // the worker wakes up on the cancel message, not the timeout
        thread::sleep(Duration::from_millis(50));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_drop_cancels_job() {
        let counter = Arc::new(AtomicUsize::new(0));
        drop(Executor::from_millis(10_000).schedule(counter_job(&counter)));
        thread::sleep(Duration::from_millis(50));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
