use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Single-shot deferred execution primitive.
///
/// Sleeps for a fixed duration on a spawned task, then runs its job exactly
/// once. The timer can be canceled while pending and inspected for elapsed
/// and remaining time at any point without blocking.
#[derive(Debug)]
pub struct EventTimer {
    duration: Duration,
    started_at: Instant,
    handle: JoinHandle<()>,
}

impl EventTimer {
    /// Starts the countdown immediately. The job runs once the full duration
    /// has passed, unless the timer is canceled first.
    pub fn spawn<F, Fut>(duration: Duration, job: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let started_at = Instant::now();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            job().await;
        });

        Self {
            duration,
            started_at,
            handle,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Wall-clock time since the timer was started.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Time left until the job runs, saturating at zero once due.
    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.elapsed())
    }

    /// Stops the countdown. A job that has not started will never run; a job
    /// already executing cannot be interrupted. Calling this more than once
    /// is harmless.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
