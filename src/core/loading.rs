use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

pub const DEFAULT_MIN_DURATION: Duration = Duration::from_millis(1000);

/// Reference-counted busy flag shared by every request of one domain.
///
/// Overlapping operations share the counter, so the derived `pending` flag stays raised
/// until the last one finishes. Only the operation that raised the flag (the root) is
/// held back until [`LoadingGate::min_duration`] has passed, which keeps a spinner from
/// flashing for requests that answer almost instantly.
#[derive(Debug)]
pub struct LoadingGate {
    name: &'static str,
    count: Mutex<usize>,
    pending: watch::Sender<bool>,
    min_duration: Duration,
}

impl LoadingGate {
    pub fn new(name: &'static str, min_duration: Duration) -> Self {
        Self {
            name,
            count: Mutex::new(0),
            pending: watch::Sender::new(false),
            min_duration,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn min_duration(&self) -> Duration {
        self.min_duration
    }

    /// Registers one more in-flight operation. Returns `true` when the gate went from
    /// idle to pending.
    pub fn begin(&self) -> bool {
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        let is_root = *count == 0;
        *count += 1;
        if is_root {
            self.pending.send_replace(true);
            tracing::debug!(gate = self.name, "loading started");
        }
        is_root
    }

    /// Releases one in-flight operation. Extra calls on an idle gate are ignored.
    pub fn end(&self) {
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        match *count {
            0 => {
                tracing::warn!(gate = self.name, "end() called on an idle loading gate");
            }
            1 => {
                *count = 0;
                self.pending.send_replace(false);
                tracing::debug!(gate = self.name, "loading finished");
            }
            _ => *count -= 1,
        }
    }

    pub fn pending_count(&self) -> usize {
        *self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_pending(&self) -> bool {
        self.pending_count() > 0
    }

    /// Stream of the derived busy flag; only idle/pending transitions are published.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.pending.subscribe()
    }

    /// Begins an operation and returns a guard that ends it when dropped.
    pub fn acquire(&self) -> LoadingGuard<'_> {
        let is_root = self.begin();
        LoadingGuard {
            gate: self,
            is_root,
            started_at: Instant::now(),
        }
    }

    /// Runs `task` while the gate is held.
    ///
    /// The result is returned untouched. If this call was the root, it does not
    /// complete before `min_duration` has passed since it started, on the error path
    /// as well as on success, and the gate stays pending during that wait.
    pub async fn with_loading<F>(&self, task: F) -> F::Output
    where
        F: Future,
    {
        let guard = self.acquire();
        let output = task.await;
        guard.settle().await;
        output
    }
}

/// Scoped hold on a [`LoadingGate`]; dropping it (including on cancellation) ends the
/// operation exactly once.
#[derive(Debug)]
pub struct LoadingGuard<'a> {
    gate: &'a LoadingGate,
    is_root: bool,
    started_at: Instant,
}

impl LoadingGuard<'_> {
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// Waits out the remaining minimum duration (root only), then releases the gate.
    pub async fn settle(self) {
        if self.is_root {
            wait_minimum_duration(self.started_at, self.gate.min_duration).await;
        }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.gate.end();
    }
}

/// Sleeps until at least `duration` has elapsed since `started_at`.
pub async fn wait_minimum_duration(started_at: Instant, duration: Duration) {
    let deadline = started_at + duration;
    if Instant::now() < deadline {
        tokio::time::sleep_until(deadline).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_end_counts() {
        let gate = LoadingGate::new("test", DEFAULT_MIN_DURATION);
        assert!(gate.begin());
        assert!(gate.is_pending());
        assert!(!gate.begin());
        assert_eq!(gate.pending_count(), 2);

        gate.end();
        assert!(gate.is_pending());
        gate.end();
        assert!(!gate.is_pending());
    }

    #[test]
    fn test_end_never_goes_negative() {
        let gate = LoadingGate::new("test", DEFAULT_MIN_DURATION);
        gate.end();
        gate.end();
        assert_eq!(gate.pending_count(), 0);

        assert!(gate.begin());
        gate.end();
        gate.end();
        assert_eq!(gate.pending_count(), 0);
        assert!(gate.begin(), "gate should be idle again after extra end() calls");
    }

    #[test]
    fn test_subscribe_tracks_transitions() {
        let gate = LoadingGate::new("test", DEFAULT_MIN_DURATION);
        let rx = gate.subscribe();
        assert!(!*rx.borrow());

        gate.begin();
        gate.begin();
        assert!(*rx.borrow());
        gate.end();
        assert!(*rx.borrow());
        gate.end();
        assert!(!*rx.borrow());
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let gate = LoadingGate::new("test", DEFAULT_MIN_DURATION);
        {
            let outer = gate.acquire();
            assert!(outer.is_root());
            let inner = gate.acquire();
            assert!(!inner.is_root());
            assert_eq!(gate.pending_count(), 2);
        }
        assert_eq!(gate.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_root_waits_minimum_duration() {
        let gate = LoadingGate::new("test", Duration::from_millis(1000));
        let start = Instant::now();

        let value = gate
            .with_loading(async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                42
            })
            .await;

        assert_eq!(value, 42);
        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert!(!gate.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_task_is_not_padded() {
        let gate = LoadingGate::new("test", Duration::from_millis(100));
        let start = Instant::now();

        gate.with_loading(tokio::time::sleep(Duration::from_millis(300)))
            .await;

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(300));
        assert!(elapsed < Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_task_releases_gate() {
        let gate = LoadingGate::new("test", Duration::from_millis(500));
        let result = tokio::time::timeout(
            Duration::from_millis(50),
            gate.with_loading(std::future::pending::<()>()),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(gate.pending_count(), 0);
    }
}
