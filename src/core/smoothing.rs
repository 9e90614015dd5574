use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Minimum-visible-duration debounce over a boolean source.
///
/// Once the output turns `true` it stays `true` for at least `min_duration`, measured
/// from the most recent false→true transition of the source. A source that goes `false`
/// sooner schedules a hide timer instead; a new `true` cancels it.
///
/// Timers are spawned on the current tokio runtime, so `observe` and `follow` must be
/// called from within one.
#[derive(Debug)]
pub struct SmoothedSignal {
    shared: Arc<Shared>,
    feeder: Mutex<Option<JoinHandle<()>>>,
}

#[derive(Debug)]
struct Shared {
    min_duration: Duration,
    output: watch::Sender<bool>,
    state: Mutex<SignalState>,
}

#[derive(Debug, Default)]
struct SignalState {
    raw: bool,
    active: bool,
    visible_since: Option<Instant>,
    hide_timer: Option<JoinHandle<()>>,
    // 每次排程或取消計時器都會遞增，過期的計時器據此判斷自己已被取代
    generation: u64,
    disposed: bool,
}

impl SignalState {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.hide_timer.take() {
            timer.abort();
        }
        self.generation = self.generation.wrapping_add(1);
    }

    fn settle_hidden(&mut self) {
        self.active = false;
        self.visible_since = None;
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SignalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, value: bool) {
        self.output.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
    }
}

impl SmoothedSignal {
    pub fn new(min_duration: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                min_duration,
                output: watch::Sender::new(false),
                state: Mutex::new(SignalState::default()),
            }),
            feeder: Mutex::new(None),
        }
    }

    /// Builds a signal that tracks `source` until torn down.
    pub fn follow(mut source: watch::Receiver<bool>, min_duration: Duration) -> Self {
        let signal = Self::new(min_duration);
        let initial = *source.borrow_and_update();
        signal.observe(initial);

        let shared = Arc::clone(&signal.shared);
        let feeder = tokio::spawn(async move {
            while source.changed().await.is_ok() {
                let value = *source.borrow_and_update();
                observe_shared(&shared, value);
            }
        });
        *signal.feeder.lock().unwrap_or_else(PoisonError::into_inner) = Some(feeder);

        signal
    }

    pub fn min_duration(&self) -> Duration {
        self.shared.min_duration
    }

    /// Feeds the latest raw source value into the debounce.
    pub fn observe(&self, value: bool) {
        observe_shared(&self.shared, value);
    }

    pub fn get(&self) -> bool {
        *self.shared.output.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shared.output.subscribe()
    }

    pub fn has_pending_hide(&self) -> bool {
        self.shared.lock().hide_timer.is_some()
    }

    /// Cancels the hide timer and stops following the source. Safe to call repeatedly.
    pub fn teardown(&self) {
        if let Some(feeder) = self
            .feeder
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            feeder.abort();
        }

        let mut state = self.shared.lock();
        if !state.disposed {
            state.disposed = true;
            state.cancel_timer();
            tracing::trace!("smoothed signal torn down");
        }
    }
}

impl Drop for SmoothedSignal {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn observe_shared(shared: &Arc<Shared>, value: bool) {
    let mut state = shared.lock();
    if state.disposed {
        return;
    }

    let was_raw = state.raw;
    state.raw = value;

    if value {
        if was_raw && state.active {
            return;
        }
        state.cancel_timer();
        state.visible_since = Some(Instant::now());
        state.active = true;
        shared.publish(true);
        return;
    }

    if !state.active {
        shared.publish(false);
        return;
    }

    let since = state.visible_since.unwrap_or_else(Instant::now);
    let elapsed = since.elapsed();
    if elapsed >= shared.min_duration {
        state.cancel_timer();
        state.settle_hidden();
        shared.publish(false);
        return;
    }

    state.cancel_timer();
    let generation = state.generation;
    let deadline = since + shared.min_duration;
    let timer_shared = Arc::clone(shared);
    state.hide_timer = Some(tokio::spawn(async move {
        tokio::time::sleep_until(deadline).await;
        let mut state = timer_shared.lock();
        if state.disposed || state.generation != generation || state.raw {
            return;
        }
        state.hide_timer = None;
        state.settle_hidden();
        timer_shared.publish(false);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    const MIN: Duration = Duration::from_millis(500);

    // 讓已到期的計時器任務有機會執行
    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_true_is_immediate() {
        let signal = SmoothedSignal::new(MIN);
        assert!(!signal.get());
        signal.observe(true);
        assert!(signal.get());
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_pulse_held_for_minimum() {
        let signal = SmoothedSignal::new(MIN);
        signal.observe(true);

        sleep(Duration::from_millis(100)).await;
        signal.observe(false);
        assert!(signal.get());
        assert!(signal.has_pending_hide());

        sleep(Duration::from_millis(399)).await;
        settle().await;
        assert!(signal.get(), "hidden before the minimum duration elapsed");

        sleep(Duration::from_millis(1)).await;
        settle().await;
        assert!(!signal.get());
        assert!(!signal.has_pending_hide());
    }

    #[tokio::test(start_paused = true)]
    async fn test_long_pulse_hides_immediately() {
        let signal = SmoothedSignal::new(MIN);
        signal.observe(true);
        sleep(Duration::from_millis(800)).await;
        signal.observe(false);
        assert!(!signal.get());
        assert!(!signal.has_pending_hide());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reentry_cancels_hide_timer() {
        let signal = SmoothedSignal::new(MIN);
        let mut rx = signal.subscribe();
        signal.observe(true);
        rx.borrow_and_update();

        sleep(Duration::from_millis(100)).await;
        signal.observe(false);
        sleep(Duration::from_millis(200)).await;
        signal.observe(true);
        assert!(!signal.has_pending_hide());

        // 原本 t=500 的隱藏計時器已取消
        sleep(Duration::from_millis(300)).await;
        settle().await;
        assert!(signal.get());
        assert!(!rx.has_changed().unwrap(), "output flickered");

        // visible_since 重設為 t=300，t=800 之前不得隱藏
        signal.observe(false);
        sleep(Duration::from_millis(199)).await;
        settle().await;
        assert!(signal.get());
        sleep(Duration::from_millis(1)).await;
        settle().await;
        assert!(!signal.get());
    }

    #[tokio::test(start_paused = true)]
    async fn test_false_while_idle_stays_false() {
        let signal = SmoothedSignal::new(MIN);
        signal.observe(false);
        assert!(!signal.get());
        assert!(!signal.has_pending_hide());
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_is_idempotent_and_silences_timer() {
        let signal = SmoothedSignal::new(MIN);
        signal.observe(true);
        signal.observe(false);
        signal.teardown();
        signal.teardown();

        sleep(Duration::from_millis(600)).await;
        settle().await;
        // 拆除後計時器不再觸發，輸出維持原值
        assert!(signal.get());

        signal.observe(false);
        assert!(signal.get());
    }

    #[tokio::test(start_paused = true)]
    async fn test_follow_tracks_source() {
        let (tx, rx) = watch::channel(false);
        let signal = SmoothedSignal::follow(rx, MIN);

        tx.send_replace(true);
        settle().await;
        assert!(signal.get());

        tx.send_replace(false);
        settle().await;
        assert!(signal.get());

        sleep(MIN).await;
        settle().await;
        assert!(!signal.get());
    }
}
