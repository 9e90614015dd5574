use crate::adapters::OpenHackApi;
use crate::app::state::SessionState;
use crate::core::{ApiError, Loading};
use crate::domain::model::Flags;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;

type ApiResult<T> = std::result::Result<T, ApiError>;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug)]
pub struct FlagsService {
    api: Arc<OpenHackApi>,
    state: Arc<SessionState>,
    loading: Loading,
    poll_interval: Mutex<Duration>,
    poller: Mutex<Option<JoinHandle<()>>>,
}

impl FlagsService {
    pub fn new(
        api: Arc<OpenHackApi>,
        state: Arc<SessionState>,
        min_loading: Duration,
        poll_interval: Duration,
    ) -> Self {
        Self {
            api,
            state,
            loading: Loading::new("flags", min_loading),
            poll_interval: Mutex::new(poll_interval),
            poller: Mutex::new(None),
        }
    }

    pub fn loading(&self) -> &Loading {
        &self.loading
    }

    pub fn current(&self) -> Option<Flags> {
        self.state.flags.get()
    }

    /// Unknown flags, or flags not fetched yet, read as disabled.
    pub fn is_enabled(&self, flag: &str) -> bool {
        self.state
            .flags
            .with(|flags| flags.as_ref().is_some_and(|f| f.is_enabled(flag)))
    }

    pub async fn fetch_flags(&self) -> ApiResult<Flags> {
        self.loading
            .run(async {
                let flags = self.api.flags().fetch().await?;
                tracing::debug!(stage = %flags.stage.name, "flags refreshed");
                self.state.flags.set(Some(flags.clone()));
                Ok::<_, ApiError>(flags)
            })
            .await
    }

    /// Takes effect on the next `start_polling`.
    pub fn configure_polling(&self, interval: Duration) {
        *self.poll_interval.lock().unwrap_or_else(PoisonError::into_inner) = interval;
    }

    pub fn poll_interval(&self) -> Duration {
        *self.poll_interval.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// (Re)starts the background poll. Failed polls are logged and skipped.
    pub fn start_polling(self: &Arc<Self>) {
        let interval = self.poll_interval();
        let service: Weak<Self> = Arc::downgrade(self);

        // 取出舊任務與存入新任務在同一把鎖內完成
        let mut poller = self.poller.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = poller.take() {
            previous.abort();
        }
        *poller = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // interval 的第一個 tick 立即完成，與 setInterval 一致先等一個週期
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(service) = service.upgrade() else {
                    break;
                };
                if let Err(e) = service.fetch_flags().await {
                    tracing::warn!("Flag poll failed (status {}): {}", e.status, e.message);
                }
            }
        }));
        tracing::debug!(?interval, "flag polling started");
    }

    pub fn stop_polling(&self) {
        if let Some(handle) = self
            .poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
            tracing::debug!("flag polling stopped");
        }
    }

    pub fn is_polling(&self) -> bool {
        self.poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for FlagsService {
    fn drop(&mut self) {
        self.stop_polling();
    }
}
