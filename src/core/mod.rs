pub mod loading;
pub mod smoothing;
pub mod store;

pub use crate::domain::ports::{ConfigProvider, TokenStore};
pub use crate::utils::error::{ApiError, Result};
pub use loading::{LoadingGate, LoadingGuard, DEFAULT_MIN_DURATION};
pub use smoothing::SmoothedSignal;
pub use store::Store;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// A domain's gate together with the smoothed flag a UI would bind a spinner to.
#[derive(Debug)]
pub struct Loading {
    gate: Arc<LoadingGate>,
    signal: SmoothedSignal,
}

impl Loading {
    /// Must be called from within a tokio runtime (the smoothed signal spawns its feeder).
    pub fn new(name: &'static str, min_duration: Duration) -> Self {
        let gate = Arc::new(LoadingGate::new(name, min_duration));
        let signal = SmoothedSignal::follow(gate.subscribe(), min_duration);
        Self { gate, signal }
    }

    pub fn gate(&self) -> &Arc<LoadingGate> {
        &self.gate
    }

    /// Raw busy flag, `true` while any operation is in flight.
    pub fn is_pending(&self) -> bool {
        self.gate.is_pending()
    }

    /// Smoothed busy flag.
    pub fn is_visible(&self) -> bool {
        self.signal.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.signal.subscribe()
    }

    pub async fn run<F: std::future::Future>(&self, task: F) -> F::Output {
        self.gate.with_loading(task).await
    }
}
