use crate::core::Store;
use crate::utils::error::prettify_message;
use std::fmt::Display;
use tokio::sync::watch;

/// Global error banner: the one prettified message the UI shows, if any.
#[derive(Debug, Default)]
pub struct ErrorDisplay {
    message: Store<Option<String>>,
}

impl ErrorDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_error<E: Display + ?Sized>(&self, error: &E) {
        self.set_message(&error.to_string());
    }

    pub fn set_message(&self, message: &str) {
        let pretty = prettify_message(message);
        tracing::debug!(message = %pretty, "error displayed");
        self.message.set(Some(pretty));
    }

    pub fn clear(&self) {
        self.message.set(None);
    }

    pub fn message(&self) -> Option<String> {
        self.message.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.message.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::{ApiError, ClientError};

    #[test]
    fn test_set_error_uses_api_message() {
        let display = ErrorDisplay::new();
        display.set_error(&ApiError::new(403, "team is locked"));
        assert_eq!(display.message().as_deref(), Some("Team is locked"));

        display.set_error(&ClientError::from(ApiError::new(0, "network down")));
        assert_eq!(display.message().as_deref(), Some("Network down"));
    }

    #[test]
    fn test_empty_message_and_clear() {
        let display = ErrorDisplay::new();
        display.set_message("");
        assert_eq!(
            display.message().as_deref(),
            Some("An unexpected error occurred.")
        );
        display.clear();
        assert!(display.message().is_none());
    }
}
