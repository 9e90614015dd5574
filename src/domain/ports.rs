use std::path::Path;
use std::time::Duration;

/// Key-value persistence for the session token.
///
/// Implementations swallow (and log) their own storage failures: losing a token only
/// means the next run starts logged out.
pub trait TokenStore: Send + Sync {
    fn save_token(&self, token: &str);
    fn get_token(&self) -> Option<String>;
    fn remove_token(&self);
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn min_loading_duration(&self) -> Duration;
    fn flags_poll_interval(&self) -> Duration;
    fn token_path(&self) -> Option<&Path>;
}
