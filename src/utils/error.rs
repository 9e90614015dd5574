use serde::{Deserialize, Serialize};
use thiserror::Error;

const UNEXPECTED_ERROR: &str = "An unexpected error occurred.";

/// Normalized failure returned by every backend call.
///
/// `status` is the HTTP status of the failed response, or `0` when the request never
/// produced one (connection refused, timeout, undecodable body).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 非 HTTP 錯誤 (網路、解碼) 一律使用 status 0
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(0, message)
    }

    pub fn is_http(&self) -> bool {
        self.status != 0
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::new(
                status.as_u16(),
                format!("Request failed with status code {}", status.as_u16()),
            ),
            None => Self::transport(err.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl ClientError {
    pub fn status(&self) -> u16 {
        match self {
            ClientError::Api(err) => err.status,
            ClientError::Http(err) => err.status().map(|s| s.as_u16()).unwrap_or(0),
            _ => 0,
        }
    }

    /// 給終端使用者看的訊息 (首字大寫)
    pub fn user_friendly_message(&self) -> String {
        match self {
            ClientError::Api(err) => prettify_message(&err.message),
            other => prettify_message(&other.to_string()),
        }
    }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Capitalizes the first character; an empty message becomes the generic fallback.
pub fn prettify_message(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        None => UNEXPECTED_ERROR.to_string(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}
