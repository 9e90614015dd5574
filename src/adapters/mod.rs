// Adapters layer: concrete implementations for external systems (HTTP backend, token storage).

pub mod api;
pub mod http;
pub mod storage;

pub use api::{OpenHackApi, SubmissionField};
pub use http::{resolve_api_base, ApiClient};
pub use storage::{FileTokenStore, MemoryTokenStore};
