pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{ApiClient, FileTokenStore, MemoryTokenStore, OpenHackApi};
pub use app::OpenHack;
pub use config::{ClientConfig, TomlConfig};
pub use core::{LoadingGate, SmoothedSignal, Store};
pub use utils::error::{ApiError, ClientError, Result};
