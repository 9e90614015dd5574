pub mod error;
pub mod logger;
pub mod profile;
pub mod validation;
