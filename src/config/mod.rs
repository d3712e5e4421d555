//! Configuration loading and credential handling.

mod credentials;
mod loader;
mod types;

pub use credentials::{bearer_header, SecureString};
pub use loader::ConfigError;
pub use types::{ApiConfig, Config};
