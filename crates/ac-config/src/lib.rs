mod auth_config;
mod config;
mod database_config;
mod error;
mod log_level;
mod logging_config;
pub mod logger;

pub use auth_config::AuthConfig;
pub use config::Config;
pub use database_config::DatabaseConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;

const DEFAULT_DATABASE_FILENAME: &str = "data.db";
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_TOKEN_TTL_SECS: u64 = 60 * 60;
const DEFAULT_INVITE_TTL_SECS: u64 = 24 * 60 * 60;
const MIN_SECRET_LEN: usize = 32;

#[cfg(test)]
mod tests;
