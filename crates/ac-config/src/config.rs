use crate::{
    AuthConfig, ConfigError, ConfigErrorResult, DatabaseConfig, LoggingConfig, MIN_SECRET_LEN,
};

use std::path::PathBuf;
use std::str::FromStr;

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config with full production error handling.
    ///
    /// Loading order:
    /// 1. Load a .env file if present
    /// 2. Check for AC_CONFIG_DIR env var, else use ./.ac/
    /// 3. Auto-create the config directory if it doesn't exist
    /// 4. Load config.toml if it exists, else use defaults
    /// 5. Apply AC_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        dotenvy::dotenv().ok();

        let config_dir = Self::config_dir()?;

        // Auto-create config directory
        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join("config.toml");

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &PathBuf) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.clone(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: AC_CONFIG_DIR env var > ./.ac/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var("AC_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(".ac"))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        match &self.auth.token_secret {
            None => return Err(ConfigError::auth("auth.token_secret is required")),
            Some(secret) if secret.len() < MIN_SECRET_LEN => {
                return Err(ConfigError::auth(
                    "auth.token_secret must be at least 32 characters",
                ));
            }
            Some(_) => {}
        }
        match &self.auth.invite_secret {
            None => return Err(ConfigError::auth("auth.invite_secret is required")),
            Some(secret) if secret.len() < MIN_SECRET_LEN => {
                return Err(ConfigError::auth(
                    "auth.invite_secret must be at least 32 characters",
                ));
            }
            Some(_) => {}
        }
        if self.auth.token_ttl_secs == 0 {
            return Err(ConfigError::auth("auth.token_ttl_secs must be non-zero"));
        }
        if self.auth.invite_ttl_secs == 0 {
            return Err(ConfigError::auth("auth.invite_ttl_secs must be non-zero"));
        }

        // Validate database path doesn't escape the config dir
        let db_path = std::path::Path::new(&self.database.path);
        if db_path.is_absolute() || self.database.path.contains("..") {
            return Err(ConfigError::database(
                "database.path must be relative and cannot contain '..'",
            ));
        }

        Ok(())
    }

    /// Get absolute path to database file.
    pub fn database_path(&self) -> ConfigErrorResult<PathBuf> {
        let config_dir = Self::config_dir()?;
        Ok(config_dir.join(&self.database.path))
    }

    /// Log configuration summary (NEVER logs secrets).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  database: {}", self.database.path);
        info!(
            "  auth: token ttl={}s, invite ttl={}s, secrets {}",
            self.auth.token_ttl_secs,
            self.auth.invite_ttl_secs,
            if self.auth.token_secret.is_some() && self.auth.invite_secret.is_some() {
                "set"
            } else {
                "missing"
            }
        );
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // Database
        Self::apply_env_string("AC_DATABASE_PATH", &mut self.database.path);

        // Auth
        Self::apply_env_option_string("AC_AUTH_TOKEN_SECRET", &mut self.auth.token_secret);
        Self::apply_env_option_string("AC_AUTH_INVITE_SECRET", &mut self.auth.invite_secret);
        Self::apply_env_parse("AC_AUTH_TOKEN_TTL_SECS", &mut self.auth.token_ttl_secs);
        Self::apply_env_parse("AC_AUTH_INVITE_TTL_SECS", &mut self.auth.invite_ttl_secs);

        // Logging
        Self::apply_env_parse("AC_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("AC_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("AC_LOG_FILE", &mut self.logging.file);
    }

    fn apply_env_string(key: &str, target: &mut String) {
        if let Ok(value) = std::env::var(key) {
            *target = value;
        }
    }

    fn apply_env_option_string(key: &str, target: &mut Option<String>) {
        if let Ok(value) = std::env::var(key) {
            *target = Some(value);
        }
    }

    fn apply_env_parse<T: FromStr>(key: &str, target: &mut T) {
        if let Ok(value) = std::env::var(key)
            && let Ok(parsed) = value.parse::<T>()
        {
            *target = parsed;
        }
    }

    fn apply_env_bool(key: &str, target: &mut bool) {
        if let Ok(value) = std::env::var(key) {
            match value.to_lowercase().as_str() {
                "true" | "1" | "yes" => *target = true,
                "false" | "0" | "no" => *target = false,
                _ => {}
            }
        }
    }
}
