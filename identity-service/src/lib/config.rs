use std::env;

use auth::SessionPolicy;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct AuthConfig {
    /// Shared secret for session signing and bearer credential encryption
    pub secret: String,
    /// Mark the session cookie `Secure` (HTTPS only)
    #[serde(default)]
    pub secure_cookies: bool,
    #[serde(default = "default_session_max_age_days")]
    pub session_max_age_days: i64,
    #[serde(default = "default_session_update_age_hours")]
    pub session_update_age_hours: i64,
}

fn default_session_max_age_days() -> i64 {
    90
}

fn default_session_update_age_hours() -> i64 {
    24
}

const MAX_SESSION_AGE_DAYS: i64 = 3650;

impl AuthConfig {
    /// Reject session lifetimes that are non-positive or too large to date a session.
    ///
    /// # Errors
    /// * `ConfigError::Message` - `session_max_age_days` is outside `1..=3650` or
    ///   `session_update_age_hours` is outside `1..=session_max_age_days * 24`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_SESSION_AGE_DAYS).contains(&self.session_max_age_days) {
            return Err(ConfigError::Message(format!(
                "auth.session_max_age_days must be between 1 and {}, got {}",
                MAX_SESSION_AGE_DAYS, self.session_max_age_days
            )));
        }

        let max_update_hours = self.session_max_age_days * 24;
        if !(1..=max_update_hours).contains(&self.session_update_age_hours) {
            return Err(ConfigError::Message(format!(
                "auth.session_update_age_hours must be between 1 and {}, got {}",
                max_update_hours, self.session_update_age_hours
            )));
        }

        Ok(())
    }

    pub fn session_policy(&self) -> SessionPolicy {
        SessionPolicy::new(
            Duration::days(self.session_max_age_days),
            Duration::hours(self.session_update_age_hours),
        )
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("secure_cookies", &self.secure_cookies)
            .field("session_max_age_days", &self.session_max_age_days)
            .field("session_update_age_hours", &self.session_update_age_hours)
            .finish()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, AUTH__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: AUTH__SECRET=... overrides auth.secret
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.auth.validate()?;

        Ok(config)
    }
}
