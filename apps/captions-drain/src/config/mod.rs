use std::env;

pub const DEFAULT_AMQP_URL: &str = "amqp://localhost:5672";
pub const CAPTIONS_QUEUE: &str = "captionsRequest";
const DEFAULT_RUST_LOG: &str = "warn";

#[derive(Debug, Clone)]
pub struct Config {
    pub amqp_url: String,
    pub queue_name: String,
    pub rust_log: String,
}

impl Config {
    /// Reads `.env` (if any) and then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(ConfigError::DotEnv(e.to_string())),
        }

        Ok(Self::from_lookup(|key| env::var(key).ok()))
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let amqp_url = non_empty("AMQP_URL").unwrap_or_else(|| DEFAULT_AMQP_URL.to_string());
        let rust_log = non_empty("RUST_LOG").unwrap_or_else(|| DEFAULT_RUST_LOG.to_string());

        Self {
            amqp_url,
            queue_name: CAPTIONS_QUEUE.to_string(),
            rust_log,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load .env file: {0}")]
    DotEnv(String),
}
