use super::error::ConfigError;
use std::fmt;

pub const API_KEY_VAR: &str = "PROWL_API_KEY";

/// Settings read once from the environment at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(API_KEY_VAR) {
            Some(api_key) if !api_key.trim().is_empty() => Ok(Config {
                api_key: api_key.trim().to_owned(),
            }),
            _ => Err(ConfigError::MissingVariable(API_KEY_VAR)),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config").field("api_key", &"<redacted>").finish()
    }
}
