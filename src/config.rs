//! Application configuration.
//!
//! The only setting is the API base URL, resolved once at startup from
//! the environment. The data directory holds the persisted auth token.

use std::path::PathBuf;

use anyhow::Result;

/// Application name used for the data directory path
const APP_NAME: &str = "snaproom";

/// Environment variable overriding the API base URL
const API_URL_VAR: &str = "SNAPROOM_API_URL";

/// Local development endpoint used when no override is set
const DEFAULT_API_URL: &str = "http://localhost:3001/api";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
}

impl Config {
    /// Resolve configuration from the environment.
    pub fn from_env() -> Self {
        let api_base_url =
            std::env::var(API_URL_VAR).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self { api_base_url }
    }

    /// Directory for durable state (the token file).
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        std::env::remove_var(API_URL_VAR);
        let config = Config::from_env();
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
    }
}
