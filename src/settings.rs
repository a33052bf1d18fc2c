use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::HarvestError;

/// Ambient HTTP settings, separate from the per-run CLI options.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout() -> u64 {
    20
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

impl Settings {
    /// Load settings with the following priority (highest to lowest):
    /// 1. Environment variables with HARVEST_ prefix (e.g. HARVEST_TIMEOUT)
    /// 2. config.toml file in the current directory
    /// 3. Default values
    pub fn load() -> Result<Self, HarvestError> {
        let settings = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("HARVEST").try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.timeout, 20);
        assert_eq!(settings.user_agent, "Mozilla/5.0");
    }

    #[test]
    fn env_overrides_defaults() {
        std::env::set_var("HARVEST_TIMEOUT", "7");
        let settings = Settings::load().unwrap();
        assert_eq!(settings.timeout, 7);
        std::env::remove_var("HARVEST_TIMEOUT");
    }
}
