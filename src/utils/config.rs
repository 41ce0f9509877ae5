// Centralized configuration for the bot

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

/// Prefix used when a guild has not set its own
pub const DEFAULT_PREFIX: &str = "!";

/// Settings document, relative to the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "serversettings.json";

/// Largest volume the volume command accepts
pub const MAX_VOLUME: i32 = 150;

/// Runtime configuration, read from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    /// Global default command prefix
    pub prefix: String,
    pub settings_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = lookup("DISCORD_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| anyhow!("DISCORD_TOKEN must be set"))?;

        let prefix = lookup("BOT_PREFIX")
            .filter(|prefix| !prefix.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string());

        let settings_file = lookup("SETTINGS_FILE")
            .filter(|path| !path.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SETTINGS_FILE.to_string())
            .into();

        Ok(Self {
            token,
            prefix,
            settings_file,
        })
    }
}

/// Discord embed colors
pub mod colors {
    pub const PRIMARY: u32 = 0x00bfff;
    pub const SUCCESS: u32 = 0x2ecc71;
    pub const ERROR: u32 = 0xff0000;
    pub const INFO: u32 = 0x3498db;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[("DISCORD_TOKEN", "abc")])).unwrap();
        assert_eq!(config.token, "abc");
        assert_eq!(config.prefix, "!");
        assert_eq!(config.settings_file, PathBuf::from("serversettings.json"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("BOT_PREFIX", "m!"),
            ("SETTINGS_FILE", "/data/settings.json"),
        ]))
        .unwrap();
        assert_eq!(config.prefix, "m!");
        assert_eq!(config.settings_file, PathBuf::from("/data/settings.json"));
    }

    #[test]
    fn test_missing_token() {
        assert!(Config::from_lookup(lookup_from(&[])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("DISCORD_TOKEN", "  ")])).is_err());
    }

    #[test]
    fn test_blank_prefix_uses_default() {
        let config =
            Config::from_lookup(lookup_from(&[("DISCORD_TOKEN", "abc"), ("BOT_PREFIX", "")])).unwrap();
        assert_eq!(config.prefix, DEFAULT_PREFIX);
    }
}
