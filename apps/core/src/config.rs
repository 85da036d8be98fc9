//! Environment-driven configuration.
//!
//! `main` loads a `.env` file through `dotenv` before calling
//! [`AppConfig::from_env`], so both real environment variables and `.env`
//! entries are honored (real variables win).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;
use crate::models::Platform;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/leadreply.sqlite";
pub const DEFAULT_API_VERSION: &str = "v18.0";
pub const DEFAULT_GRAPH_API_BASE: &str = "https://graph.facebook.com";
pub const DEFAULT_SEND_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// `DATABASE_URL`
    pub database_url: String,
    /// `FB_ACCESS_TOKEN`, required only for sending.
    pub access_token: Option<String>,
    /// `FB_API_VERSION`
    pub api_version: String,
    /// `GRAPH_API_BASE`
    pub graph_api_base: String,
    /// `SEND_TIMEOUT_SECS`
    pub send_timeout: Duration,
    /// `INTENTS_FILE`, replaces the built-in intent table when set.
    pub intents_file: Option<PathBuf>,
    /// `SENTIMENT_LEXICON`, an AFINN word list replacing the bundled table.
    pub sentiment_lexicon: Option<PathBuf>,
    /// `LEAD_PLATFORM`, the platform new contacts are registered under.
    pub platform: Platform,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            access_token: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            graph_api_base: DEFAULT_GRAPH_API_BASE.to_string(),
            send_timeout: Duration::from_secs(DEFAULT_SEND_TIMEOUT_SECS),
            intents_file: None,
            sentiment_lexicon: None,
            platform: Platform::Facebook,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let send_timeout = match non_empty_var("SEND_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    AppError::Config(format!("SEND_TIMEOUT_SECS must be a whole number, got '{}'", raw))
                })?;
                if secs == 0 {
                    return Err(AppError::Config("SEND_TIMEOUT_SECS must be positive".to_string()));
                }
                Duration::from_secs(secs)
            }
            None => defaults.send_timeout,
        };

        let platform = match non_empty_var("LEAD_PLATFORM") {
            Some(raw) => raw.parse()?,
            None => defaults.platform,
        };

        Ok(Self {
            database_url: non_empty_var("DATABASE_URL").unwrap_or(defaults.database_url),
            access_token: non_empty_var("FB_ACCESS_TOKEN"),
            api_version: non_empty_var("FB_API_VERSION").unwrap_or(defaults.api_version),
            graph_api_base: non_empty_var("GRAPH_API_BASE").unwrap_or(defaults.graph_api_base),
            send_timeout,
            intents_file: non_empty_var("INTENTS_FILE").map(PathBuf::from),
            sentiment_lexicon: non_empty_var("SENTIMENT_LEXICON").map(PathBuf::from),
            platform,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 8] = [
        "DATABASE_URL",
        "FB_ACCESS_TOKEN",
        "FB_API_VERSION",
        "GRAPH_API_BASE",
        "SEND_TIMEOUT_SECS",
        "INTENTS_FILE",
        "SENTIMENT_LEXICON",
        "LEAD_PLATFORM",
    ];

    fn env_with(overrides: &[(&'static str, &'static str)]) -> Vec<(&'static str, Option<&'static str>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides.iter().find(|(k, _)| k == name).map(|(_, v)| *v);
                (*name, value)
            })
            .collect()
    }

    #[test]
    fn test_defaults_when_unset() {
        temp_env::with_vars(env_with(&[]), || {
            let config = AppConfig::from_env().expect("config");
            assert_eq!(config, AppConfig::default());
        });
    }

    #[test]
    fn test_reads_overrides() {
        let vars = env_with(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("FB_ACCESS_TOKEN", "token"),
            ("FB_API_VERSION", "v19.0"),
            ("SEND_TIMEOUT_SECS", "3"),
            ("LEAD_PLATFORM", "whatsapp"),
            ("SENTIMENT_LEXICON", "/etc/leadreply/AFINN-165.txt"),
        ]);
        temp_env::with_vars(vars, || {
            let config = AppConfig::from_env().expect("config");
            assert_eq!(config.database_url, "sqlite::memory:");
            assert_eq!(config.access_token.as_deref(), Some("token"));
            assert_eq!(config.api_version, "v19.0");
            assert_eq!(config.send_timeout, Duration::from_secs(3));
            assert_eq!(config.platform, Platform::Whatsapp);
            assert_eq!(
                config.sentiment_lexicon,
                Some(PathBuf::from("/etc/leadreply/AFINN-165.txt"))
            );
        });
    }

    #[test]
    fn test_invalid_timeout() {
        let vars = env_with(&[("SEND_TIMEOUT_SECS", "soon")]);
        temp_env::with_vars(vars, || {
            assert!(matches!(AppConfig::from_env(), Err(AppError::Config(_))));
        });
    }
}
