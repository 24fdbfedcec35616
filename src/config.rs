//! Server configuration from environment variables (optionally loaded from `.env`).

use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("SESSION_KEY must be at least 64 bytes")]
    ShortSessionKey,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub coach_idle_timeout: Duration,
    pub session_sweep: Duration,
    pub clock_tick: Duration,
    pub session_key: Option<Vec<u8>>,
    pub cookie_secure: bool,
    pub admin_username: String,
    pub admin_password: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            coach_idle_timeout: Duration::from_secs(2 * 3600),
            session_sweep: Duration::from_secs(60),
            clock_tick: Duration::from_millis(1000),
            session_key: None,
            cookie_secure: false,
            admin_username: "admin".to_string(),
            admin_password: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let session_key = match env::var("SESSION_KEY") {
            Ok(k) if k.len() < 64 => return Err(ConfigError::ShortSessionKey),
            Ok(k) => Some(k.into_bytes()),
            Err(_) => None,
        };

        Ok(Config {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", "a port number")?.unwrap_or(defaults.port),
            coach_idle_timeout: parse_var("COACH_IDLE_TIMEOUT_SECS", "a number of seconds")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.coach_idle_timeout),
            session_sweep: parse_var("SESSION_SWEEP_SECS", "a number of seconds")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.session_sweep),
            clock_tick: parse_var("CLOCK_TICK_MILLIS", "a number of milliseconds")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.clock_tick),
            session_key,
            cookie_secure: parse_var("COOKIE_SECURE", "true or false")?
                .unwrap_or(defaults.cookie_secure),
            admin_username: env::var("ADMIN_USERNAME").unwrap_or(defaults.admin_username),
            admin_password: env::var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty()),
        })
    }
}

/// `Ok(None)` when unset, an error when set but unparsable.
fn parse_var<T: std::str::FromStr>(
    name: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                name,
                expected,
                value,
            }),
        Err(_) => Ok(None),
    }
}
