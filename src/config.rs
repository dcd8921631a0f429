//! Configuration types.
//!
//! Everything is read from the process environment once at startup. Each
//! struct also has a `from_lookup` constructor so tests can feed values
//! without touching the real environment.

use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::sheet::SheetLocation;

/// Default spreadsheet host.
pub const DEFAULT_SHEETS_BASE_URL: &str = "https://docs.google.com";

/// Default Fonnte send endpoint.
pub const DEFAULT_FONNTE_API_URL: &str = "https://api.fonnte.com/send";

/// Country code sent with every message (Indonesia).
pub const DEFAULT_COUNTRY_CODE: &str = "62";

/// Messaging relay settings.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Send endpoint URL.
    pub api_url: String,
    /// Static token forwarded in the `Authorization` header.
    pub token: SecretString,
    /// Destination phone number.
    pub target: String,
    pub country_code: String,
}

/// Everything a reminder run needs to reach its two collaborators.
#[derive(Debug, Clone)]
pub struct ReminderConfig {
    pub sheet: SheetLocation,
    pub relay: RelayConfig,
}

impl ReminderConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup. Empty values count as missing;
    /// whitespace-only values are kept as given.
    ///
    /// The tab id is read from `GID_TAGIHAN`, falling back to `GID_REKAP`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let require =
            |key: &str| get(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()));

        let sheet_id = require("SHEET_ID")?;
        let token = require("FONNTE_TOKEN")?;
        let target = require("TARGET_WA")?;
        let gid = get("GID_TAGIHAN")
            .or_else(|| get("GID_REKAP"))
            .ok_or_else(|| ConfigError::MissingEnvVar("GID_TAGIHAN".to_string()))?;

        let base_url =
            get("SHEETS_BASE_URL").unwrap_or_else(|| DEFAULT_SHEETS_BASE_URL.to_string());
        let api_url =
            get("FONNTE_API_URL").unwrap_or_else(|| DEFAULT_FONNTE_API_URL.to_string());

        Ok(Self {
            sheet: SheetLocation::new(base_url, sheet_id, gid),
            relay: RelayConfig {
                api_url,
                token: SecretString::from(token),
                target,
                country_code: DEFAULT_COUNTRY_CODE.to_string(),
            },
        })
    }
}

/// Process-level settings for the HTTP trigger and the cron ticker.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// In-process schedule. `None` leaves scheduling to an external caller.
    pub schedule: Option<cron::Schedule>,
    /// Applied to both outbound requests.
    pub http_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            schedule: None,
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let port = match get("REMINDER_PORT") {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: "REMINDER_PORT".to_string(),
                message: format!("{e}"),
            })?,
            None => defaults.port,
        };

        let schedule = get("REMINDER_CRON")
            .map(|raw| {
                cron::Schedule::from_str(raw.trim()).map_err(|e| ConfigError::InvalidValue {
                    key: "REMINDER_CRON".to_string(),
                    message: format!("invalid cron: {e}"),
                })
            })
            .transpose()?;

        let http_timeout = match get("REMINDER_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
                    key: "REMINDER_HTTP_TIMEOUT_SECS".to_string(),
                    message: format!("{e}"),
                })?;
                Duration::from_secs(secs)
            }
            None => defaults.http_timeout,
        };

        Ok(Self {
            port,
            schedule,
            http_timeout,
        })
    }
}
