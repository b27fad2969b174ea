//! Linkage configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SUBACCOUNTS_DISPLAY_PARENT_ACCOUNT_DATA` - Show the parent account's
//!   addresses to sub accounts in storefront sessions (default: false).
//!   Accepts `true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`.

use thiserror::Error;

/// Environment variable holding the display flag.
pub const DISPLAY_PARENT_ACCOUNT_DATA_VAR: &str = "SUBACCOUNTS_DISPLAY_PARENT_ACCOUNT_DATA";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Process-wide linkage configuration.
///
/// Built once at startup and handed to every
/// [`AccountLinkagePolicy`](crate::AccountLinkagePolicy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkageConfig {
    /// Show the parent account's data in a sub account's customer area and
    /// checkout.
    pub display_parent_account_data: bool,
}

impl LinkageConfig {
    /// Create a configuration with an explicit display flag.
    #[must_use]
    pub const fn new(display_parent_account_data: bool) -> Self {
        Self {
            display_parent_account_data,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unrecognized value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unrecognized value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let display_parent_account_data = display_flag_from_lookup(lookup)?.unwrap_or(false);

        Ok(Self {
            display_parent_account_data,
        })
    }
}

/// Read the display flag from the environment, `None` when unset.
///
/// Lets callers layer other sources (command line, snapshot files) around the
/// environment variable.
///
/// # Errors
///
/// Returns `ConfigError` if the variable is set to an unrecognized value.
pub fn display_flag_from_env() -> Result<Option<bool>, ConfigError> {
    let _ = dotenvy::dotenv();
    display_flag_from_lookup(|key| std::env::var(key).ok())
}

fn display_flag_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Option<bool>, ConfigError> {
    lookup(DISPLAY_PARENT_ACCOUNT_DATA_VAR)
        .map(|value| parse_flag(DISPLAY_PARENT_ACCOUNT_DATA_VAR, &value))
        .transpose()
}

/// Parse a boolean flag value.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` naming `key` for unrecognized values.
pub fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}
