//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `ELITESHOP_DATA_FILE` - Path of the file store (default: `.eliteshop/storage.json`)
//! - `ELITESHOP_SIMULATE_LATENCY` - Simulate network and UX delays (default: true)
//! - `ELITESHOP_REAUTH_POLICY` - `overwrite` or `reject` sign-in while signed in (default: overwrite)
//! - `ELITESHOP_HASH_MEMORY_KIB` - Argon2 memory cost in KiB (default: 19456)
//! - `ELITESHOP_HASH_ITERATIONS` - Argon2 iteration count (default: 2)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Fraction of error events sent to Sentry (default: 1.0)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_DATA_FILE: &str = ".eliteshop/storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Path of the JSON file backing the store
    pub data_file: PathBuf,
    /// Artificial delays applied before catalog reads and state mutations
    pub latency: Latency,
    /// What happens on login/register while already signed in
    pub reauth_policy: ReauthPolicy,
    /// Cost parameters for stored credential hashes
    pub hashing: HashingConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            latency: Latency::simulated(),
            reauth_policy: ReauthPolicy::default(),
            hashing: HashingConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
        }
    }
}

/// Simulated delays.
///
/// Catalog reads stand in for network round trips; mutation delays give the
/// UI a visible loading state. Each delay is a suspension point taken before
/// the operation's critical section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub list_products: Duration,
    pub get_product: Duration,
    pub list_categories: Duration,
    pub featured_products: Duration,
    pub cart_add: Duration,
    /// Remove, update and clear.
    pub cart_change: Duration,
    pub login: Duration,
    pub register: Duration,
    pub checkout: Duration,
}

impl Latency {
    /// Delays matching a slow but realistic storefront.
    #[must_use]
    pub const fn simulated() -> Self {
        Self {
            list_products: Duration::from_millis(300),
            get_product: Duration::from_millis(200),
            list_categories: Duration::from_millis(100),
            featured_products: Duration::from_millis(200),
            cart_add: Duration::from_millis(300),
            cart_change: Duration::from_millis(200),
            login: Duration::from_millis(1000),
            register: Duration::from_millis(1200),
            checkout: Duration::from_millis(2000),
        }
    }

    /// No delays at all.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            list_products: Duration::ZERO,
            get_product: Duration::ZERO,
            list_categories: Duration::ZERO,
            featured_products: Duration::ZERO,
            cart_add: Duration::ZERO,
            cart_change: Duration::ZERO,
            login: Duration::ZERO,
            register: Duration::ZERO,
            checkout: Duration::ZERO,
        }
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self::simulated()
    }
}

/// Behaviour of login/register while a session already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReauthPolicy {
    /// Replace the current session (switch account).
    #[default]
    Overwrite,
    /// Refuse until the current user signs out.
    Reject,
}

impl FromStr for ReauthPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "reject" => Ok(Self::Reject),
            other => Err(format!("expected 'overwrite' or 'reject', got '{other}'")),
        }
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
}

impl HashingConfig {
    /// Cheapest parameters argon2 accepts. Only for tests and demos.
    #[must_use]
    pub const fn minimal() -> Self {
        Self {
            memory_kib: 8,
            iterations: 1,
        }
    }
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = HashingConfig::default();
        let latency = if parse_env_or("ELITESHOP_SIMULATE_LATENCY", true, parse_bool)? {
            Latency::simulated()
        } else {
            Latency::none()
        };

        Ok(Self {
            data_file: PathBuf::from(get_env_or_default("ELITESHOP_DATA_FILE", DEFAULT_DATA_FILE)),
            latency,
            reauth_policy: parse_env_or(
                "ELITESHOP_REAUTH_POLICY",
                ReauthPolicy::default(),
                str::parse,
            )?,
            hashing: HashingConfig {
                memory_kib: parse_env_or("ELITESHOP_HASH_MEMORY_KIB", defaults.memory_kib, |v| {
                    v.parse::<u32>().map_err(|e| e.to_string())
                })?,
                iterations: parse_env_or("ELITESHOP_HASH_ITERATIONS", defaults.iterations, |v| {
                    v.parse::<u32>().map_err(|e| e.to_string())
                })?,
            },
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or("SENTRY_SAMPLE_RATE", 1.0, parse_sample_rate)?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an optional environment variable, falling back to `default`.
fn parse_env_or<T>(
    key: &str,
    default: T,
    parse: impl FnOnce(&str) -> Result<T, String>,
) -> Result<T, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |value| {
        parse(&value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e))
    })
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("expected a boolean, got '{other}'")),
    }
}

fn parse_sample_rate(value: &str) -> Result<f32, String> {
    let rate = value.parse::<f32>().map_err(|e| e.to_string())?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(format!("must be between 0.0 and 1.0 (got {rate})"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Ok(true));
        assert_eq!(parse_bool("off"), Ok(false));
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn test_parse_sample_rate_bounds() {
        assert!((parse_sample_rate("0.25").unwrap() - 0.25).abs() < f32::EPSILON);
        assert!(parse_sample_rate("1.5").is_err());
        assert!(parse_sample_rate("abc").is_err());
    }

    #[test]
    fn test_reauth_policy_from_str() {
        assert_eq!("Reject".parse::<ReauthPolicy>(), Ok(ReauthPolicy::Reject));
        assert_eq!(
            " overwrite ".parse::<ReauthPolicy>(),
            Ok(ReauthPolicy::Overwrite)
        );
        assert!("sometimes".parse::<ReauthPolicy>().is_err());
    }

    #[test]
    fn test_parse_env_or_uses_default_when_unset() {
        let value = parse_env_or("ELITESHOP_TEST_SURELY_UNSET_VAR", 7_u32, |v| {
            v.parse::<u32>().map_err(|e| e.to_string())
        })
        .unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_latency_presets() {
        assert_eq!(Latency::none().login, Duration::ZERO);
        assert_eq!(Latency::simulated().login, Duration::from_millis(1000));
        assert_eq!(Latency::default(), Latency::simulated());
    }

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert_eq!(config.data_file, PathBuf::from(".eliteshop/storage.json"));
        assert_eq!(config.reauth_policy, ReauthPolicy::Overwrite);
        assert_eq!(config.hashing.iterations, argon2::Params::DEFAULT_T_COST);
        assert!(config.sentry_dsn.is_none());
    }
}
