//! Harness configuration from environment variables
//!
//! Fixture location and base URLs can be overridden through the process
//! environment or a `.env` file, so a suite can point the harness at a
//! different fixture tree without touching code.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Default API root used when building URLs.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Default root for the enterprise harness flavor.
pub const DEFAULT_ENTERPRISE_URL: &str = "https://enterprise.example.com/";

const FIXTURE_DIR_VAR: &str = "OCTOMOCK_FIXTURE_DIR";
const BASE_URL_VAR: &str = "OCTOMOCK_BASE_URL";
const ENTERPRISE_URL_VAR: &str = "OCTOMOCK_ENTERPRISE_URL";

/// Load environment variables from `.env` files if it exists.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Get a required environment variable.
pub fn get_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key.to_string()))
}

/// Get an optional environment with a default value
pub fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get and parse an environment variable.
pub fn get_env_parsed<T: FromStr>(key: &str) -> Result<T, ConfigError> {
    let value = get_env(key)?;
    value.parse().map_err(|_| ConfigError::Invalid {
        key: key.to_string(),
        value,
    })
}

/// Get and parse an environment variable with a default.
pub fn get_env_parsed_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Settings shared by every harness in a test run.
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    /// Directory fixtures are loaded from.
    pub fixture_dir: PathBuf,
    /// API root for the regular harness.
    pub base_url: String,
    /// API root for the enterprise harness.
    pub enterprise_url: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            fixture_dir: default_fixture_dir(),
            base_url: DEFAULT_BASE_URL.to_string(),
            enterprise_url: DEFAULT_ENTERPRISE_URL.to_string(),
        }
    }
}

impl HarnessConfig {
    /// Reads the configuration, falling back to defaults for unset keys.
    ///
    /// A `.env` file in the working directory is loaded first.
    pub fn from_env() -> Self {
        load_dotenv();

        let fixture_dir = env::var(FIXTURE_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_fixture_dir());

        Self {
            fixture_dir,
            base_url: get_env_or(BASE_URL_VAR, DEFAULT_BASE_URL),
            enterprise_url: get_env_or(ENTERPRISE_URL_VAR, DEFAULT_ENTERPRISE_URL),
        }
    }

    /// Overrides the fixture directory.
    pub fn fixture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fixture_dir = dir.into();
        self
    }

    /// Overrides the API root.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Overrides the enterprise API root.
    pub fn enterprise_url(mut self, url: impl Into<String>) -> Self {
        self.enterprise_url = url.into();
        self
    }
}

fn default_fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("json")
}

/// Configuration loading errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Environment variable is not set.
    Missing(String),
    /// Environment variable value is invalid.
    Invalid { key: String, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(key) => {
                write!(f, "Missing required environment variable '{}'", key)
            }
            ConfigError::Invalid { key, value } => {
                write!(
                    f,
                    "Invalid value '{}' for environment variable '{}' (failed to parse as expected type)",
                    value, key
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
