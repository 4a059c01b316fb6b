use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{ConfigError, get_env_parsed, get_env_parsed_or, load_dotenv};

const LOG_LEVEL_VAR: &str = "OCTOMOCK_LOG_LEVEL";
const LOG_JSON_VAR: &str = "OCTOMOCK_LOG_JSON";

/// Configuration for the tracing/logging system.
///
/// # Examples
///
/// ```
/// use octomock::observability::TracingConfig;
/// use tracing::Level;
///
/// // Safe to call from every test; only the first call installs a subscriber.
/// TracingConfig::new().level(Level::DEBUG).init();
/// ```
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Output logs as JSON.
    pub json: bool,
    /// The minimum log level.
    pub level: Level,
    /// Include the target (module path) in logs.
    pub with_target: bool,
    /// Route output through the test harness so it is captured per test.
    pub test_writer: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            json: false,
            level: Level::INFO,
            with_target: true,
            test_writer: true,
        }
    }
}

impl TracingConfig {
    /// Creates a new tracing configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `OCTOMOCK_LOG_LEVEL` and `OCTOMOCK_LOG_JSON` over the defaults.
    ///
    /// An unset level keeps `INFO`; a level that does not parse is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();

        let mut config = Self::default();
        match get_env_parsed::<Level>(LOG_LEVEL_VAR) {
            Ok(level) => config.level = level,
            Err(ConfigError::Missing(_)) => {}
            Err(err) => return Err(err),
        }
        config.json = get_env_parsed_or(LOG_JSON_VAR, false);
        Ok(config)
    }

    /// Enables JSON output format.
    pub fn json(mut self) -> Self {
        self.json = true;
        self
    }

    /// Sets the minimum log level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Configures whether to include the target in logs.
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    /// Configures whether output goes through the libtest capture.
    pub fn with_test_writer(mut self, enabled: bool) -> Self {
        self.test_writer = enabled;
        self
    }

    /// Installs the subscriber.
    ///
    /// Returns `false` when a global subscriber was already set, which is the
    /// normal case for every test after the first.
    pub fn init(self) -> bool {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.to_string()));

        let builder = fmt()
            .with_env_filter(filter)
            .with_target(self.with_target);

        match (self.json, self.test_writer) {
            (true, true) => builder.json().with_test_writer().try_init().is_ok(),
            (true, false) => builder.json().try_init().is_ok(),
            (false, true) => builder.with_test_writer().try_init().is_ok(),
            (false, false) => builder.try_init().is_ok(),
        }
    }
}
