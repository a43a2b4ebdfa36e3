//! Configuration Module - Runtime Tuning Parameters
//!
//! The runtime has no command line of its own (argv belongs to the Tiger
//! program), so everything is read from `TIGER_RT_*` environment variables.

use crate::abi::WORD_SIZE;
use crate::logging::LogLevel;

/// Environment variable names
pub const ENV_LOG: &str = "TIGER_RT_LOG";
pub const ENV_LOG_JSON: &str = "TIGER_RT_LOG_JSON";
pub const ENV_LOG_TIMESTAMPS: &str = "TIGER_RT_LOG_TIMESTAMPS";
pub const ENV_STATS: &str = "TIGER_RT_STATS";
pub const ENV_ZERO_FILL: &str = "TIGER_RT_ZERO_FILL";
pub const ENV_CHECK_DISPATCH: &str = "TIGER_RT_CHECK_DISPATCH";
pub const ENV_MAX_OBJECT: &str = "TIGER_RT_MAX_OBJECT";

const GB: usize = 1024 * 1024 * 1024;

/// Main configuration for the Tiger runtime
///
/// # Examples
///
/// ```rust
/// use tiger_rt::RuntimeConfig;
///
/// let config = RuntimeConfig {
///     stats: true,
///     check_dispatch: true,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Minimum level of events written to stderr
    ///
    /// Default: Warn
    pub log_level: LogLevel,

    /// Emit log events as JSON lines
    ///
    /// Default: false
    pub log_json: bool,

    /// Prefix log lines with a local timestamp
    ///
    /// Default: false
    pub log_timestamps: bool,

    /// Print an allocation/dispatch summary when the program exits
    ///
    /// Default: false
    pub stats: bool,

    /// Zero every new object so fields start at 0
    ///
    /// Default: true
    pub zero_fill: bool,

    /// Reject null objects, null method tables and misaligned offsets
    /// during virtual method lookup
    ///
    /// Default: false
    pub check_dispatch: bool,

    /// Largest single object, in bytes
    ///
    /// Default: 1GB
    pub max_object_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Warn,
            log_json: false,
            log_timestamps: false,
            stats: false,
            zero_fill: true,
            check_dispatch: false,
            max_object_size: GB,
        }
    }
}

impl RuntimeConfig {
    /// Build configuration from the process environment
    ///
    /// ```bash
    /// export TIGER_RT_LOG=debug
    /// export TIGER_RT_STATS=1
    /// export TIGER_RT_MAX_OBJECT=1048576
    /// ```
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    ///
    /// Unset variables keep their defaults; set but unparsable variables are
    /// rejected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup(ENV_LOG) {
            config.log_level = val.parse().map_err(|_| invalid(ENV_LOG, &val))?;
        }
        if let Some(val) = lookup(ENV_LOG_JSON) {
            config.log_json = parse_flag(ENV_LOG_JSON, &val)?;
        }
        if let Some(val) = lookup(ENV_LOG_TIMESTAMPS) {
            config.log_timestamps = parse_flag(ENV_LOG_TIMESTAMPS, &val)?;
        }
        if let Some(val) = lookup(ENV_STATS) {
            config.stats = parse_flag(ENV_STATS, &val)?;
        }
        if let Some(val) = lookup(ENV_ZERO_FILL) {
            config.zero_fill = parse_flag(ENV_ZERO_FILL, &val)?;
        }
        if let Some(val) = lookup(ENV_CHECK_DISPATCH) {
            config.check_dispatch = parse_flag(ENV_CHECK_DISPATCH, &val)?;
        }
        if let Some(val) = lookup(ENV_MAX_OBJECT) {
            config.max_object_size = val
                .trim()
                .parse::<usize>()
                .map_err(|_| invalid(ENV_MAX_OBJECT, &val))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_object_size < WORD_SIZE {
            return Err(ConfigError::InvalidObjectLimit(format!(
                "max_object_size must be at least {} bytes",
                WORD_SIZE
            )));
        }
        if self.max_object_size > isize::MAX as usize {
            return Err(ConfigError::InvalidObjectLimit(
                "max_object_size must fit in isize".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_flag(key: &str, val: &str) -> Result<bool, ConfigError> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(invalid(key, val)),
    }
}

fn invalid(key: &str, val: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: val.to_string(),
    }
}

/// Error types for configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("Invalid object size limit: {0}")]
    InvalidObjectLimit(String),
}
