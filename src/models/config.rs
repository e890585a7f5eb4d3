//! Configuration data model: test parameter limits, feature flags and the
//! logging settings of the command-line front end

use crate::defaults;
use crate::error::{AppError, ErrorContext, Result};
use crate::logging::{LogFormat, LogLevel};
use serde::{Deserialize, Serialize};

/// Minimum, maximum and default of one numeric test parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bound {
    pub min: u64,
    pub max: u64,
    pub default: u64,
}

impl Bound {
    pub const fn new(min: u64, max: u64, default: u64) -> Self {
        Self { min, max, default }
    }

    /// Check `min <= default <= max`
    pub fn validate(&self, name: &str) -> Result<()> {
        if self.min > self.max {
            return Err(AppError::validation(format!(
                "{} minimum ({}) exceeds maximum ({})", name, self.min, self.max
            )));
        }
        if self.default < self.min || self.default > self.max {
            return Err(AppError::validation(format!(
                "{} default ({}) is outside {}..={}", name, self.default, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Message size limits shared by both roles, with a default per role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSizeLimits {
    pub min: u64,
    pub max: u64,
    pub client_default: u64,
    pub server_default: u64,
}

impl MessageSizeLimits {
    pub fn client(&self) -> Bound {
        Bound::new(self.min, self.max, self.client_default)
    }

    pub fn server(&self) -> Bound {
        Bound::new(self.min, self.max, self.server_default)
    }
}

/// Socket send/receive buffer size limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferLimits {
    pub min: u64,
    pub max: u64,
}

/// All bounds and defaults enforced by the measurement engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Measurement duration in seconds
    pub duration: Bound,
    /// Ramp-up/down time in seconds
    pub ramp: Bound,
    /// Application data bytes per message
    pub message_size: MessageSizeLimits,
    pub client_connections: Bound,
    pub server_connections: Bound,
    pub buffer_size: BufferLimits,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            duration: Bound::new(
                defaults::MIN_DURATION,
                defaults::MAX_DURATION,
                defaults::DEFAULT_DURATION,
            ),
            ramp: Bound::new(defaults::MIN_RAMP, defaults::MAX_RAMP, defaults::DEFAULT_RAMP),
            message_size: MessageSizeLimits {
                min: defaults::MIN_MESSAGE_SIZE,
                max: defaults::MAX_MESSAGE_SIZE,
                client_default: defaults::DEFAULT_CLIENT_MESSAGE_SIZE,
                server_default: defaults::DEFAULT_SERVER_MESSAGE_SIZE,
            },
            client_connections: Bound::new(
                defaults::MIN_CLIENT_CONNECTIONS,
                defaults::MAX_CLIENT_CONNECTIONS,
                defaults::DEFAULT_CLIENT_CONNECTIONS,
            ),
            server_connections: Bound::new(
                defaults::MIN_SERVER_CONNECTIONS,
                defaults::MAX_SERVER_CONNECTIONS,
                defaults::DEFAULT_SERVER_CONNECTIONS,
            ),
            buffer_size: BufferLimits {
                min: defaults::MIN_BUFFER_SIZE,
                max: defaults::MAX_BUFFER_SIZE,
            },
        }
    }
}

/// Optional command-line options of the current build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// `-bsz`, `-sbsz` and `-rbsz` are accepted
    pub buffer_size: bool,
    /// `-nodelay` is accepted
    pub no_delay: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            buffer_size: cfg!(feature = "buffer-size"),
            no_delay: cfg!(feature = "no-delay"),
        }
    }
}

/// Everything the help text reads: limits, feature flags and the version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpConfig {
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default = "crate::version_string")]
    pub version: String,
}

impl Default for HelpConfig {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            features: FeatureFlags::default(),
            version: crate::version_string(),
        }
    }
}

impl HelpConfig {
    /// Reject limits whose defaults fall outside their range
    pub fn validate(&self) -> Result<()> {
        let limits = &self.limits;
        limits.duration.validate("Duration")?;
        limits.ramp.validate("Ramp")?;
        limits.message_size.client().validate("Client message size")?;
        limits.message_size.server().validate("Server message size")?;
        limits.client_connections.validate("Client connections")?;
        limits.server_connections.validate("Server connections")?;

        if limits.buffer_size.min > limits.buffer_size.max {
            return Err(AppError::validation(format!(
                "Buffer size minimum ({}) exceeds maximum ({})",
                limits.buffer_size.min, limits.buffer_size.max
            )));
        }

        if self.version.trim().is_empty() {
            return Err(AppError::validation("Version string cannot be empty"));
        }

        Ok(())
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub help: HelpConfig,

    /// Minimum level written to stderr
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,

    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    /// Enable colored diagnostics on stderr
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            help: HelpConfig::default(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            enable_color: default_enable_color(),
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        self.help.validate()
    }

    /// Merge `NWTEST_*` environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        self.merge_from_lookup(|key| std::env::var(key).ok())
    }

    /// Merge settings from any key/value source using the `NWTEST_*` names
    pub fn merge_from_lookup<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |key: &str| -> Result<Option<u64>> {
            match lookup(key) {
                Some(value) => value.trim().parse::<u64>()
                    .map(Some)
                    .with_context(|| format!("Invalid {} value '{}'", key, value)),
                None => Ok(None),
            }
        };
        let flag = |key: &str| -> Result<Option<bool>> {
            match lookup(key) {
                Some(value) => value.trim().to_lowercase().parse::<bool>()
                    .map(Some)
                    .with_context(|| format!("Invalid {} value '{}'", key, value)),
                None => Ok(None),
            }
        };

        let limits = &mut self.help.limits;
        let numeric: [(&str, &mut u64); 18] = [
            ("NWTEST_MIN_DURATION", &mut limits.duration.min),
            ("NWTEST_MAX_DURATION", &mut limits.duration.max),
            ("NWTEST_DEFAULT_DURATION", &mut limits.duration.default),
            ("NWTEST_MIN_RAMP", &mut limits.ramp.min),
            ("NWTEST_MAX_RAMP", &mut limits.ramp.max),
            ("NWTEST_DEFAULT_RAMP", &mut limits.ramp.default),
            ("NWTEST_MIN_MSG_SIZE", &mut limits.message_size.min),
            ("NWTEST_MAX_MSG_SIZE", &mut limits.message_size.max),
            ("NWTEST_DEFAULT_CLIENT_MSG_SIZE", &mut limits.message_size.client_default),
            ("NWTEST_DEFAULT_SERVER_MSG_SIZE", &mut limits.message_size.server_default),
            ("NWTEST_MIN_CLIENT_CONN", &mut limits.client_connections.min),
            ("NWTEST_MAX_CLIENT_CONN", &mut limits.client_connections.max),
            ("NWTEST_DEFAULT_CLIENT_CONN", &mut limits.client_connections.default),
            ("NWTEST_MIN_SERVER_CONN", &mut limits.server_connections.min),
            ("NWTEST_MAX_SERVER_CONN", &mut limits.server_connections.max),
            ("NWTEST_DEFAULT_SERVER_CONN", &mut limits.server_connections.default),
            ("NWTEST_MIN_BUFFER_SIZE", &mut limits.buffer_size.min),
            ("NWTEST_MAX_BUFFER_SIZE", &mut limits.buffer_size.max),
        ];
        for (key, slot) in numeric {
            if let Some(value) = number(key)? {
                *slot = value;
            }
        }

        if let Some(enabled) = flag("NWTEST_BUFFER_SIZE_OPTION")? {
            self.help.features.buffer_size = enabled;
        }
        if let Some(enabled) = flag("NWTEST_NODELAY_OPTION")? {
            self.help.features.no_delay = enabled;
        }
        if let Some(version) = lookup("NWTEST_VERSION") {
            self.help.version = version.trim().to_string();
        }

        if let Some(level) = lookup("NWTEST_LOG_LEVEL") {
            self.log_level = level.parse()?;
        }
        if let Some(format) = lookup("NWTEST_LOG_FORMAT") {
            self.log_format = format.parse()?;
        }
        if let Some(enabled) = flag("NWTEST_ENABLE_COLOR")? {
            self.enable_color = enabled;
        }

        Ok(())
    }
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_format() -> LogFormat {
    LogFormat::Console
}

fn default_enable_color() -> bool {
    defaults::DEFAULT_ENABLE_COLOR
}
