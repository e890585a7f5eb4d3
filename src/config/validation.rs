//! Configuration validation utilities and rules

use crate::{
    models::{Config, HelpConfig},
    error::Result,
};
use colored::Colorize;

/// Limit validation plus advisory checks on unusual combinations
pub struct ConfigValidator;

impl ConfigValidator {
    /// Reject invalid limits, then collect warnings for odd but legal ones
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        // Hard errors first; warnings only make sense for consistent limits
        config.validate()?;

        let mut warnings = Vec::new();
        warnings.extend(Self::validate_timing(&config.help));
        warnings.extend(Self::validate_sizes(&config.help));
        warnings.extend(Self::validate_connections(&config.help));

        Ok(warnings)
    }

    fn validate_timing(help: &HelpConfig) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let limits = &help.limits;

        if limits.duration.min == 0 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                "Minimum duration of 0s allows tests with no measurement phase".to_string(),
            ));
        }

        if limits.ramp.default > limits.duration.default {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "Default ramp of {}s is longer than the default measurement duration of {}s",
                    limits.ramp.default, limits.duration.default
                ),
            ));
        }

        warnings
    }

    fn validate_sizes(help: &HelpConfig) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let sizes = &help.limits.message_size;

        if sizes.client_default > sizes.server_default {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Default client message size ({}) exceeds the default server maximum ({}); default runs will be rejected",
                    sizes.client_default, sizes.server_default
                ),
            ));
        }

        if !help.features.buffer_size
            && help.limits.buffer_size != crate::models::Limits::default().buffer_size
        {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                "Buffer size limits are customised but the buffer size options are disabled".to_string(),
            ));
        }

        warnings
    }

    fn validate_connections(help: &HelpConfig) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let limits = &help.limits;

        if limits.client_connections.max > limits.server_connections.max {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "Clients may open {} connections but servers accept at most {}",
                    limits.client_connections.max, limits.server_connections.max
                ),
            ));
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        let tag = if use_color {
            match self.level {
                ValidationLevel::Info => self.level.as_str().blue().to_string(),
                ValidationLevel::Warning => self.level.as_str().yellow().to_string(),
            }
        } else {
            self.level.as_str().to_string()
        };
        format!("[{}] {}", tag, self.message)
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Bound;

    #[test]
    fn test_default_config_has_no_warnings() {
        let warnings = validate_config(&Config::default()).unwrap();
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    }

    #[test]
    fn test_invalid_limits_are_errors() {
        let mut config = Config::default();
        config.help.limits.duration = Bound::new(10, 5, 7);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_minimum_duration_warning() {
        let mut config = Config::default();
        config.help.limits.duration.min = 0;
        let warnings = validate_config(&config).unwrap();
        assert!(warnings.iter().any(|w| w.level == ValidationLevel::Warning
            && w.message.contains("no measurement phase")));
    }

    #[test]
    fn test_client_message_larger_than_server_warning() {
        let mut config = Config::default();
        config.help.limits.message_size.client_default = 4096;
        config.help.limits.message_size.server_default = 1024;
        let warnings = validate_config(&config).unwrap();
        assert!(warnings.iter().any(|w| w.message.contains("will be rejected")));
    }

    #[test]
    fn test_buffer_limits_with_option_disabled() {
        let mut config = Config::default();
        config.help.features.buffer_size = false;
        config.help.limits.buffer_size.max = 2048;
        let warnings = validate_config(&config).unwrap();
        assert!(warnings.iter().any(|w| w.level == ValidationLevel::Info
            && w.message.contains("buffer size options are disabled")));
    }

    #[test]
    fn test_warning_format() {
        let warning = ValidationWarning::new(
            ValidationLevel::Warning,
            "Test warning message".to_string()
        );

        assert_eq!(warning.format(false), "[WARNING] Test warning message");
        assert_eq!(ValidationLevel::Info.as_str(), "INFO");
        assert_eq!(ValidationLevel::Warning.as_str(), "WARNING");
    }
}
