//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use crate::logging::{LogFormat, LogLevel, Logger};
use std::path::Path;

/// Names of the `NWTEST_*` variables holding plain integers
const NUMERIC_VARS: &[&str] = &[
    "NWTEST_MIN_DURATION",
    "NWTEST_MAX_DURATION",
    "NWTEST_DEFAULT_DURATION",
    "NWTEST_MIN_RAMP",
    "NWTEST_MAX_RAMP",
    "NWTEST_DEFAULT_RAMP",
    "NWTEST_MIN_MSG_SIZE",
    "NWTEST_MAX_MSG_SIZE",
    "NWTEST_DEFAULT_CLIENT_MSG_SIZE",
    "NWTEST_DEFAULT_SERVER_MSG_SIZE",
    "NWTEST_MIN_CLIENT_CONN",
    "NWTEST_MAX_CLIENT_CONN",
    "NWTEST_DEFAULT_CLIENT_CONN",
    "NWTEST_MIN_SERVER_CONN",
    "NWTEST_MAX_SERVER_CONN",
    "NWTEST_DEFAULT_SERVER_CONN",
    "NWTEST_MIN_BUFFER_SIZE",
    "NWTEST_MAX_BUFFER_SIZE",
];

const FLAG_VARS: &[&str] = &[
    "NWTEST_BUFFER_SIZE_OPTION",
    "NWTEST_NODELAY_OPTION",
    "NWTEST_ENABLE_COLOR",
];

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load the given env file if it exists; existing process variables win
    pub fn load_env_file(path: &Path, logger: &Logger) -> Result<bool> {
        if !path.exists() {
            logger.debug("No .env file found, using defaults and environment")
                .field("path", path.display().to_string())
                .log();
            return Ok(false);
        }

        dotenv::from_path(path)
            .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

        logger.debug("Loaded configuration from env file")
            .field("path", path.display().to_string())
            .log();
        Ok(true)
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        let value = value.trim();

        if NUMERIC_VARS.contains(&key) {
            value.parse::<u64>()
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
        } else if FLAG_VARS.contains(&key) {
            value.to_lowercase().parse::<bool>()
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
        } else {
            match key {
                "NWTEST_LOG_LEVEL" => {
                    value.parse::<LogLevel>()?;
                }
                "NWTEST_LOG_FORMAT" => {
                    value.parse::<LogFormat>()?;
                }
                "NWTEST_VERSION" => {
                    if value.is_empty() {
                        return Err(AppError::config("NWTEST_VERSION cannot be empty"));
                    }
                }
                _ => {
                    // Unknown environment variable, ignore
                }
            }
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("NWTEST_MIN_DURATION", "Shortest allowed measurement duration (seconds)", "1"),
            ("NWTEST_MAX_DURATION", "Longest allowed measurement duration (seconds)", "3600"),
            ("NWTEST_DEFAULT_DURATION", "Default measurement duration (seconds)", "10"),
            ("NWTEST_MIN_RAMP", "Shortest allowed ramp-up/down time (seconds)", "0"),
            ("NWTEST_MAX_RAMP", "Longest allowed ramp-up/down time (seconds)", "60"),
            ("NWTEST_DEFAULT_RAMP", "Default ramp-up/down time (seconds)", "5"),
            ("NWTEST_MIN_MSG_SIZE", "Smallest allowed message size (bytes)", "64"),
            ("NWTEST_MAX_MSG_SIZE", "Largest allowed message size (bytes)", "1048576"),
            ("NWTEST_DEFAULT_CLIENT_MSG_SIZE", "Default client message size (bytes)", "1024"),
            ("NWTEST_DEFAULT_SERVER_MSG_SIZE", "Default server maximum message size (bytes)", "1024"),
            ("NWTEST_MIN_CLIENT_CONN", "Fewest client connections", "1"),
            ("NWTEST_MAX_CLIENT_CONN", "Most client connections", "1000"),
            ("NWTEST_DEFAULT_CLIENT_CONN", "Default client connections", "1"),
            ("NWTEST_MIN_SERVER_CONN", "Fewest server connections", "1"),
            ("NWTEST_MAX_SERVER_CONN", "Most server connections", "1000"),
            ("NWTEST_DEFAULT_SERVER_CONN", "Default server connection limit", "50"),
            ("NWTEST_MIN_BUFFER_SIZE", "Smallest socket buffer size (bytes)", "1024"),
            ("NWTEST_MAX_BUFFER_SIZE", "Largest socket buffer size (bytes)", "16777216"),
            ("NWTEST_BUFFER_SIZE_OPTION", "Document the -bsz/-sbsz/-rbsz options", "true"),
            ("NWTEST_NODELAY_OPTION", "Document the -nodelay option", "true"),
            ("NWTEST_VERSION", "Override the version shown in the banner", "0.3.2"),
            ("NWTEST_LOG_LEVEL", "Minimum diagnostic level (trace..fatal)", "warn"),
            ("NWTEST_LOG_FORMAT", "Diagnostic format (console, json, compact)", "console"),
            ("NWTEST_ENABLE_COLOR", "Enable colored diagnostics", "true"),
        ]
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Vec<String> {
        Self::validate_env_from(|key| std::env::var(key).ok())
    }

    /// Validate every supported variable that `lookup` knows about
    pub fn validate_env_from<F>(lookup: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut warnings = Vec::new();

        for (var_name, _, _) in Self::get_supported_env_vars() {
            if let Some(value) = lookup(var_name) {
                if let Err(e) = Self::validate_env_var(var_name, &value) {
                    warnings.push(format!("Warning: {}", e));
                }
            }
        }

        warnings
    }

    /// Check an env file's contents without loading it
    pub fn check_env_file(path: &Path) -> Result<Option<Vec<String>>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("Failed to read {}: {}", path.display(), e)))?;

        let mut warnings = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                if let Err(e) = Self::validate_env_var(key.trim(), value) {
                    warnings.push(format!("Line '{}': {}", line, e));
                }
            }
        }

        Ok(Some(warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_env_manager_validate_env_var() {
        // Valid cases
        assert!(EnvManager::validate_env_var("NWTEST_MAX_DURATION", "3600").is_ok());
        assert!(EnvManager::validate_env_var("NWTEST_DEFAULT_SERVER_CONN", " 50 ").is_ok());
        assert!(EnvManager::validate_env_var("NWTEST_NODELAY_OPTION", "False").is_ok());
        assert!(EnvManager::validate_env_var("NWTEST_LOG_LEVEL", "trace").is_ok());
        assert!(EnvManager::validate_env_var("NWTEST_LOG_FORMAT", "json").is_ok());
        assert!(EnvManager::validate_env_var("SOMETHING_ELSE", "anything").is_ok());

        // Invalid cases
        assert!(EnvManager::validate_env_var("NWTEST_MAX_DURATION", "-1").is_err());
        assert!(EnvManager::validate_env_var("NWTEST_MIN_MSG_SIZE", "1k").is_err());
        assert!(EnvManager::validate_env_var("NWTEST_BUFFER_SIZE_OPTION", "yes").is_err());
        assert!(EnvManager::validate_env_var("NWTEST_LOG_LEVEL", "noisy").is_err());
        assert!(EnvManager::validate_env_var("NWTEST_VERSION", "  ").is_err());
    }

    #[test]
    fn test_get_supported_env_vars() {
        let vars = EnvManager::get_supported_env_vars();

        assert_eq!(vars.len(), NUMERIC_VARS.len() + FLAG_VARS.len() + 3);
        for name in NUMERIC_VARS.iter().chain(FLAG_VARS) {
            assert!(vars.iter().any(|(var, _, _)| var == name), "undocumented {}", name);
        }
    }

    #[test]
    fn test_check_env_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file, "NWTEST_MAX_RAMP=120").unwrap();
        writeln!(file, "NWTEST_MIN_RAMP=never").unwrap();

        let warnings = EnvManager::check_env_file(file.path()).unwrap().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("NWTEST_MIN_RAMP"));

        let missing = EnvManager::check_env_file(Path::new("/nonexistent/nwtest/.env")).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_validate_env_from_reports_each_bad_value() {
        let lookup = |key: &str| match key {
            "NWTEST_MAX_DURATION" => Some("3600".to_string()),
            "NWTEST_DEFAULT_RAMP" => Some("soon".to_string()),
            "NWTEST_LOG_FORMAT" => Some("xml".to_string()),
            _ => None,
        };

        let warnings = EnvManager::validate_env_from(lookup);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.contains("NWTEST_DEFAULT_RAMP")));
        assert!(warnings.iter().any(|w| w.contains("xml")));
        assert!(EnvManager::validate_env_from(|_| None).is_empty());
    }

    #[test]
    fn test_load_missing_env_file() {
        let logger = Logger::new("test");
        let loaded = EnvManager::load_env_file(Path::new("/nonexistent/nwtest/.env"), &logger).unwrap();
        assert!(!loaded);
    }
}
