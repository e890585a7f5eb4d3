//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    models::Config,
    error::{AppError, Result},
    config::env::EnvManager,
    logging::{LogLevel, Logger},
};
use std::path::PathBuf;

/// Configuration parser that layers defaults, the env file, the process
/// environment and CLI flags, in that order
pub struct ConfigParser {
    cli: Cli,
    logger: Logger,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        let mut logger = Logger::new("config");
        if cli.debug {
            logger.set_level(LogLevel::Debug);
        }
        Self { cli, logger }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        self.load_env_file()?;

        for warning in EnvManager::validate_current_env() {
            self.logger.warn(&warning).log();
        }

        config.merge_from_env()?;

        self.apply_cli_overrides(&mut config)?;

        config.validate()?;

        Ok(config)
    }

    /// Load the env file; an explicitly named file must exist
    fn load_env_file(&self) -> Result<()> {
        let path = match &self.cli.env_file {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::config(format!(
                        "Env file not found: {}", path.display()
                    )));
                }
                path.clone()
            }
            None => PathBuf::from(".env"),
        };

        if let Some(warnings) = EnvManager::check_env_file(&path)? {
            for warning in warnings {
                self.logger.warn(&warning)
                    .field("path", path.display().to_string())
                    .log();
            }
        }

        EnvManager::load_env_file(&path, &self.logger)?;
        Ok(())
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) -> Result<()> {
        self.cli.validate().map_err(AppError::validation)?;

        if self.cli.no_color {
            config.enable_color = false;
        } else if self.cli.color {
            config.enable_color = true;
        }

        if self.cli.debug {
            config.debug = true;
            config.log_level = LogLevel::Debug;
        }

        self.logger.debug("Applied CLI overrides")
            .field("enable_color", config.enable_color)
            .field("log_level", config.log_level.as_str())
            .log();

        Ok(())
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    let parser = ConfigParser::new(cli);
    parser.parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let help = &config.help;
    let limits = &help.limits;
    let mut summary = Vec::new();

    summary.push(format!("Version: {}", help.version));
    summary.push(format!(
        "Duration: {}..={}s (default {})",
        limits.duration.min, limits.duration.max, limits.duration.default
    ));
    summary.push(format!(
        "Ramp: {}..={}s (default {})",
        limits.ramp.min, limits.ramp.max, limits.ramp.default
    ));
    summary.push(format!(
        "Message size: {}..={} bytes (client {}, server {})",
        limits.message_size.min,
        limits.message_size.max,
        limits.message_size.client_default,
        limits.message_size.server_default
    ));
    summary.push(format!(
        "Connections: client {}..={} (default {}), server {}..={} (default {})",
        limits.client_connections.min,
        limits.client_connections.max,
        limits.client_connections.default,
        limits.server_connections.min,
        limits.server_connections.max,
        limits.server_connections.default
    ));
    summary.push(format!(
        "Buffer size option: {} ({}..={})",
        help.features.buffer_size, limits.buffer_size.min, limits.buffer_size.max
    ));
    summary.push(format!("No-delay option: {}", help.features.no_delay));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::env;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_cli_overrides() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let file = env_file("");
        let path = file.path().to_str().unwrap();

        let cli = Cli::parse_from(["nwtest", "--debug", "--no-color", "--env-file", path, "help"]);
        let config = load_config(cli).unwrap();

        assert!(config.debug);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert!(!config.enable_color);
    }

    #[test]
    fn test_env_file_values_are_applied() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        env::remove_var("NWTEST_DEFAULT_RAMP");
        let file = env_file("NWTEST_DEFAULT_RAMP=2\n");
        let path = file.path().to_str().unwrap();

        let cli = Cli::parse_from(["nwtest", "--env-file", path]);
        let config = load_config(cli);
        env::remove_var("NWTEST_DEFAULT_RAMP");

        assert_eq!(config.unwrap().help.limits.ramp.default, 2);
    }

    #[test]
    fn test_missing_explicit_env_file() {
        let cli = Cli::parse_from(["nwtest", "--env-file", "/nonexistent/nwtest.env"]);
        let error = load_config(cli).unwrap_err();
        assert!(error.to_string().contains("Env file not found"));
    }

    #[test]
    fn test_conflicting_color_flags() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let file = env_file("");
        let path = file.path().to_str().unwrap();

        let cli = Cli::parse_from(["nwtest", "--color", "--no-color", "--env-file", path]);
        assert!(load_config(cli).is_err());
    }

    #[test]
    fn test_display_config_summary() {
        let summary = display_config_summary(&Config::default());
        assert!(summary.contains("Duration: 1..=3600s (default 10)"));
        assert!(summary.contains("Message size: 64..=1048576 bytes"));
        assert!(summary.contains("Debug: false"));
    }
}
