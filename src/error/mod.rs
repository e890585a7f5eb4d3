//! Error handling for nwtest

use thiserror::Error;

/// Custom error types for nwtest
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Parsing errors (numbers, flags, JSON)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Validation(_) => "VALIDATION",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Config(msg) => {
                format!("Configuration problem: {}\n\nSuggestion: Check your .env file and NWTEST_* environment variables.", msg)
            }
            Self::Validation(msg) => {
                format!("Invalid limits: {}\n\nSuggestion: Every bound must satisfy minimum <= default <= maximum.", msg)
            }
            Self::Io(msg) => {
                format!("File operation failed: {}\n\nSuggestion: Check file permissions and that the path exists.", msg)
            }
            Self::Parse(msg) => {
                format!("Failed to parse value: {}\n\nSuggestion: Numeric settings take plain integers, flags take true or false.", msg)
            }
            Self::Internal(msg) => {
                format!("Internal error: {}\n\nThis is likely a bug. Please report this issue with the error details.", msg)
            }
        }
    }

    /// Get exit code for this error type
    ///
    /// None of these collide with [`crate::HELP_EXIT_CODE`].
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) => 1,
            Self::Io(_) => 5,
            Self::Internal(_) => 99,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Validation(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::Io(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON parse error: {}", error))
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::parse(format!("Integer parse error: {}", error))
    }
}

impl From<std::str::ParseBoolError> for AppError {
    fn from(error: std::str::ParseBoolError) -> Self {
        Self::parse(format!("Boolean parse error: {}", error))
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error context trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error
    fn context(self, message: &'static str) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let base_error = e.into();
            match base_error {
                AppError::Config(msg) => AppError::config(format!("{}: {}", f(), msg)),
                AppError::Validation(msg) => AppError::validation(format!("{}: {}", f(), msg)),
                AppError::Io(msg) => AppError::io(format!("{}: {}", f(), msg)),
                AppError::Parse(msg) => AppError::parse(format!("{}: {}", f(), msg)),
                AppError::Internal(msg) => AppError::internal(format!("{}: {}", f(), msg)),
            }
        })
    }

    fn context(self, message: &'static str) -> Result<T> {
        self.with_context(|| message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(AppError::config("x").category(), "CONFIG");
        assert_eq!(AppError::validation("x").category(), "VALIDATION");
        assert_eq!(AppError::io("x").category(), "IO");
        assert_eq!(AppError::parse("x").category(), "PARSE");
        assert_eq!(AppError::internal("x").category(), "INTERNAL");
    }

    #[test]
    fn test_exit_codes_never_use_help_code() {
        let errors = [
            AppError::config("x"),
            AppError::validation("x"),
            AppError::io("x"),
            AppError::parse("x"),
            AppError::internal("x"),
        ];

        for error in &errors {
            assert_ne!(error.exit_code(), crate::HELP_EXIT_CODE);
            assert_ne!(error.exit_code(), 0);
        }
    }

    #[test]
    fn test_error_display() {
        let error = AppError::config("bad limit");
        assert_eq!(error.to_string(), "Configuration error: bad limit");
        assert!(error.user_friendly_message().contains("NWTEST_"));
    }

    #[test]
    fn test_format_for_console_plain() {
        let error = AppError::validation("duration default out of range");
        let formatted = error.format_for_console(false);
        assert_eq!(formatted, "[VALIDATION] Validation error: duration default out of range");
        assert!(!formatted.contains("\u{1b}["));
    }

    #[test]
    fn test_conversions() {
        let parse_error: AppError = "abc".parse::<u64>().unwrap_err().into();
        assert!(matches!(parse_error, AppError::Parse(_)));

        let bool_error: AppError = "maybe".parse::<bool>().unwrap_err().into();
        assert!(matches!(bool_error, AppError::Parse(_)));

        let io_error: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(io_error, AppError::Io(_)));
    }

    #[test]
    fn test_error_context() {
        let result: std::result::Result<u64, std::num::ParseIntError> = "x".parse::<u64>();
        let error = result.context("NWTEST_MAX_DURATION").unwrap_err();
        assert!(error.to_string().contains("NWTEST_MAX_DURATION"));
        assert!(matches!(error, AppError::Parse(_)));
    }
}
