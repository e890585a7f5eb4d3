//! nwtest
//!
//! Help and reference documentation for the nwtest network response time and
//! throughput test utility. Every numeric bound shown to the operator is read
//! from a [`HelpConfig`] at render time, so the text always matches the limits
//! that the measurement engine enforces.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod platform;

// Re-export commonly used types
pub use cli::{HelpExit, HelpSystem, Topic};
pub use error::{AppError, Result};
pub use models::{Bound, Config, FeatureFlags, HelpConfig, Limits};
pub use platform::{FixedSocketBuffer, SocketBufferProbe, SystemSocketBuffer};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Exit status reported after any help display, valid topic or not.
pub const HELP_EXIT_CODE: i32 = 100;

/// Version string shown in the help banner, with the commit when known.
pub fn version_string() -> String {
    match option_env!("GIT_COMMIT") {
        Some(commit) => format!("{} ({})", VERSION, commit),
        None => VERSION.to_string(),
    }
}

/// Build time and target triple recorded by the build script
pub fn build_info() -> String {
    format!(
        "{} {} built {} for {}",
        PKG_NAME,
        version_string(),
        option_env!("BUILD_TIME").unwrap_or("unknown"),
        option_env!("TARGET_TRIPLE").unwrap_or("unknown"),
    )
}

/// Default test parameter bounds
pub mod defaults {
    pub const MIN_DURATION: u64 = 1;
    pub const MAX_DURATION: u64 = 3600;
    pub const DEFAULT_DURATION: u64 = 10;

    pub const MIN_RAMP: u64 = 0;
    pub const MAX_RAMP: u64 = 60;
    pub const DEFAULT_RAMP: u64 = 5;

    pub const MIN_MESSAGE_SIZE: u64 = 64;
    pub const MAX_MESSAGE_SIZE: u64 = 1_048_576;
    pub const DEFAULT_CLIENT_MESSAGE_SIZE: u64 = 1024;
    pub const DEFAULT_SERVER_MESSAGE_SIZE: u64 = 1024;

    pub const MIN_CLIENT_CONNECTIONS: u64 = 1;
    pub const MAX_CLIENT_CONNECTIONS: u64 = 1000;
    pub const DEFAULT_CLIENT_CONNECTIONS: u64 = 1;

    pub const MIN_SERVER_CONNECTIONS: u64 = 1;
    pub const MAX_SERVER_CONNECTIONS: u64 = 1000;
    pub const DEFAULT_SERVER_CONNECTIONS: u64 = 50;

    pub const MIN_BUFFER_SIZE: u64 = 1024;
    pub const MAX_BUFFER_SIZE: u64 = 16_777_216;

    /// Used when the platform does not expose its socket buffer ceiling.
    pub const FALLBACK_MAX_SOCKET_BUFFER: u64 = 8_388_608;

    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
