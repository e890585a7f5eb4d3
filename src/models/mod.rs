//! Data models for nwtest

pub mod config;

pub use config::{Bound, BufferLimits, Config, FeatureFlags, HelpConfig, Limits, MessageSizeLimits};
