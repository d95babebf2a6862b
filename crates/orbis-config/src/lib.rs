//! Orbis configuration.
//!
//! Settings persist to disk as RON, tolerate missing or unknown fields, and
//! can be overridden from the command line.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, GlobeConfig, LandmassConfig, SceneConfig, WindowConfig,
};
pub use error::ConfigError;
