//! CityReport Core - configuration shared by every process
//!
//! This crate owns the startup configuration record and its loader.
//! It performs no I/O beyond reading the environment and an optional `.env` file.

pub mod config;
pub mod error;

pub use config::Config;
pub use error::{ConfigError, ConfigResult};
