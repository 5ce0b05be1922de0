//! Shared utilities for twstock-bot
//!
//! This crate provides process-level concerns used across the workspace:
//! logging setup and the configuration that drives it.

pub mod config;
pub mod logging;

pub use config::Config;
pub use logging::{LogFormat, init_tracing};
