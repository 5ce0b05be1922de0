//! Platform-specific transports

pub mod cli;

pub use cli::StdoutSink;
