//! Core reporter infrastructure

pub mod config;
pub mod constants;
pub mod shutdown;

pub use config::ReporterConfig;
pub use shutdown::ReporterHandle;
