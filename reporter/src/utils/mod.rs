//! Utility functions shared across the reporter

pub mod crypto;
pub mod string;
pub mod time;
