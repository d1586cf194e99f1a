//! Core types and constants for the telemetry simulator

pub mod constants;
pub mod types;

pub use self::constants::*;
pub use self::types::*;
