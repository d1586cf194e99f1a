//! Utility modules for configuration handling

pub mod config;

pub use self::config::SimulationConfig;
