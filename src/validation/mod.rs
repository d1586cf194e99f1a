//! Configuration validation and error taxonomy

pub mod error;

pub use self::error::{require, ConfigError, ConfigResult};
