//! Acoustic Telemetry Test-Data Synthesizer
//!
//! Generates realistic validation data for acoustic positioning estimators:
//! a ground-truth movement track, a subsampled ping schedule following a
//! device-specific timing protocol, and a corrupted time-of-arrival matrix
//! over a fixed receiver array. Feeding the TOA matrix to an estimator and
//! comparing its output against the known track validates its accuracy.

pub mod core;
pub mod simulation;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use crate::core::{Receiver, TelemetryPing, TrackPoint, BASELINE_SOUND_SPEED};
pub use crate::simulation::interpolate::interpolate_track;
pub use crate::simulation::movement::{simulate_track, MovementModel, SoundSpeedModel, TrackConfig};
pub use crate::simulation::pipeline::{simulate_dataset, SimulationDataset};
pub use crate::simulation::scheduler::{
    schedule_pings, PingSchedule, TransmitterConfig, TransmitterProtocol,
};
pub use crate::simulation::toa::{corrupt_toa, CorruptionParams, ToaObservations};
pub use crate::utils::config::SimulationConfig;
pub use crate::validation::{ConfigError, ConfigResult};
