//! Simulation configuration surface
//!
//! One serde-backed structure covering every recognized option of the
//! pipeline, with JSON file load/save. Model- and protocol-specific numeric
//! parameters are optional at this level; validation resolves what the
//! selected variants require and fails eagerly on anything absent or out of
//! domain.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::Receiver;
use crate::simulation::movement::{MovementModel, SoundSpeedModel, TrackConfig};
use crate::simulation::scheduler::{TransmitterConfig, TransmitterProtocol};
use crate::simulation::toa::CorruptionParams;
use crate::validation::{ConfigError, ConfigResult};

/// Full configuration of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Movement model of the true track
    pub movement: TrackConfig,
    /// Transmitter timing protocol
    pub transmitter: TransmitterConfig,
    /// TOA corruption parameters
    pub corruption: CorruptionParams,
    /// Fixed receiver array (external input; at least 2 for a meaningful
    /// TOA matrix)
    #[serde(default)]
    pub receivers: Vec<Receiver>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            movement: TrackConfig {
                model: MovementModel::IndependentWalk,
                n_points: 3600,
                delta_time: 1.0,
                diffusivity: Some(0.5),
                step_shape: None,
                step_scale: None,
                diel_pattern: false,
                sound_speed_model: SoundSpeedModel::RandomWalk,
                start_position: None,
            },
            transmitter: TransmitterConfig {
                protocol: TransmitterProtocol::Random,
                interval_mean: None,
                interval_sd: None,
                interval_min: Some(60.0),
                interval_max: Some(120.0),
            },
            corruption: CorruptionParams {
                sigma_toa: 1.0e-4,
                p_na: 0.05,
                p_mp: 0.02,
                time_resolution: None,
            },
            receivers: Vec::new(),
        }
    }
}

impl SimulationConfig {
    /// Validate every section against the selected model and protocol.
    pub fn validate(&self) -> ConfigResult<()> {
        self.movement.validate()?;
        self.transmitter.validate()?;
        self.corruption.validate()?;
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: SimulationConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to parse config file '{}': {}", path_str, e),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a JSON file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to serialize config: {}", e),
            })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })
    }
}
