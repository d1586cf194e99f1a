//! Four-stage synthetic-data pipeline
//!
//! Data flows strictly forward: movement simulation produces the dense true
//! track, the scheduler derives ping times from the track duration, the
//! interpolator maps pings onto the track, and the corruptor turns true ping
//! states plus a receiver array into the observable TOA matrix.

pub mod interpolate;
pub mod movement;
pub mod pipeline;
pub mod scheduler;
pub mod toa;

pub use self::interpolate::interpolate_track;
pub use self::movement::{simulate_track, MovementModel, SoundSpeedModel, TrackConfig};
pub use self::pipeline::{simulate_dataset, SimulationDataset};
pub use self::scheduler::{schedule_pings, PingSchedule, TransmitterConfig, TransmitterProtocol};
pub use self::toa::{corrupt_toa, resolve_time_resolution, CorruptionParams, ToaObservations};
