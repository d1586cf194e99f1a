//! One-call facade over the four-stage pipeline
//!
//! Runs movement simulation, ping scheduling, track interpolation and TOA
//! corruption from a single resolved configuration. Each invocation is pure
//! given its random source; reproducing a dataset only requires reusing the
//! seed.

use log::debug;
use rand::Rng;

use crate::core::{TelemetryPing, TrackPoint};
use crate::simulation::interpolate::interpolate_track;
use crate::simulation::movement::simulate_track;
use crate::simulation::scheduler::{schedule_pings, PingSchedule};
use crate::simulation::toa::{corrupt_toa, ToaObservations};
use crate::utils::config::SimulationConfig;
use crate::validation::ConfigResult;

/// Complete output of one simulation run: the ground truth, the ping
/// schedule, the interpolated transmitter states and the observable TOA
/// matrix with its multipath mask.
#[derive(Debug, Clone)]
pub struct SimulationDataset {
    pub track: Vec<TrackPoint>,
    pub schedule: PingSchedule,
    pub telemetry: Vec<TelemetryPing>,
    pub observations: ToaObservations,
}

/// Run the full pipeline once.
///
/// Configuration errors are detected before any simulation work begins;
/// there are no partial results.
pub fn simulate_dataset(
    config: &SimulationConfig,
    rng: &mut impl Rng,
) -> ConfigResult<SimulationDataset> {
    config.validate()?;

    let track = simulate_track(&config.movement, rng)?;
    let duration = track.last().map_or(0.0, |point| point.time);
    debug!("simulated track: {} samples over {:.1} s", track.len(), duration);

    let schedule = schedule_pings(duration, &config.transmitter, rng)?;
    debug!("scheduled {} pings", schedule.ping_times.len());

    let telemetry = interpolate_track(&track, &schedule.ping_times);

    let observations = corrupt_toa(
        &telemetry,
        &config.receivers,
        config.transmitter.protocol,
        &config.corruption,
        rng,
    )?;
    debug!(
        "toa matrix {}x{}: {} missing, {} multipath",
        observations.toa.nrows(),
        observations.toa.ncols(),
        observations.missing_count(),
        observations.multipath_count()
    );

    Ok(SimulationDataset {
        track,
        schedule,
        telemetry,
        observations,
    })
}
