//! Ping-scheduling simulation under transmitter timing protocols
//!
//! Real transmitters space their pings by a burst interval (BI) whose law is
//! device-specific. Each protocol is a small generative state machine behind
//! the `IntervalGenerator` trait; the shared loop starts at a small random
//! offset and keeps advancing until the next ping would fall past the track
//! duration.

use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};
use serde::{Deserialize, Serialize};

use crate::core::BI_TABLE_LEN;
use crate::validation::{require, ConfigError, ConfigResult};

/// Mean of the periodic table's per-use clock-drift term (seconds)
const TABLE_DRIFT_MEAN: f64 = 0.001;
/// Standard deviation of the periodic table's per-use clock-drift term
const TABLE_DRIFT_SD: f64 = 0.001;

/// Transmitter timing protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransmitterProtocol {
    /// Slowly drifting Gaussian random walk over the interval itself
    Stable,
    /// Independent uniform draws between fixed bounds
    Random,
    /// Fixed 256-entry interval table cycled with a small clock drift
    Periodic,
}

/// Transmitter configuration: protocol plus its interval parameters.
///
/// Parameters are optional here; `schedule_pings` resolves the ones the
/// selected protocol requires and fails eagerly when they are absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransmitterConfig {
    pub protocol: TransmitterProtocol,
    /// Mean inter-ping interval (stable protocol)
    #[serde(default)]
    pub interval_mean: Option<f64>,
    /// Per-ping drift of the interval random walk (stable protocol)
    #[serde(default)]
    pub interval_sd: Option<f64>,
    /// Lower interval bound (random and periodic protocols)
    #[serde(default)]
    pub interval_min: Option<f64>,
    /// Upper interval bound (random and periodic protocols)
    #[serde(default)]
    pub interval_max: Option<f64>,
}

impl TransmitterConfig {
    /// Check presence and domain of every parameter the selected protocol
    /// requires.
    pub fn validate(&self) -> ConfigResult<()> {
        match self.protocol {
            TransmitterProtocol::Stable => {
                let mean = require(self.interval_mean, "interval_mean", "stable transmitter protocol")?;
                let sd = require(self.interval_sd, "interval_sd", "stable transmitter protocol")?;
                if !mean.is_finite() || mean <= 0.0 {
                    return Err(ConfigError::invalid("interval_mean", mean, "must be positive"));
                }
                if !sd.is_finite() || sd < 0.0 {
                    return Err(ConfigError::invalid("interval_sd", sd, "must be non-negative"));
                }
            }
            TransmitterProtocol::Random | TransmitterProtocol::Periodic => {
                let context = match self.protocol {
                    TransmitterProtocol::Random => "random transmitter protocol",
                    _ => "periodic transmitter protocol",
                };
                let min = require(self.interval_min, "interval_min", context)?;
                let max = require(self.interval_max, "interval_max", context)?;
                if !min.is_finite() || min <= 0.0 {
                    return Err(ConfigError::invalid("interval_min", min, "must be positive"));
                }
                if !max.is_finite() || max < min {
                    return Err(ConfigError::invalid(
                        "interval_max",
                        max,
                        "must be at least interval_min",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Result of one scheduling run: ping times, plus the burst-interval table
/// and per-ping table assignment for the periodic protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingSchedule {
    /// Strictly increasing times of ping, all within `[0, duration)`
    pub ping_times: Vec<f64>,
    /// The 256-entry interval table (periodic protocol only)
    pub interval_table: Option<Vec<f64>>,
    /// Table value consumed when scheduling each ping's successor, aligned
    /// with `ping_times` via explicit cyclic indexing (periodic protocol only)
    pub interval_assignment: Option<Vec<f64>>,
}

impl PingSchedule {
    fn plain(ping_times: Vec<f64>) -> Self {
        Self {
            ping_times,
            interval_table: None,
            interval_assignment: None,
        }
    }
}

/// One transmitter protocol's interval state machine.
///
/// Termination relies on the configured interval law staying positive on
/// average; that is an input-validity assumption of the protocols, not an
/// internal guard.
trait IntervalGenerator {
    /// Advance the state machine and return the next burst interval (seconds)
    fn next_interval<R: Rng>(&mut self, rng: &mut R) -> f64;

    /// Upper bound of the random start offset, one typical interval
    fn start_offset_bound(&self) -> f64;
}

/// Stable protocol: the interval itself performs a Gaussian random walk,
/// seeded at the configured mean. Models burst-interval jitter drift.
struct DriftingGaussian {
    current: f64,
    drift: Normal<f64>,
}

impl DriftingGaussian {
    fn new(mean: f64, sd: f64) -> ConfigResult<Self> {
        let drift = Normal::new(0.0, sd)
            .map_err(|_| ConfigError::invalid("interval_sd", sd, "drift distribution rejected"))?;
        Ok(Self { current: mean, drift })
    }
}

impl IntervalGenerator for DriftingGaussian {
    fn next_interval<R: Rng>(&mut self, rng: &mut R) -> f64 {
        self.current += self.drift.sample(rng);
        self.current
    }

    fn start_offset_bound(&self) -> f64 {
        self.current
    }
}

/// Random protocol: independent uniform draws between the bounds.
struct UniformRange {
    interval: Uniform<f64>,
    min: f64,
}

impl UniformRange {
    fn new(min: f64, max: f64) -> Self {
        Self {
            interval: Uniform::new_inclusive(min, max),
            min,
        }
    }
}

impl IntervalGenerator for UniformRange {
    fn next_interval<R: Rng>(&mut self, rng: &mut R) -> f64 {
        self.interval.sample(rng)
    }

    fn start_offset_bound(&self) -> f64 {
        self.min
    }
}

/// Periodic protocol: a fixed table cycled with wraparound, each use adding
/// an independent clock-drift term. The cursor wraps with explicit modular
/// indexing.
struct CyclicTable {
    table: Vec<f64>,
    cursor: usize,
    drift: Normal<f64>,
}

impl CyclicTable {
    fn new(table: Vec<f64>) -> ConfigResult<Self> {
        let drift = Normal::new(TABLE_DRIFT_MEAN, TABLE_DRIFT_SD).map_err(|_| {
            ConfigError::invalid("table drift", TABLE_DRIFT_SD, "drift distribution rejected")
        })?;
        Ok(Self { table, cursor: 0, drift })
    }
}

impl IntervalGenerator for CyclicTable {
    fn next_interval<R: Rng>(&mut self, rng: &mut R) -> f64 {
        let base = self.table[self.cursor % BI_TABLE_LEN];
        self.cursor += 1;
        base + round_to_decimals(self.drift.sample(rng), 5)
    }

    fn start_offset_bound(&self) -> f64 {
        self.table.first().copied().unwrap_or(0.0)
    }
}

/// Simulate the sequence of ping times for one track duration.
///
/// All three protocols share the same loop: start at a small random offset,
/// advance by one generated interval at a time, and stop before the first
/// ping that would fall past `duration` (the overshoot artifact of the
/// advance loop is never emitted).
pub fn schedule_pings(
    duration: f64,
    config: &TransmitterConfig,
    rng: &mut impl Rng,
) -> ConfigResult<PingSchedule> {
    config.validate()?;

    match config.protocol {
        TransmitterProtocol::Stable => {
            let mean = require(config.interval_mean, "interval_mean", "stable transmitter protocol")?;
            let sd = require(config.interval_sd, "interval_sd", "stable transmitter protocol")?;
            let generator = DriftingGaussian::new(mean, sd)?;
            Ok(PingSchedule::plain(collect_ping_times(generator, duration, rng)))
        }
        TransmitterProtocol::Random => {
            let min = require(config.interval_min, "interval_min", "random transmitter protocol")?;
            let max = require(config.interval_max, "interval_max", "random transmitter protocol")?;
            let generator = UniformRange::new(min, max);
            Ok(PingSchedule::plain(collect_ping_times(generator, duration, rng)))
        }
        TransmitterProtocol::Periodic => {
            let min = require(config.interval_min, "interval_min", "periodic transmitter protocol")?;
            let max = require(config.interval_max, "interval_max", "periodic transmitter protocol")?;
            let table = build_interval_table(min, max, rng);
            let generator = CyclicTable::new(table.clone())?;
            let ping_times = collect_ping_times(generator, duration, rng);
            // The k-th advance wraps the table with period 256; recording the
            // base value, not the drifted interval, keeps the assignment an
            // exact cyclic replay of the table.
            let assignment: Vec<f64> = (0..ping_times.len())
                .map(|k| table[k % BI_TABLE_LEN])
                .collect();
            Ok(PingSchedule {
                ping_times,
                interval_table: Some(table),
                interval_assignment: Some(assignment),
            })
        }
    }
}

/// Fixed table of 256 uniform intervals, rounded to 1 decimal like the
/// transmitter's programmed schedule.
fn build_interval_table(min: f64, max: f64, rng: &mut impl Rng) -> Vec<f64> {
    let interval = Uniform::new_inclusive(min, max);
    (0..BI_TABLE_LEN)
        .map(|_| round_to_decimals(interval.sample(rng), 1))
        .collect()
}

/// Shared scheduling loop over one interval generator.
fn collect_ping_times(
    mut generator: impl IntervalGenerator,
    duration: f64,
    rng: &mut impl Rng,
) -> Vec<f64> {
    let bound = generator.start_offset_bound();
    let mut time = if bound > 0.0 {
        rng.gen_range(0.0..bound)
    } else {
        0.0
    };

    let mut ping_times = Vec::new();
    while time < duration {
        ping_times.push(time);
        time += generator.next_interval(rng);
    }
    ping_times
}

fn round_to_decimals(value: f64, decimals: u32) -> f64 {
    let scale = 10_f64.powi(decimals as i32);
    (value * scale).round() / scale
}
