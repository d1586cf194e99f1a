//! TOA-matrix corruption modeling
//!
//! Turns true ping states and a fixed receiver array into the observable
//! time-of-arrival matrix. The corruption chain is strictly ordered: ideal
//! propagation, measurement noise, clock quantization, integer-bin jitter,
//! dropout, multipath. Missing observations are NaN.

use nalgebra::{DMatrix, Vector2};
use rand::Rng;
use rand_distr::{Distribution, Normal, Poisson, Uniform};
use serde::{Deserialize, Serialize};

use crate::core::{
    Receiver, TelemetryPing, BIN_JITTER_MEAN, CLOCK_BINS_DEFAULT, CLOCK_BINS_STABLE,
    MULTIPATH_MAX_DETOUR, MULTIPATH_MIN_DETOUR,
};
use crate::simulation::scheduler::TransmitterProtocol;
use crate::validation::{ConfigError, ConfigResult};

/// Corruption parameters for one TOA simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorruptionParams {
    /// Standard deviation of the additive measurement noise (seconds).
    /// Zero selects an idealized error-free receiver clock: noise,
    /// quantization and bin jitter are all inactive unless an explicit
    /// `time_resolution` re-enables the quantization stages.
    pub sigma_toa: f64,
    /// Per-entry dropout probability
    pub p_na: f64,
    /// Per-entry multipath probability
    pub p_mp: f64,
    /// Receiver clock bins per second; resolved from the transmitter
    /// protocol when absent (19200 for the stable protocol, 1000 otherwise)
    #[serde(default)]
    pub time_resolution: Option<f64>,
}

impl Default for CorruptionParams {
    fn default() -> Self {
        Self {
            sigma_toa: 0.0,
            p_na: 0.0,
            p_mp: 0.0,
            time_resolution: None,
        }
    }
}

impl CorruptionParams {
    /// Check every parameter's domain.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.sigma_toa.is_finite() || self.sigma_toa < 0.0 {
            return Err(ConfigError::invalid("sigma_toa", self.sigma_toa, "must be non-negative"));
        }
        for (name, p) in [("p_na", self.p_na), ("p_mp", self.p_mp)] {
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::invalid(name, p, "must lie in [0, 1]"));
            }
        }
        if let Some(resolution) = self.time_resolution {
            if !resolution.is_finite() || resolution <= 0.0 {
                return Err(ConfigError::invalid("time_resolution", resolution, "must be positive"));
            }
        }
        Ok(())
    }
}

/// Observable output of one corruption run: the TOA matrix (rows = pings,
/// columns = receivers, NaN = missing) and the multipath mask of identical
/// shape (true exactly where a multipath offset was applied).
#[derive(Debug, Clone, PartialEq)]
pub struct ToaObservations {
    pub toa: DMatrix<f64>,
    pub multipath: DMatrix<bool>,
}

impl ToaObservations {
    /// Number of missing (dropped or uninterpolatable) observations
    pub fn missing_count(&self) -> usize {
        self.toa.iter().filter(|v| v.is_nan()).count()
    }

    /// Number of observations corrupted by a secondary propagation path
    pub fn multipath_count(&self) -> usize {
        self.multipath.iter().filter(|&&m| m).count()
    }
}

/// Receiver clock bins per second for a protocol, unless overridden.
pub fn resolve_time_resolution(protocol: TransmitterProtocol, supplied: Option<f64>) -> f64 {
    supplied.unwrap_or(match protocol {
        TransmitterProtocol::Stable => CLOCK_BINS_STABLE,
        TransmitterProtocol::Random | TransmitterProtocol::Periodic => CLOCK_BINS_DEFAULT,
    })
}

/// Apply the ordered corruption chain to the ideal propagation delays.
///
/// Entries stay causal (arrival >= emission) except where additive noise
/// violates that by its own small symmetric magnitude.
pub fn corrupt_toa(
    pings: &[TelemetryPing],
    receivers: &[Receiver],
    protocol: TransmitterProtocol,
    params: &CorruptionParams,
    rng: &mut impl Rng,
) -> ConfigResult<ToaObservations> {
    params.validate()?;

    let mut toa = ideal_toa(pings, receivers);

    // Clock modeling: measurement noise plus the quantizing receiver clock.
    // sigma_toa == 0 without an explicit resolution means an ideal clock.
    if params.sigma_toa > 0.0 {
        add_measurement_noise(&mut toa, params.sigma_toa, rng)?;
    }
    if params.sigma_toa > 0.0 || params.time_resolution.is_some() {
        let resolution = resolve_time_resolution(protocol, params.time_resolution);
        quantize_clock(&mut toa, resolution);
        add_bin_jitter(&mut toa, resolution, rng)?;
    }

    apply_dropout(&mut toa, params.p_na, rng);
    let multipath = apply_multipath(&mut toa, pings, params.p_mp, rng);

    Ok(ToaObservations { toa, multipath })
}

/// Ideal arrival times: emission time plus planar distance over the local
/// sound speed. NaN ping states (uninterpolatable pings) propagate.
fn ideal_toa(pings: &[TelemetryPing], receivers: &[Receiver]) -> DMatrix<f64> {
    DMatrix::from_fn(pings.len(), receivers.len(), |i, j| {
        let ping = &pings[i];
        let receiver = &receivers[j];
        let distance = Vector2::new(ping.x - receiver.x, ping.y - receiver.y).norm();
        ping.top + distance / ping.sound_speed
    })
}

fn add_measurement_noise(
    toa: &mut DMatrix<f64>,
    sigma_toa: f64,
    rng: &mut impl Rng,
) -> ConfigResult<()> {
    let noise = Normal::new(0.0, sigma_toa)
        .map_err(|_| ConfigError::invalid("sigma_toa", sigma_toa, "noise distribution rejected"))?;
    for entry in toa.iter_mut() {
        *entry += noise.sample(rng);
    }
    Ok(())
}

/// Snap the fractional part of each arrival to the nearest of `resolution`
/// equally spaced bins within its containing second; the integer-second part
/// is preserved.
fn quantize_clock(toa: &mut DMatrix<f64>, resolution: f64) {
    for entry in toa.iter_mut() {
        let seconds = entry.floor();
        let fraction = *entry - seconds;
        *entry = seconds + (fraction * resolution).round() / resolution;
    }
}

/// Occasional off-by-a-few-bins clock readings: each entry gains a random
/// integer number of quantization steps, Poisson-distributed in magnitude
/// with equiprobable sign.
fn add_bin_jitter(
    toa: &mut DMatrix<f64>,
    resolution: f64,
    rng: &mut impl Rng,
) -> ConfigResult<()> {
    let steps = Poisson::new(BIN_JITTER_MEAN).map_err(|_| {
        ConfigError::invalid("bin jitter mean", BIN_JITTER_MEAN, "jitter distribution rejected")
    })?;
    for entry in toa.iter_mut() {
        let count: f64 = steps.sample(rng);
        let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        *entry += sign * count / resolution;
    }
    Ok(())
}

/// Independent per-entry dropout: multiply by a Bernoulli(1 - p_na) mask and
/// map exact-zero results to NaN. A genuine zero-valued arrival would also be
/// mapped to missing; accepted approximation, astronomically unlikely with
/// real geometries.
fn apply_dropout(toa: &mut DMatrix<f64>, p_na: f64, rng: &mut impl Rng) {
    for entry in toa.iter_mut() {
        let keep = if rng.gen_bool(1.0 - p_na) { 1.0 } else { 0.0 };
        *entry *= keep;
        if *entry == 0.0 {
            *entry = f64::NAN;
        }
    }
}

/// Independent per-entry multipath: with probability p_mp an observation
/// gains the travel time of an extra 50-300 distance-unit detour at that
/// ping's sound speed. Missing entries cannot carry an offset and keep a
/// false mask bit.
fn apply_multipath(
    toa: &mut DMatrix<f64>,
    pings: &[TelemetryPing],
    p_mp: f64,
    rng: &mut impl Rng,
) -> DMatrix<bool> {
    let detour = Uniform::new(MULTIPATH_MIN_DETOUR, MULTIPATH_MAX_DETOUR);
    let mut mask = DMatrix::from_element(toa.nrows(), toa.ncols(), false);
    for j in 0..toa.ncols() {
        for i in 0..toa.nrows() {
            if toa[(i, j)].is_nan() {
                continue;
            }
            if rng.gen_bool(p_mp) {
                toa[(i, j)] += detour.sample(rng) / pings[i].sound_speed;
                mask[(i, j)] = true;
            }
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_pings(count: usize) -> Vec<TelemetryPing> {
        (0..count)
            .map(|i| TelemetryPing {
                top: i as f64 * 2.0,
                x: i as f64 * 0.5,
                y: 1.0,
                sound_speed: 1450.0,
            })
            .collect()
    }

    fn sample_receivers(count: usize) -> Vec<Receiver> {
        (0..count)
            .map(|j| Receiver::new(100.0 + j as f64 * 10.0, -50.0, 5.0))
            .collect()
    }

    fn clean_params() -> CorruptionParams {
        CorruptionParams::default()
    }

    #[test]
    fn test_causality_exact_without_corruption() {
        let pings = sample_pings(20);
        let receivers = sample_receivers(4);
        let mut rng = StdRng::seed_from_u64(20);
        let obs = corrupt_toa(
            &pings,
            &receivers,
            TransmitterProtocol::Random,
            &clean_params(),
            &mut rng,
        )
        .unwrap();

        assert_eq!(obs.toa.nrows(), 20);
        assert_eq!(obs.toa.ncols(), 4);
        assert_eq!(obs.missing_count(), 0);
        assert_eq!(obs.multipath_count(), 0);

        for (i, ping) in pings.iter().enumerate() {
            for (j, receiver) in receivers.iter().enumerate() {
                let dx = ping.x - receiver.x;
                let dy = ping.y - receiver.y;
                let expected = ping.top + (dx * dx + dy * dy).sqrt() / ping.sound_speed;
                assert!((obs.toa[(i, j)] - expected).abs() < 1e-12);
                assert!(obs.toa[(i, j)] >= ping.top);
            }
        }
    }

    #[test]
    fn test_quantization_grid_with_explicit_resolution() {
        let pings = sample_pings(50);
        let receivers = sample_receivers(3);
        let params = CorruptionParams {
            time_resolution: Some(10.0),
            ..clean_params()
        };
        let mut rng = StdRng::seed_from_u64(21);
        let obs = corrupt_toa(
            &pings,
            &receivers,
            TransmitterProtocol::Random,
            &params,
            &mut rng,
        )
        .unwrap();

        // Quantization and bin jitter both move entries in whole bins, so
        // every observation stays on the 1/10 s grid.
        for &value in obs.toa.iter() {
            let bins = value * 10.0;
            assert!((bins - bins.round()).abs() < 1e-9, "{} off-grid", value);
        }
    }

    #[test]
    fn test_protocol_time_resolution_defaults() {
        assert_eq!(resolve_time_resolution(TransmitterProtocol::Stable, None), 19200.0);
        assert_eq!(resolve_time_resolution(TransmitterProtocol::Random, None), 1000.0);
        assert_eq!(resolve_time_resolution(TransmitterProtocol::Periodic, None), 1000.0);
        assert_eq!(resolve_time_resolution(TransmitterProtocol::Stable, Some(48.0)), 48.0);
    }

    #[test]
    fn test_dropout_rate() {
        let pings = sample_pings(100);
        let receivers = sample_receivers(100);
        let params = CorruptionParams {
            p_na: 0.3,
            ..clean_params()
        };
        let mut rng = StdRng::seed_from_u64(22);
        let obs = corrupt_toa(
            &pings,
            &receivers,
            TransmitterProtocol::Random,
            &params,
            &mut rng,
        )
        .unwrap();

        let fraction = obs.missing_count() as f64 / 10_000.0;
        assert!((0.27..=0.33).contains(&fraction), "missing fraction {}", fraction);
    }

    #[test]
    fn test_no_dropout_when_p_na_zero() {
        let pings = sample_pings(40);
        let receivers = sample_receivers(5);
        let mut rng = StdRng::seed_from_u64(23);
        let obs = corrupt_toa(
            &pings,
            &receivers,
            TransmitterProtocol::Periodic,
            &clean_params(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(obs.missing_count(), 0);
    }

    #[test]
    fn test_full_dropout_when_p_na_one() {
        let pings = sample_pings(10);
        let receivers = sample_receivers(3);
        let params = CorruptionParams {
            p_na: 1.0,
            ..clean_params()
        };
        let mut rng = StdRng::seed_from_u64(24);
        let obs = corrupt_toa(
            &pings,
            &receivers,
            TransmitterProtocol::Random,
            &params,
            &mut rng,
        )
        .unwrap();
        assert_eq!(obs.missing_count(), 30);
        assert_eq!(obs.multipath_count(), 0);
    }

    #[test]
    fn test_multipath_mask_consistency() {
        let pings = sample_pings(50);
        let receivers = sample_receivers(8);
        let params = CorruptionParams {
            p_mp: 0.4,
            ..clean_params()
        };
        let mut rng = StdRng::seed_from_u64(25);
        let obs = corrupt_toa(
            &pings,
            &receivers,
            TransmitterProtocol::Random,
            &params,
            &mut rng,
        )
        .unwrap();

        let baseline = ideal_toa(&pings, &receivers);
        let min_offset = MULTIPATH_MIN_DETOUR / 1450.0;
        let max_offset = MULTIPATH_MAX_DETOUR / 1450.0;
        let mut flagged = 0;
        for j in 0..obs.toa.ncols() {
            for i in 0..obs.toa.nrows() {
                let offset = obs.toa[(i, j)] - baseline[(i, j)];
                if obs.multipath[(i, j)] {
                    flagged += 1;
                    assert!(
                        offset >= min_offset - 1e-12 && offset <= max_offset + 1e-12,
                        "flagged offset {} outside detour bounds",
                        offset
                    );
                } else {
                    assert!(offset.abs() < 1e-12, "unflagged entry moved by {}", offset);
                }
            }
        }
        // 400 entries at p_mp = 0.4; loose binomial bounds.
        assert!((120..=200).contains(&flagged), "{} flagged", flagged);
    }

    #[test]
    fn test_missing_ping_state_propagates() {
        let mut pings = sample_pings(3);
        pings[1].x = f64::NAN;
        pings[1].y = f64::NAN;
        pings[1].sound_speed = f64::NAN;
        let receivers = sample_receivers(2);
        let params = CorruptionParams {
            p_mp: 1.0,
            ..clean_params()
        };
        let mut rng = StdRng::seed_from_u64(26);
        let obs = corrupt_toa(
            &pings,
            &receivers,
            TransmitterProtocol::Random,
            &params,
            &mut rng,
        )
        .unwrap();

        for j in 0..2 {
            assert!(obs.toa[(1, j)].is_nan());
            assert!(!obs.multipath[(1, j)], "mask set on missing entry");
            assert!(obs.multipath[(0, j)] && obs.multipath[(2, j)]);
        }
    }

    #[test]
    fn test_parameter_domains() {
        let pings = sample_pings(2);
        let receivers = sample_receivers(2);
        let mut rng = StdRng::seed_from_u64(27);

        for params in [
            CorruptionParams { sigma_toa: -0.1, ..clean_params() },
            CorruptionParams { p_na: 1.5, ..clean_params() },
            CorruptionParams { p_mp: -0.2, ..clean_params() },
            CorruptionParams { time_resolution: Some(0.0), ..clean_params() },
        ] {
            assert!(matches!(
                corrupt_toa(&pings, &receivers, TransmitterProtocol::Random, &params, &mut rng),
                Err(ConfigError::InvalidParameter { .. })
            ));
        }
    }
}
