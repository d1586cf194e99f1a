//! Movement-model simulation producing the dense ground-truth track
//!
//! Supports two stochastic motion models: an independent-steps random walk
//! parameterized by diffusivity, and a correlated random walk with
//! Weibull-distributed step lengths and strongly persistent heading. The
//! track carries a per-sample sound-speed trace used later for travel-time
//! computation.

use rand::Rng;
use rand_distr::{Cauchy, Distribution, Normal, Weibull};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::core::{
    TrackPoint, BASELINE_SOUND_SPEED, DEFAULT_START_WINDOW, DIEL_REST_DIVISOR, DIEL_SEGMENTS,
    SOUND_SPEED_DRIFT_SD, TURNING_ANGLE_CONCENTRATION,
};
use crate::validation::{require, ConfigError, ConfigResult};

/// Stochastic motion model for the true track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovementModel {
    /// Per-axis Gaussian increments scaled by diffusivity
    IndependentWalk,
    /// Weibull step lengths with persistent heading
    CorrelatedWalk,
}

/// Model for the local sound-speed trace along the track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SoundSpeedModel {
    /// Unbounded random walk around the baseline
    RandomWalk,
    /// Constant baseline value
    Constant,
}

/// Configuration of one track simulation.
///
/// Model parameters are optional at this level; `simulate_track` resolves
/// the ones the selected model requires and fails eagerly when they are
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackConfig {
    pub model: MovementModel,
    /// Number of track samples (>= 2)
    pub n_points: usize,
    /// Spacing of the regular time axis (seconds, > 0)
    pub delta_time: f64,
    /// Diffusivity of the independent-steps walk
    #[serde(default)]
    pub diffusivity: Option<f64>,
    /// Weibull shape of the correlated walk's step lengths
    #[serde(default)]
    pub step_shape: Option<f64>,
    /// Weibull scale of the correlated walk's step lengths
    #[serde(default)]
    pub step_scale: Option<f64>,
    /// Scale step lengths down during low-activity diel segments
    /// (correlated walk only)
    #[serde(default)]
    pub diel_pattern: bool,
    pub sound_speed_model: SoundSpeedModel,
    /// Caller-supplied start position; drawn from a small square near the
    /// origin when absent (a documented plot-origin default)
    #[serde(default)]
    pub start_position: Option<(f64, f64)>,
}

impl TrackConfig {
    /// Check structural parameters and the presence and domain of every
    /// parameter the selected model requires.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.n_points < 2 {
            return Err(ConfigError::invalid(
                "n_points",
                self.n_points as f64,
                "track needs at least 2 samples",
            ));
        }
        if !self.delta_time.is_finite() || self.delta_time <= 0.0 {
            return Err(ConfigError::invalid(
                "delta_time",
                self.delta_time,
                "time step must be positive",
            ));
        }
        match self.model {
            MovementModel::IndependentWalk => {
                let d = require(self.diffusivity, "diffusivity", "independent-walk movement model")?;
                if !d.is_finite() || d <= 0.0 {
                    return Err(ConfigError::invalid("diffusivity", d, "must be positive"));
                }
            }
            MovementModel::CorrelatedWalk => {
                let shape = require(self.step_shape, "step_shape", "correlated-walk movement model")?;
                let scale = require(self.step_scale, "step_scale", "correlated-walk movement model")?;
                if !shape.is_finite() || shape <= 0.0 {
                    return Err(ConfigError::invalid("step_shape", shape, "must be positive"));
                }
                if !scale.is_finite() || scale <= 0.0 {
                    return Err(ConfigError::invalid("step_scale", scale, "must be positive"));
                }
            }
        }
        Ok(())
    }
}

/// Simulate a dense, regularly spaced true track.
///
/// The time axis has `n_points` samples `0, Δt, 2Δt, …`; positions follow the
/// configured movement model and the sound-speed trace the configured
/// sound-speed model. All randomness comes from `rng`.
pub fn simulate_track(config: &TrackConfig, rng: &mut impl Rng) -> ConfigResult<Vec<TrackPoint>> {
    config.validate()?;

    let start = match config.start_position {
        Some(start) => start,
        None => (
            rng.gen_range(0.0..DEFAULT_START_WINDOW),
            rng.gen_range(0.0..DEFAULT_START_WINDOW),
        ),
    };

    let positions = match config.model {
        MovementModel::IndependentWalk => {
            let d = require(config.diffusivity, "diffusivity", "independent-walk movement model")?;
            independent_walk(config.n_points, d, config.delta_time, start, rng)?
        }
        MovementModel::CorrelatedWalk => {
            let shape = require(config.step_shape, "step_shape", "correlated-walk movement model")?;
            let scale = require(config.step_scale, "step_scale", "correlated-walk movement model")?;
            correlated_walk(config.n_points, shape, scale, config.diel_pattern, start, rng)?
        }
    };

    let sound_speeds = sound_speed_trace(config.sound_speed_model, config.n_points, rng)?;

    Ok(positions
        .into_iter()
        .zip(sound_speeds)
        .enumerate()
        .map(|(i, ((x, y), sound_speed))| TrackPoint {
            time: i as f64 * config.delta_time,
            x,
            y,
            sound_speed,
        })
        .collect())
}

/// Independent-steps random walk: each axis accumulates
/// Normal(0, sqrt(2·D·Δt)) increments from the start position.
fn independent_walk(
    n_points: usize,
    diffusivity: f64,
    delta_time: f64,
    start: (f64, f64),
    rng: &mut impl Rng,
) -> ConfigResult<Vec<(f64, f64)>> {
    let step_sd = (2.0 * diffusivity * delta_time).sqrt();
    let step = Normal::new(0.0, step_sd)
        .map_err(|_| ConfigError::invalid("diffusivity", diffusivity, "step distribution rejected"))?;

    let (mut x, mut y) = start;
    let mut positions = Vec::with_capacity(n_points);
    positions.push((x, y));
    for _ in 1..n_points {
        x += step.sample(rng);
        y += step.sample(rng);
        positions.push((x, y));
    }
    Ok(positions)
}

/// Correlated random walk: Weibull step lengths, wrapped-Cauchy turning
/// angles accumulated into an absolute heading.
fn correlated_walk(
    n_points: usize,
    shape: f64,
    scale: f64,
    diel_pattern: bool,
    start: (f64, f64),
    rng: &mut impl Rng,
) -> ConfigResult<Vec<(f64, f64)>> {
    let step_dist = Weibull::new(scale, shape)
        .map_err(|_| ConfigError::invalid("step_scale", scale, "step distribution rejected"))?;
    // Cauchy scale -ln(rho): wrapping the draws yields a wrapped-Cauchy
    // density with concentration rho around 0.
    let turn_scale = -TURNING_ANGLE_CONCENTRATION.ln();
    let turn_dist = Cauchy::new(0.0, turn_scale).map_err(|_| {
        ConfigError::invalid("turning angle scale", turn_scale, "turn distribution rejected")
    })?;

    let mut lengths: Vec<f64> = (0..n_points - 1).map(|_| step_dist.sample(rng)).collect();
    if diel_pattern {
        apply_diel_pattern(&mut lengths, n_points);
    }

    let (mut x, mut y) = start;
    let mut heading = 0.0_f64;
    let mut positions = Vec::with_capacity(n_points);
    positions.push((x, y));
    for length in lengths {
        heading += wrap_angle(turn_dist.sample(rng));
        x += length * heading.cos();
        y += length * heading.sin();
        positions.push((x, y));
    }
    Ok(positions)
}

/// Diel activity mask: the step-length sequence is divided into 8 equal
/// segments of floor(n/8); segments 1, 4, 6 and 8 (1-based) are rest periods
/// with step lengths divided by 50. Deterministic, applied before the
/// positions are integrated.
fn apply_diel_pattern(lengths: &mut [f64], n_points: usize) {
    let segment_len = n_points / DIEL_SEGMENTS;
    if segment_len == 0 {
        return;
    }
    const REST: [bool; DIEL_SEGMENTS] = [true, false, false, true, false, true, false, true];
    for (i, length) in lengths.iter_mut().enumerate() {
        let segment = (i / segment_len).min(DIEL_SEGMENTS - 1);
        if REST[segment] {
            *length /= DIEL_REST_DIVISOR;
        }
    }
}

/// Wrap an angle into (-pi, pi]
fn wrap_angle(angle: f64) -> f64 {
    -((-angle + PI).rem_euclid(2.0 * PI) - PI)
}

/// Sound-speed trace: constant baseline, or an unbounded random walk around
/// it with small Gaussian per-step increments.
fn sound_speed_trace(
    model: SoundSpeedModel,
    n_points: usize,
    rng: &mut impl Rng,
) -> ConfigResult<Vec<f64>> {
    match model {
        SoundSpeedModel::Constant => Ok(vec![BASELINE_SOUND_SPEED; n_points]),
        SoundSpeedModel::RandomWalk => {
            let drift = Normal::new(0.0, SOUND_SPEED_DRIFT_SD).map_err(|_| {
                ConfigError::invalid(
                    "sound speed drift",
                    SOUND_SPEED_DRIFT_SD,
                    "drift distribution rejected",
                )
            })?;
            let mut sound_speed = BASELINE_SOUND_SPEED;
            let mut trace = Vec::with_capacity(n_points);
            trace.push(sound_speed);
            for _ in 1..n_points {
                sound_speed += drift.sample(rng);
                trace.push(sound_speed);
            }
            Ok(trace)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn independent_config(n_points: usize, delta_time: f64) -> TrackConfig {
        TrackConfig {
            model: MovementModel::IndependentWalk,
            n_points,
            delta_time,
            diffusivity: Some(1.0),
            step_shape: None,
            step_scale: None,
            diel_pattern: false,
            sound_speed_model: SoundSpeedModel::Constant,
            start_position: Some((0.0, 0.0)),
        }
    }

    #[test]
    fn test_track_length_and_time_axis() {
        let mut rng = StdRng::seed_from_u64(1);
        let track = simulate_track(&independent_config(5, 0.5), &mut rng).unwrap();
        assert_eq!(track.len(), 5);
        assert_eq!(track[0].time, 0.0);
        for (i, point) in track.iter().enumerate() {
            assert!((point.time - i as f64 * 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_missing_diffusivity_is_config_error() {
        let mut config = independent_config(10, 1.0);
        config.diffusivity = None;
        let mut rng = StdRng::seed_from_u64(2);
        let err = simulate_track(&config, &mut rng).unwrap_err();
        assert!(matches!(err, ConfigError::MissingParameter { .. }));
    }

    #[test]
    fn test_missing_weibull_parameters_are_config_errors() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut config = independent_config(10, 1.0);
        config.model = MovementModel::CorrelatedWalk;
        config.diffusivity = None;
        let err = simulate_track(&config, &mut rng).unwrap_err();
        assert!(matches!(err, ConfigError::MissingParameter { .. }));

        config.step_shape = Some(2.0);
        let err = simulate_track(&config, &mut rng).unwrap_err();
        assert!(matches!(err, ConfigError::MissingParameter { .. }));

        config.step_scale = Some(1.0);
        assert!(simulate_track(&config, &mut rng).is_ok());
    }

    #[test]
    fn test_structural_parameter_domains() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut config = independent_config(1, 1.0);
        assert!(matches!(
            simulate_track(&config, &mut rng),
            Err(ConfigError::InvalidParameter { .. })
        ));

        config = independent_config(10, 0.0);
        assert!(matches!(
            simulate_track(&config, &mut rng),
            Err(ConfigError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_independent_walk_displacement_variance() {
        // After k steps the per-axis displacement variance is 2*D*k*dt.
        let k = 20;
        let config = independent_config(k + 1, 1.0);
        let mut rng = StdRng::seed_from_u64(5);

        let runs = 3000;
        let mut displacements = Vec::with_capacity(runs);
        for _ in 0..runs {
            let track = simulate_track(&config, &mut rng).unwrap();
            displacements.push(track[k].x - track[0].x);
        }

        let mean = displacements.iter().sum::<f64>() / runs as f64;
        let variance = displacements.iter().map(|d| (d - mean).powi(2)).sum::<f64>()
            / (runs - 1) as f64;

        let expected = 2.0 * 1.0 * k as f64 * 1.0;
        assert!(
            (variance - expected).abs() < 0.15 * expected,
            "variance {} too far from {}",
            variance,
            expected
        );
    }

    #[test]
    fn test_diel_pattern_rest_segments() {
        // n = 800 gives a segment length of 100; segments 1, 4, 6, 8
        // (1-based) are rest periods.
        let n_points = 800;
        let mut lengths = vec![1.0; n_points - 1];
        apply_diel_pattern(&mut lengths, n_points);

        let rest = 1.0 / DIEL_REST_DIVISOR;
        for i in 0..100 {
            assert_eq!(lengths[i], rest);
        }
        for i in 100..300 {
            assert_eq!(lengths[i], 1.0);
        }
        for i in 300..400 {
            assert_eq!(lengths[i], rest);
        }
        for i in 400..500 {
            assert_eq!(lengths[i], 1.0);
        }
        for i in 500..600 {
            assert_eq!(lengths[i], rest);
        }
        for i in 600..700 {
            assert_eq!(lengths[i], 1.0);
        }
        // Trailing steps fall into the final rest segment.
        for i in 700..n_points - 1 {
            assert_eq!(lengths[i], rest);
        }
    }

    #[test]
    fn test_correlated_walk_starts_at_start_position() {
        let config = TrackConfig {
            model: MovementModel::CorrelatedWalk,
            n_points: 50,
            delta_time: 2.0,
            diffusivity: None,
            step_shape: Some(2.0),
            step_scale: Some(1.0),
            diel_pattern: true,
            sound_speed_model: SoundSpeedModel::Constant,
            start_position: Some((3.0, -4.0)),
        };
        let mut rng = StdRng::seed_from_u64(6);
        let track = simulate_track(&config, &mut rng).unwrap();
        assert_eq!(track.len(), 50);
        assert_eq!(track[0].x, 3.0);
        assert_eq!(track[0].y, -4.0);
    }

    #[test]
    fn test_default_start_position_window() {
        let mut config = independent_config(5, 1.0);
        config.start_position = None;
        let mut rng = StdRng::seed_from_u64(7);
        let track = simulate_track(&config, &mut rng).unwrap();
        assert!(track[0].x >= 0.0 && track[0].x < DEFAULT_START_WINDOW);
        assert!(track[0].y >= 0.0 && track[0].y < DEFAULT_START_WINDOW);
    }

    #[test]
    fn test_sound_speed_models() {
        let mut rng = StdRng::seed_from_u64(8);
        let constant = sound_speed_trace(SoundSpeedModel::Constant, 100, &mut rng).unwrap();
        assert!(constant.iter().all(|&ss| ss == BASELINE_SOUND_SPEED));

        let walk = sound_speed_trace(SoundSpeedModel::RandomWalk, 100, &mut rng).unwrap();
        assert_eq!(walk[0], BASELINE_SOUND_SPEED);
        // 99 increments of sd 0.07 stay well within +-10 of the baseline
        assert!(walk.iter().all(|&ss| (ss - BASELINE_SOUND_SPEED).abs() < 10.0));
    }

    #[test]
    fn test_wrap_angle_range() {
        for a in [-10.0, -PI, -0.5, 0.0, 0.5, PI, 10.0] {
            let w = wrap_angle(a);
            assert!(w > -PI && w <= PI, "{} wrapped to {}", a, w);
        }
        assert!((wrap_angle(0.3) - 0.3).abs() < 1e-12);
        assert!((wrap_angle(2.0 * PI + 0.3) - 0.3).abs() < 1e-12);
    }
}
