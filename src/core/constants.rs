//! Physical constants and system parameters

/// Baseline speed of sound in the medium (m/s)
pub const BASELINE_SOUND_SPEED: f64 = 1450.0;

/// Per-step standard deviation of the sound-speed random walk (m/s)
pub const SOUND_SPEED_DRIFT_SD: f64 = 0.07;

/// Length of the periodic protocol's burst-interval table
pub const BI_TABLE_LEN: usize = 256;

/// Receiver clock bins per second for the stable-interval protocol
pub const CLOCK_BINS_STABLE: f64 = 19200.0;

/// Receiver clock bins per second for all other protocols
pub const CLOCK_BINS_DEFAULT: f64 = 1000.0;

/// Expected number of quantization steps in an off-by-bin clock reading
pub const BIN_JITTER_MEAN: f64 = 1.0;

/// Wrapped-Cauchy concentration of turning angles (correlated walk)
pub const TURNING_ANGLE_CONCENTRATION: f64 = 0.99;

/// Number of equal diel segments a track is divided into
pub const DIEL_SEGMENTS: usize = 8;

/// Step-length divisor during low-activity diel segments
pub const DIEL_REST_DIVISOR: f64 = 50.0;

/// Bounds of the extra path length taken by a multipath arrival (distance units)
pub const MULTIPATH_MIN_DETOUR: f64 = 50.0;
pub const MULTIPATH_MAX_DETOUR: f64 = 300.0;

/// Side length of the square the default start position is drawn from
pub const DEFAULT_START_WINDOW: f64 = 5.0;
