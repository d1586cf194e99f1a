//! Track-to-ping interpolation
//!
//! Maps ping times onto the dense true track by piecewise-linear
//! interpolation of x, y and sound speed against the track's own time
//! samples. Pure; no randomness.

use crate::core::{TelemetryPing, TrackPoint};

/// Interpolate the true transmitter state at each ping time.
///
/// The result is aligned with `ping_times`. Ping times outside the track's
/// time range yield NaN-marked pings (interpolation is not extrapolation);
/// this is silent missing data, not an error.
pub fn interpolate_track(track: &[TrackPoint], ping_times: &[f64]) -> Vec<TelemetryPing> {
    ping_times
        .iter()
        .map(|&top| interpolate_at(track, top))
        .collect()
}

fn interpolate_at(track: &[TrackPoint], top: f64) -> TelemetryPing {
    let missing = TelemetryPing {
        top,
        x: f64::NAN,
        y: f64::NAN,
        sound_speed: f64::NAN,
    };

    let last = match track.last() {
        Some(last) => last,
        None => return missing,
    };

    // Index of the first sample strictly after top.
    let idx = track.partition_point(|point| point.time <= top);
    if idx == 0 {
        return missing; // before the first sample
    }
    if idx == track.len() {
        if top == last.time {
            return TelemetryPing {
                top,
                x: last.x,
                y: last.y,
                sound_speed: last.sound_speed,
            };
        }
        return missing; // past the last sample
    }

    let lo = &track[idx - 1];
    let hi = &track[idx];
    let fraction = (top - lo.time) / (hi.time - lo.time);
    TelemetryPing {
        top,
        x: lerp(lo.x, hi.x, fraction),
        y: lerp(lo.y, hi.y, fraction),
        sound_speed: lerp(lo.sound_speed, hi.sound_speed, fraction),
    }
}

fn lerp(a: f64, b: f64, fraction: f64) -> f64 {
    a + (b - a) * fraction
}
