//! Core data types exchanged between pipeline stages

use serde::{Deserialize, Serialize};

/// One sample of the dense ground-truth track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    /// Time since track start (seconds)
    pub time: f64,
    pub x: f64,
    pub y: f64,
    /// Local speed of sound (m/s)
    pub sound_speed: f64,
}

/// True transmitter state at one ping, interpolated from the track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryPing {
    /// Time of ping (seconds since track start)
    pub top: f64,
    pub x: f64,
    pub y: f64,
    /// Local speed of sound at emission (m/s)
    pub sound_speed: f64,
}

impl TelemetryPing {
    /// True if the ping fell outside the track's time range and carries
    /// missing-value markers instead of an interpolated state.
    pub fn is_missing(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.sound_speed.is_nan()
    }
}

/// Fixed receiver position. Only x/y enter the travel-time computation;
/// z is carried through as deployment metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receiver {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Receiver {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}
