//! Core data types for location tracking

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// One observed geographic position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
    /// Observation time in seconds since the Unix epoch
    pub timestamp: f64,
    /// Altitude above the ellipsoid in meters, when the source reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
}

impl Fix {
    /// Create a fix stamped with the current wall-clock time
    pub fn new(lat: f64, lon: f64) -> Self {
        Self::at(lat, lon, now_seconds())
    }

    /// Create a fix with an explicit timestamp
    pub fn at(lat: f64, lon: f64, timestamp: f64) -> Self {
        Self {
            lat,
            lon,
            timestamp,
            altitude: None,
        }
    }

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }
}

/// Current wall-clock time in fractional seconds since the Unix epoch
pub fn now_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// 8-point compass label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinal {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Cardinal {
    /// Labels in clockwise order starting at north
    pub const ALL: [Cardinal; 8] = [
        Cardinal::N,
        Cardinal::NE,
        Cardinal::E,
        Cardinal::SE,
        Cardinal::S,
        Cardinal::SW,
        Cardinal::W,
        Cardinal::NW,
    ];

    /// Nearest label for a bearing in degrees.
    ///
    /// Each label covers a 45° sector centered on its direction, so 22.4° is
    /// still `N` and 22.5° rounds up to `NE`.
    pub fn from_bearing(bearing_deg: f64) -> Self {
        let index = (bearing_deg / 45.0).round().rem_euclid(8.0) as usize;
        Self::ALL[index % 8]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Cardinal::N => "N",
            Cardinal::NE => "NE",
            Cardinal::E => "E",
            Cardinal::SE => "SE",
            Cardinal::S => "S",
            Cardinal::SW => "SW",
            Cardinal::W => "W",
            Cardinal::NW => "NW",
        }
    }
}

impl fmt::Display for Cardinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Travel direction derived from two fixes in a history window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadingResult {
    /// Initial great-circle bearing in degrees, [0, 360)
    pub bearing_deg: f64,
    /// Compass label for `bearing_deg`
    pub cardinal: Cardinal,
    /// Displacement between the two fixes that produced the bearing (meters)
    pub distance_m: f64,
}

impl HeadingResult {
    /// False when non-finite input leaked through into the bearing
    pub fn is_valid(&self) -> bool {
        self.bearing_deg.is_finite() && self.distance_m.is_finite()
    }
}
