use crate::algorithms::geodesy::haversine_distance;
use crate::core::{now_seconds, Fix};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for fix validation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Reject fixes older than this many seconds
    pub max_fix_age_s: Option<f64>,
    /// Reject fixes farther than this from the last accepted fix (meters)
    pub max_jump_m: Option<f64>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_fix_age_s: Some(60.0),
            max_jump_m: None,
        }
    }
}

/// Reasons a fix is kept away from the heading estimator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Non-finite {field}: {value}")]
    NonFinite { field: &'static str, value: f64 },
    #[error("Latitude out of range: {lat}")]
    LatitudeOutOfRange { lat: f64 },
    #[error("Longitude out of range: {lon}")]
    LongitudeOutOfRange { lon: f64 },
    #[error("Stale fix: {age_s:.1} s old, limit {limit_s:.1} s")]
    StaleFix { age_s: f64, limit_s: f64 },
    #[error("Position jump of {distance_m:.1} m exceeds {limit_m:.1} m")]
    PositionJump { distance_m: f64, limit_m: f64 },
}

/// Caller-side precondition check for fixes
#[derive(Debug, Clone, Default)]
pub struct FixValidator {
    config: ValidationConfig,
    last_accepted: Option<Fix>,
}

impl FixValidator {
    /// Create a new validator with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator with custom configuration
    pub fn with_config(config: ValidationConfig) -> Self {
        Self {
            config,
            last_accepted: None,
        }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Check coordinates only; stateless
    pub fn check_coordinates(fix: &Fix) -> Result<(), ValidationError> {
        for (field, value) in [("latitude", fix.lat), ("longitude", fix.lon), ("timestamp", fix.timestamp)] {
            if !value.is_finite() {
                return Err(ValidationError::NonFinite { field, value });
            }
        }
        if let Some(altitude) = fix.altitude {
            if !altitude.is_finite() {
                return Err(ValidationError::NonFinite {
                    field: "altitude",
                    value: altitude,
                });
            }
        }
        if !(-90.0..=90.0).contains(&fix.lat) {
            return Err(ValidationError::LatitudeOutOfRange { lat: fix.lat });
        }
        if !(-180.0..=180.0).contains(&fix.lon) {
            return Err(ValidationError::LongitudeOutOfRange { lon: fix.lon });
        }
        Ok(())
    }

    /// Validate a fix against the current time and remember it when accepted
    pub fn validate(&mut self, fix: &Fix) -> Result<(), ValidationError> {
        self.validate_at(fix, now_seconds())
    }

    /// Validate a fix against an explicit current time
    pub fn validate_at(&mut self, fix: &Fix, now: f64) -> Result<(), ValidationError> {
        Self::check_coordinates(fix)?;

        if let Some(limit_s) = self.config.max_fix_age_s {
            let age_s = now - fix.timestamp;
            if age_s > limit_s {
                return Err(ValidationError::StaleFix { age_s, limit_s });
            }
        }

        if let (Some(limit_m), Some(previous)) = (self.config.max_jump_m, self.last_accepted.as_ref()) {
            let distance_m = haversine_distance(previous, fix);
            if distance_m > limit_m {
                return Err(ValidationError::PositionJump { distance_m, limit_m });
            }
        }

        self.last_accepted = Some(*fix);
        Ok(())
    }

    /// Forget the last accepted fix, e.g. when the device reconnects
    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}
