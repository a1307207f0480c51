//! Physical constants and estimator defaults

/// Mean Earth radius used by the Haversine formula (meters)
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Number of fixes kept in a heading history window
pub const HISTORY_CAPACITY: usize = 5;

/// Minimum displacement between two fixes before a bearing is trusted (meters)
pub const MIN_MOVEMENT_M: f64 = 3.0;
