//! Heading and positioning algorithms

pub mod geodesy;
pub mod heading;
pub mod compass;

pub use geodesy::{haversine_distance, initial_bearing, normalize_bearing};
pub use heading::{EstimatorConfig, HeadingEstimator};
pub use compass::{tilt_compensated_heading, Compass};
