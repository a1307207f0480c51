//! Sensor processing: per-entity tracking, shared caches and source parsing

pub mod tracker;
pub mod cache;
pub mod parser;

pub use tracker::HeadingTracker;
pub use cache::{SensorCache, SensorSnapshot};
pub use parser::{parse_location_output, parse_track_line, ParseError, TrackRecord};
