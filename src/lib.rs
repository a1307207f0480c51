//! Location Sharing Client
//!
//! Movement-derived heading estimation for devices that report their GPS
//! position to a shared map server, with the reporting loop and the flat JSON
//! stores around it.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod hardware;
pub mod api;
pub mod storage;

// Re-export commonly used types
pub use core::{Cardinal, Fix, HeadingResult, EARTH_RADIUS_M, HISTORY_CAPACITY, MIN_MOVEMENT_M};
pub use algorithms::heading::{EstimatorConfig, HeadingEstimator};
pub use processing::{HeadingTracker, SensorCache, SensorSnapshot};
pub use validation::{FixValidator, ValidationConfig, ValidationError};
pub use hardware::{LocationSource, MockLocationSource, SourceError, TermuxLocationSource};
pub use api::{
    ApiError, ApiResult, HttpTransport, LocationReporter, LocationUpdate, MockTransport,
    PayloadAssembler, ReportOutcome, ServerAck, Transport, TransportError,
};
pub use storage::{DrawingStore, FrameSlots, PhoneRecord, PhoneStore, Poi, PoiStore, StorageError};
pub use utils::{ConfigError, ReporterConfig};
