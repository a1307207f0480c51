//! Reporting API
//!
//! Builds the outbound location update, delivers it to the map server and
//! drives the periodic reporting cycle.

pub mod types;
pub mod payload;
pub mod transport;
pub mod reporter;

// Re-export commonly used API types
pub use types::{ApiError, ApiResult, LocationUpdate, ReportOutcome, ServerAck};
pub use payload::PayloadAssembler;
pub use transport::{HttpTransport, MockTransport, Transport, TransportError, TransportResult};
pub use reporter::{LocationReporter, ReporterStats};
