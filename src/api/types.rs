//! Common API types and data structures

use crate::api::transport::TransportError;
use crate::hardware::SourceError;
use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced by the reporting loop
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The location source failed
    #[error("Location source error: {0}")]
    Source(#[from] SourceError),
    /// The update could not be delivered
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Outbound location update, the body of `POST /update_location`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    /// Device identifier
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    /// Travel bearing in degrees, present only when movement was detected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    /// Displacement the heading was measured over (meters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

/// Server reply to a location update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerAck {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// What a single reporting cycle did
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    /// The source had no position this cycle
    Skipped,
    /// The fix failed validation and was not used
    Rejected { error: ValidationError },
    /// The update was delivered
    Sent { update: LocationUpdate, ack: ServerAck },
}

impl ReportOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, ReportOutcome::Sent { .. })
    }
}
