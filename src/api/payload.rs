//! Outbound payload assembly

use crate::api::types::LocationUpdate;
use crate::core::{Fix, HeadingResult};

/// Builds location updates for one device
#[derive(Debug, Clone)]
pub struct PayloadAssembler {
    device_id: String,
}

impl PayloadAssembler {
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Build the update for a fix.
    ///
    /// `heading` and `accuracy` are filled only when a heading is supplied;
    /// without one the message carries position alone.
    pub fn assemble(&self, fix: &Fix, heading: Option<&HeadingResult>) -> LocationUpdate {
        LocationUpdate {
            id: self.device_id.clone(),
            lat: fix.lat,
            lng: fix.lon,
            heading: heading.map(|h| h.bearing_deg),
            accuracy: heading.map(|h| h.distance_m),
        }
    }
}
