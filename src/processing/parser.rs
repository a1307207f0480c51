use crate::core::{now_seconds, Fix};
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while parsing location source output
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Invalid location output: {details}")]
    InvalidFormat { details: String },
    #[error("Field '{field}' is not a number: {value}")]
    InvalidField { field: String, value: String },
    #[error("Empty location output")]
    Empty,
}

/// Raw JSON object printed by `termux-location`
#[derive(Debug, Clone, Default, Deserialize)]
struct LocationOutput {
    latitude: Option<serde_json::Value>,
    longitude: Option<serde_json::Value>,
    altitude: Option<serde_json::Value>,
}

/// Parse the JSON document printed by a location command.
///
/// Returns `Ok(None)` when the document is well formed but carries no usable
/// latitude/longitude pair (e.g. `null` values while the receiver warms up).
/// The fix is stamped with `timestamp`, or the current time when `None`.
pub fn parse_location_output(output: &str, timestamp: Option<f64>) -> Result<Option<Fix>, ParseError> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    let raw: LocationOutput = serde_json::from_str(trimmed).map_err(|e| ParseError::InvalidFormat {
        details: e.to_string(),
    })?;

    let lat = number_field("latitude", raw.latitude.as_ref())?;
    let lon = number_field("longitude", raw.longitude.as_ref())?;
    let altitude = number_field("altitude", raw.altitude.as_ref())?;

    let (lat, lon) = match (lat, lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return Ok(None),
    };

    let mut fix = Fix::at(lat, lon, timestamp.unwrap_or_else(now_seconds));
    fix.altitude = altitude;
    Ok(Some(fix))
}

/// `null` and absent fields map to `None`; anything but a number is an error
fn number_field(field: &str, value: Option<&serde_json::Value>) -> Result<Option<f64>, ParseError> {
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(v) => v.as_f64().map(Some).ok_or_else(|| ParseError::InvalidField {
            field: field.to_string(),
            value: v.to_string(),
        }),
    }
}

/// One line of a recorded track, as consumed by `locator replay`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackRecord {
    /// Entity the fix belongs to; records without one share a default track
    #[serde(default)]
    pub id: Option<String>,
    pub lat: f64,
    #[serde(alias = "lng")]
    pub lon: f64,
    #[serde(default)]
    pub timestamp: Option<f64>,
}

impl TrackRecord {
    pub fn to_fix(&self) -> Fix {
        Fix::at(self.lat, self.lon, self.timestamp.unwrap_or_else(now_seconds))
    }
}

/// Parse one JSON-lines track record
pub fn parse_track_line(line: &str) -> Result<TrackRecord, ParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }
    serde_json::from_str(trimmed).map_err(|e| ParseError::InvalidFormat {
        details: e.to_string(),
    })
}
