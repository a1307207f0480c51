use crate::algorithms::heading::EstimatorConfig;
use crate::api::transport::endpoint_url;
use crate::validation::data::ValidationConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Reporter configuration, stored as a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    /// Identifier this device reports under
    pub device_id: String,
    /// Base URL of the map server
    pub server_url: String,
    /// Seconds between reporting cycles
    pub interval_secs: u64,
    /// Command printing the current location as JSON
    pub location_command: String,
    /// Extra arguments for the location command
    pub location_args: Vec<String>,
    /// Seconds before the location command is killed
    pub location_timeout_secs: u64,
    /// Seconds before an HTTP request to the server is abandoned
    pub http_timeout_secs: u64,
    /// Extra delivery attempts after a failed send
    pub retry_count: u8,
    /// Delay between delivery attempts (milliseconds)
    pub retry_delay_ms: u64,
    /// Heading window and movement threshold
    pub estimator: EstimatorConfig,
    /// Fix acceptance limits
    pub validation: ValidationConfig,
    /// Magnetic declination added to compass headings (degrees, east positive)
    pub declination_deg: f64,
    /// Directory holding phones.json, pois.json and drawings.json
    pub data_dir: PathBuf,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            device_id: "nota".to_string(),
            server_url: "http://24.95.169.161:5000".to_string(),
            interval_secs: 5,
            location_command: "termux-location".to_string(),
            location_args: Vec::new(),
            location_timeout_secs: 10,
            http_timeout_secs: 10,
            retry_count: 3,
            retry_delay_ms: 500,
            estimator: EstimatorConfig::default(),
            validation: ValidationConfig::default(),
            declination_deg: 0.0,
            data_dir: PathBuf::from("."),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Invalid parameter value
    #[error("Invalid parameter '{parameter}' = '{value}': {reason}")]
    InvalidParameter { parameter: String, value: String, reason: String },
    /// Configuration file I/O error
    #[error("I/O error: {message}")]
    IoError { message: String },
    /// JSON serialization/deserialization error
    #[error("Serialization error: {message}")]
    SerializationError { message: String },
}

/// Configuration validation result
#[derive(Debug)]
pub struct ValidationResult {
    /// Whether configuration is valid
    pub is_valid: bool,
    /// Validation errors
    pub errors: Vec<ConfigError>,
    /// Validation warnings
    pub warnings: Vec<String>,
}

impl ReporterConfig {
    /// Load configuration from a JSON file; missing keys take their defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: ReporterConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to parse config file '{}': {}", path_str, e),
            })?;

        // Validate before handing it out
        let validation = config.validate();
        if let Some(error) = validation.errors.into_iter().next() {
            return Err(error);
        }

        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializationError {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn location_timeout(&self) -> Duration {
        Duration::from_secs(self.location_timeout_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Check every parameter, collecting errors and warnings
    pub fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if self.device_id.trim().is_empty() {
            errors.push(ConfigError::InvalidParameter {
                parameter: "device_id".to_string(),
                value: self.device_id.clone(),
                reason: "Device id must not be empty".to_string(),
            });
        }

        if let Err(e) = endpoint_url(&self.server_url) {
            errors.push(ConfigError::InvalidParameter {
                parameter: "server_url".to_string(),
                value: self.server_url.clone(),
                reason: e.to_string(),
            });
        }

        // Validate reporting interval
        if self.interval_secs == 0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "interval_secs".to_string(),
                value: self.interval_secs.to_string(),
                reason: "Interval must be at least one second".to_string(),
            });
        } else if self.interval_secs > 600 {
            warnings.push("Very long reporting interval makes headings stale".to_string());
        }

        if self.location_command.trim().is_empty() {
            errors.push(ConfigError::InvalidParameter {
                parameter: "location_command".to_string(),
                value: self.location_command.clone(),
                reason: "Location command must not be empty".to_string(),
            });
        }

        if self.location_timeout_secs == 0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "location_timeout_secs".to_string(),
                value: self.location_timeout_secs.to_string(),
                reason: "Timeout must be at least one second".to_string(),
            });
        } else if self.location_timeout_secs >= self.interval_secs.max(1) * 4 {
            warnings.push("Location timeout is much longer than the reporting interval".to_string());
        }

        if self.http_timeout_secs == 0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "http_timeout_secs".to_string(),
                value: self.http_timeout_secs.to_string(),
                reason: "Timeout must be at least one second".to_string(),
            });
        }

        // Validate estimator tuning
        if self.estimator.capacity < 2 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "estimator.capacity".to_string(),
                value: self.estimator.capacity.to_string(),
                reason: "History must hold at least two fixes".to_string(),
            });
        } else if self.estimator.capacity > 50 {
            warnings.push("Large history window reacts slowly to turns".to_string());
        }

        if !self.estimator.min_movement_m.is_finite() || self.estimator.min_movement_m <= 0.0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "estimator.min_movement_m".to_string(),
                value: self.estimator.min_movement_m.to_string(),
                reason: "Movement threshold must be positive".to_string(),
            });
        } else if self.estimator.min_movement_m < 3.0 {
            warnings.push("Movement threshold below GPS noise produces jittery headings".to_string());
        }

        for (parameter, limit) in [
            ("validation.max_fix_age_s", self.validation.max_fix_age_s),
            ("validation.max_jump_m", self.validation.max_jump_m),
        ] {
            if let Some(limit) = limit {
                if !limit.is_finite() || limit <= 0.0 {
                    errors.push(ConfigError::InvalidParameter {
                        parameter: parameter.to_string(),
                        value: limit.to_string(),
                        reason: "Limit must be positive".to_string(),
                    });
                }
            }
        }

        if !self.declination_deg.is_finite() || self.declination_deg.abs() > 180.0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "declination_deg".to_string(),
                value: self.declination_deg.to_string(),
                reason: "Declination must be between -180 and 180 degrees".to_string(),
            });
        }

        if self.retry_count > 10 {
            warnings.push("Many retries can delay the next reporting cycle".to_string());
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}
