//! Input validation for location fixes

pub mod data;

pub use data::{FixValidator, ValidationConfig, ValidationError};
