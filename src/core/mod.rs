//! Core types and constants for location tracking

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
