//! Location source abstraction
//!
//! This module hides where fixes come from: the Termux:API location command on
//! a phone, or a scripted mock in tests.

pub mod source;
pub mod termux;
pub mod mock;
pub mod error;

pub use source::{LocationSource, SourceStatus};
pub use termux::TermuxLocationSource;
pub use mock::MockLocationSource;
pub use error::{RecoveryStrategy, SourceError, SourceResult};
