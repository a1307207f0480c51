//! Location source interface and status

use crate::core::Fix;
use crate::hardware::SourceResult;

/// Abstraction over anything that yields periodic position fixes
pub trait LocationSource {
    /// Read the current position.
    /// Returns Ok(Some(fix)) when a position is available
    /// Returns Ok(None) when the source answered without a position
    /// Returns Err(error) if the source failed
    fn read_fix(&mut self) -> SourceResult<Option<Fix>>;

    /// Get current source status
    fn status(&self) -> SourceStatus;

    /// Human-readable source name for logs
    fn name(&self) -> &str;
}

/// Source health counters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceStatus {
    pub reads: u32,
    pub fixes: u32,
    pub empty_reads: u32,
    pub error_count: u32,
    /// Timestamp of the last fix delivered (seconds since epoch)
    pub last_fix_time: Option<f64>,
}

impl SourceStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Book-keeping shared by every source implementation
    pub fn record(&mut self, result: &SourceResult<Option<Fix>>) {
        self.reads += 1;
        match result {
            Ok(Some(fix)) => {
                self.fixes += 1;
                self.last_fix_time = Some(fix.timestamp);
            }
            Ok(None) => self.empty_reads += 1,
            Err(_) => self.error_count += 1,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.error_count < 10 || self.fixes > self.error_count
    }
}
