//! Mock location source for testing and development

use crate::core::Fix;
use crate::hardware::{LocationSource, SourceError, SourceResult, SourceStatus};
use std::collections::VecDeque;

/// Scripted location source
pub struct MockLocationSource {
    name: String,
    queue: VecDeque<SourceResult<Option<Fix>>>,
    status: SourceStatus,
    connected: bool,
}

impl MockLocationSource {
    /// Create an empty mock source
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            queue: VecDeque::new(),
            status: SourceStatus::new(),
            connected: true,
        }
    }

    /// Create a mock source that replays the given fixes in order
    pub fn with_fixes(name: impl Into<String>, fixes: impl IntoIterator<Item = Fix>) -> Self {
        let mut source = Self::new(name);
        for fix in fixes {
            source.push_fix(fix);
        }
        source
    }

    pub fn push_fix(&mut self, fix: Fix) {
        self.queue.push_back(Ok(Some(fix)));
    }

    /// Queue a read that answers without a position
    pub fn push_empty(&mut self) {
        self.queue.push_back(Ok(None));
    }

    pub fn push_error(&mut self, error: SourceError) {
        self.queue.push_back(Err(error));
    }

    /// Simulate losing the source
    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    pub fn reconnect(&mut self) {
        self.connected = true;
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}

impl LocationSource for MockLocationSource {
    fn read_fix(&mut self) -> SourceResult<Option<Fix>> {
        let result = if !self.connected {
            Err(SourceError::Unavailable {
                name: self.name.clone(),
            })
        } else {
            self.queue.pop_front().unwrap_or(Ok(None))
        };
        self.status.record(&result);
        result
    }

    fn status(&self) -> SourceStatus {
        self.status.clone()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_in_order() {
        let mut source = MockLocationSource::with_fixes(
            "mock",
            vec![Fix::at(1.0, 1.0, 0.0), Fix::at(2.0, 2.0, 1.0)],
        );
        source.push_empty();
        assert_eq!(source.queued(), 3);

        assert_eq!(source.read_fix().unwrap().unwrap().lat, 1.0);
        assert_eq!(source.read_fix().unwrap().unwrap().lat, 2.0);
        assert!(source.read_fix().unwrap().is_none());
        // Exhausted queue behaves like a source without a position
        assert!(source.read_fix().unwrap().is_none());
        assert_eq!(source.status().reads, 4);
        assert_eq!(source.status().empty_reads, 2);
    }

    #[test]
    fn test_disconnect() {
        let mut source = MockLocationSource::new("mock");
        source.disconnect();
        assert!(matches!(source.read_fix(), Err(SourceError::Unavailable { .. })));

        source.reconnect();
        source.push_error(SourceError::Timeout { timeout_ms: 5 });
        assert_eq!(source.read_fix(), Err(SourceError::Timeout { timeout_ms: 5 }));
        assert_eq!(source.status().error_count, 2);
    }
}
