//! Per-entity heading estimation
//!
//! Each tracked device owns an independent [`HeadingEstimator`]; nothing is
//! shared between entities.

use crate::algorithms::heading::{EstimatorConfig, HeadingEstimator};
use crate::core::{Fix, HeadingResult};
use std::collections::HashMap;

/// Collection of heading estimators keyed by entity id
#[derive(Debug, Clone, Default)]
pub struct HeadingTracker {
    estimators: HashMap<String, HeadingEstimator>,
    config: EstimatorConfig,
}

impl HeadingTracker {
    /// Create a tracker whose estimators use the default window and threshold
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracker whose estimators share the given tuning
    pub fn with_config(config: EstimatorConfig) -> Self {
        Self {
            estimators: HashMap::new(),
            config,
        }
    }

    /// Record a fix for `entity` and estimate its heading.
    ///
    /// The first fix for an unknown entity starts a new history.
    pub fn record_and_estimate(&mut self, entity: &str, fix: Fix) -> Option<HeadingResult> {
        let config = self.config;
        self.estimators
            .entry(entity.to_string())
            .or_insert_with(|| HeadingEstimator::with_config(config))
            .record_and_estimate(fix)
    }

    /// Clear the history of one entity. Unknown entities are ignored.
    pub fn reset(&mut self, entity: &str) {
        if let Some(estimator) = self.estimators.get_mut(entity) {
            estimator.reset();
        }
    }

    /// Drop an entity entirely
    pub fn remove(&mut self, entity: &str) -> Option<HeadingEstimator> {
        self.estimators.remove(entity)
    }

    pub fn estimator(&self, entity: &str) -> Option<&HeadingEstimator> {
        self.estimators.get(entity)
    }

    /// Ids of every entity seen so far
    pub fn entities(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.estimators.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.estimators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.estimators.is_empty()
    }
}
