//! Movement-derived heading estimation
//!
//! A [`HeadingEstimator`] keeps the last few fixes of one tracked entity and
//! turns them into a travel direction. Rather than trusting the freshest pair
//! of fixes, it measures every older fix against the newest one and uses the
//! pair with the largest displacement, provided that displacement clears the
//! minimum movement threshold. GPS jitter on a stationary device therefore
//! never produces a heading.

use crate::algorithms::geodesy::{haversine_distance, initial_bearing};
use crate::core::{Cardinal, Fix, HeadingResult, HISTORY_CAPACITY, MIN_MOVEMENT_M};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Estimator tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Fixes kept in the history window
    pub capacity: usize,
    /// Minimum displacement for a usable pair (meters)
    pub min_movement_m: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            capacity: HISTORY_CAPACITY,
            min_movement_m: MIN_MOVEMENT_M,
        }
    }
}

/// Bounded fix history and heading calculator for a single entity
#[derive(Debug, Clone)]
pub struct HeadingEstimator {
    /// Recent fixes, oldest first
    history: VecDeque<Fix>,
    config: EstimatorConfig,
}

impl Default for HeadingEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadingEstimator {
    /// Create an estimator with the default five-fix window and 3 m threshold
    pub fn new() -> Self {
        Self::with_config(EstimatorConfig::default())
    }

    /// Create an estimator with custom tuning.
    ///
    /// A capacity below 2 could never hold a pair, so it is raised to 2.
    pub fn with_config(config: EstimatorConfig) -> Self {
        let config = EstimatorConfig {
            capacity: config.capacity.max(2),
            ..config
        };
        Self {
            history: VecDeque::with_capacity(config.capacity + 1),
            config,
        }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Record a new fix and estimate the current travel heading.
    ///
    /// Returns `None` while fewer than two fixes are held or when no older fix
    /// is at least `min_movement_m` away from the new one. Coordinates are not
    /// validated here; callers are expected to run fixes through
    /// `FixValidator` first. A NaN distance never qualifies as a candidate.
    pub fn record_and_estimate(&mut self, fix: Fix) -> Option<HeadingResult> {
        self.history.push_back(fix);
        while self.history.len() > self.config.capacity {
            self.history.pop_front();
        }

        if self.history.len() < 2 {
            return None;
        }

        let newest = self.history.back()?;
        let (origin, distance_m) = self.farthest_candidate(newest)?;
        let bearing_deg = initial_bearing(origin, newest);

        Some(HeadingResult {
            bearing_deg,
            cardinal: Cardinal::from_bearing(bearing_deg),
            distance_m,
        })
    }

    /// Oldest-to-newest scan for the older fix farthest from `newest`.
    ///
    /// Only fixes at or beyond the movement threshold qualify. On an exact tie
    /// the earlier fix is kept.
    fn farthest_candidate<'a>(&'a self, newest: &Fix) -> Option<(&'a Fix, f64)> {
        let older = self.history.len() - 1;
        let mut best: Option<(&Fix, f64)> = None;

        for candidate in self.history.iter().take(older) {
            let distance = haversine_distance(candidate, newest);
            if distance.is_nan() || distance < self.config.min_movement_m {
                continue;
            }
            match best {
                Some((_, best_distance)) if distance <= best_distance => {}
                _ => best = Some((candidate, distance)),
            }
        }

        best
    }

    /// Forget every recorded fix
    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Recorded fixes, oldest first
    pub fn history(&self) -> impl Iterator<Item = &Fix> {
        self.history.iter()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Most recently recorded fix
    pub fn latest(&self) -> Option<&Fix> {
        self.history.back()
    }
}
