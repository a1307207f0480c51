use crate::algorithms::compass::Compass;
use crate::algorithms::heading::{EstimatorConfig, HeadingEstimator};
use crate::core::{now_seconds, Fix, HeadingResult};
use nalgebra::Vector3;
use std::sync::{Arc, Mutex, MutexGuard};

/// Latest sensor-derived values for one tracked device
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorSnapshot {
    /// Most recently ingested fix
    pub last_fix: Option<Fix>,
    /// Heading produced by the most recent fix, if any
    pub current_heading: Option<HeadingResult>,
    /// Last heading that was produced, kept across fixes that produce none
    pub last_known_heading: Option<HeadingResult>,
    /// Tilt-compensated compass heading in degrees
    pub compass_heading: Option<f64>,
    /// Time the compass heading was computed (seconds since epoch)
    pub compass_timestamp: Option<f64>,
    /// Number of fixes ingested since creation or the last reset
    pub fixes_ingested: u64,
}

struct CacheState {
    estimator: HeadingEstimator,
    snapshot: SensorSnapshot,
}

/// Lock-guarded heading history shared between a sensor poller and a consumer.
///
/// Cloning the cache yields another handle to the same state. Each operation
/// holds the lock only for the constant-time estimator update or a copy of the
/// snapshot.
#[derive(Clone)]
pub struct SensorCache {
    state: Arc<Mutex<CacheState>>,
    compass: Compass,
}

impl Default for SensorCache {
    fn default() -> Self {
        Self::new(EstimatorConfig::default(), Compass::default())
    }
}

impl SensorCache {
    /// Create a cache with the given estimator tuning and compass declination
    pub fn new(config: EstimatorConfig, compass: Compass) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState {
                estimator: HeadingEstimator::with_config(config),
                snapshot: SensorSnapshot::default(),
            })),
            compass,
        }
    }

    // The state is plain data, a panic mid-update cannot leave it unusable
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record a fix and return the heading it produced
    pub fn ingest_fix(&self, fix: Fix) -> Option<HeadingResult> {
        let mut state = self.lock();
        let heading = state
            .estimator
            .record_and_estimate(fix)
            .filter(HeadingResult::is_valid);

        state.snapshot.last_fix = Some(fix);
        state.snapshot.current_heading = heading;
        if heading.is_some() {
            state.snapshot.last_known_heading = heading;
        }
        state.snapshot.fixes_ingested += 1;
        heading
    }

    /// Update the compass heading from raw accelerometer and magnetometer readings
    pub fn ingest_compass(&self, accel: &Vector3<f64>, mag: &Vector3<f64>) -> Option<f64> {
        let heading = self.compass.heading(accel, mag);
        if heading.is_some() {
            let mut state = self.lock();
            state.snapshot.compass_heading = heading;
            state.snapshot.compass_timestamp = Some(now_seconds());
        }
        heading
    }

    /// Copy of the current values
    pub fn snapshot(&self) -> SensorSnapshot {
        self.lock().snapshot
    }

    /// Number of fixes currently held in the history window
    pub fn history_len(&self) -> usize {
        self.lock().estimator.len()
    }

    /// Clear history and every cached value
    pub fn reset(&self) {
        let mut state = self.lock();
        state.estimator.reset();
        state.snapshot = SensorSnapshot::default();
    }
}
