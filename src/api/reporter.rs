//! Periodic location reporting
//!
//! One cycle reads a fix from the location source, validates it, feeds it to
//! the heading estimator and posts the resulting update to the server.

use crate::api::payload::PayloadAssembler;
use crate::api::transport::Transport;
use crate::api::types::{ApiError, ApiResult, ReportOutcome};
use crate::hardware::{LocationSource, RecoveryStrategy};
use crate::processing::cache::SensorCache;
use crate::validation::data::FixValidator;
use log::{debug, error, info, warn};
use std::thread;
use std::time::{Duration, Instant};

/// Counters for a running reporter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReporterStats {
    pub cycles: u64,
    pub sent: u64,
    pub skipped: u64,
    pub rejected: u64,
    pub errors: u64,
}

/// Blocking reporter driving one location source and one transport
pub struct LocationReporter<S: LocationSource, T: Transport> {
    source: S,
    transport: T,
    cache: SensorCache,
    validator: FixValidator,
    assembler: PayloadAssembler,
    interval: Duration,
    stats: ReporterStats,
}

impl<S: LocationSource, T: Transport> LocationReporter<S, T> {
    /// Create a new reporter with a default cache and validator
    pub fn new(source: S, transport: T, assembler: PayloadAssembler, interval: Duration) -> Self {
        Self {
            source,
            transport,
            cache: SensorCache::default(),
            validator: FixValidator::new(),
            assembler,
            interval,
            stats: ReporterStats::default(),
        }
    }

    /// Use an existing cache, e.g. one shared with a compass poller
    pub fn with_cache(mut self, cache: SensorCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_validator(mut self, validator: FixValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn cache(&self) -> &SensorCache {
        &self.cache
    }

    pub fn stats(&self) -> &ReporterStats {
        &self.stats
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run a single reporting cycle
    pub fn report_once(&mut self) -> ApiResult<ReportOutcome> {
        self.stats.cycles += 1;
        let outcome = self.cycle();

        match &outcome {
            Ok(ReportOutcome::Skipped) => self.stats.skipped += 1,
            Ok(ReportOutcome::Rejected { .. }) => self.stats.rejected += 1,
            Ok(ReportOutcome::Sent { .. }) => self.stats.sent += 1,
            Err(_) => self.stats.errors += 1,
        }
        outcome
    }

    fn cycle(&mut self) -> ApiResult<ReportOutcome> {
        let fix = match self.source.read_fix()? {
            Some(fix) => fix,
            None => {
                warn!("No location available from {}", self.source.name());
                return Ok(ReportOutcome::Skipped);
            }
        };

        if let Err(error) = self.validator.validate(&fix) {
            warn!("Discarding fix ({}, {}): {}", fix.lat, fix.lon, error);
            return Ok(ReportOutcome::Rejected { error });
        }

        let heading = self.cache.ingest_fix(fix);
        match &heading {
            Some(h) => debug!("Heading {:.1}° {} over {:.1} m", h.bearing_deg, h.cardinal, h.distance_m),
            None => debug!("No heading yet ({} fixes in window)", self.cache.history_len()),
        }

        let update = self.assembler.assemble(&fix, heading.as_ref());
        let ack = self.transport.send(&update)?;
        info!("Sent location: {}, {}", update.lat, update.lng);

        Ok(ReportOutcome::Sent { update, ack })
    }

    /// Whether the location source is still mostly delivering fixes
    pub fn source_healthy(&self) -> bool {
        self.source.status().is_healthy()
    }

    /// Report every interval until `max_cycles` cycles have run, or forever.
    ///
    /// Errors are logged and the loop carries on; only an unrecoverable
    /// source error ends it early. A source error asking for a delay stretches
    /// the pause before the next cycle to at least that delay.
    pub fn run(&mut self, max_cycles: Option<u64>) -> ApiResult<()> {
        let mut completed = 0u64;
        while max_cycles.map_or(true, |max| completed < max) {
            let started = Instant::now();
            let mut pause = self.interval;

            match self.report_once() {
                Ok(_) => {}
                Err(ApiError::Source(source_error)) => match source_error.recovery_strategy() {
                    RecoveryStrategy::Fail => {
                        error!("Location source failed: {}", source_error);
                        return Err(ApiError::Source(source_error));
                    }
                    RecoveryStrategy::RetryWithDelay { delay_ms } => {
                        error!("Reporting cycle failed: {}", source_error);
                        pause = pause.max(Duration::from_millis(u64::from(delay_ms)));
                    }
                    RecoveryStrategy::RetryNextCycle => error!("Reporting cycle failed: {}", source_error),
                },
                Err(e) => error!("Reporting cycle failed: {}", e),
            }

            if !self.source_healthy() {
                warn!(
                    "Location source {} is unhealthy: {:?}",
                    self.source.name(),
                    self.source.status()
                );
            }

            completed += 1;
            if max_cycles.is_some_and(|max| completed >= max) {
                break;
            }

            if let Some(remaining) = pause.checked_sub(started.elapsed()) {
                thread::sleep(remaining);
            }
        }
        Ok(())
    }
}
