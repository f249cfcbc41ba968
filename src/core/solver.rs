//! Equivalence solver
//!
//! Works in stop-space (base-2 logs):
//! - shutter: log2(seconds), more stops = more light
//! - aperture: 2 * log2(N), more stops = less light
//! - ISO: log2(sensitivity), more stops = more light
//!
//! The solved parameter moves by whatever cancels the exposure change of the
//! two targets, plus any EV compensation.

use std::sync::Arc;

use tracing::debug;

use crate::core::classifier::{check_requested, classify_computed};
use crate::core::config::EngineConfig;
use crate::core::rounding;
use crate::core::stop_table::StopTableCache;
use crate::types::{
    ClampError, ExposureValue, IncrementStep, ParameterKind, Resolution, SolveOutcome, SolveRequest,
    StopTable,
};

/// Stateless solver plus its stop table cache
#[derive(Debug, Default)]
pub struct ExposureEngine {
    config: EngineConfig,
    tables: StopTableCache,
}

impl ExposureEngine {
    /// Engine with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config, tables: StopTableCache::new() }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Stop table for (kind, increment), generated on first use
    pub fn table(&self, kind: ParameterKind, increment: IncrementStep) -> Arc<StopTable> {
        self.tables.get(kind, increment)
    }

    /// Number of cached stop tables
    pub fn cached_tables(&self) -> usize {
        self.tables.len()
    }

    /// Marked values of a stop table in canonical notation
    pub fn available_values(&self, kind: ParameterKind, increment: IncrementStep) -> Vec<String> {
        self.table(kind, increment).labels()
    }

    /// Snap a raw native value to the (kind, increment) table
    pub fn round_and_clamp(
        &self,
        raw_value: f64,
        kind: ParameterKind,
        increment: IncrementStep,
    ) -> Result<ExposureValue, ClampError> {
        let table = self.table(kind, increment);
        rounding::round_and_clamp(&table, raw_value, self.config.clamp_tolerance_stops)
    }

    /// Solve for the request's unknown parameter
    pub fn solve(&self, request: &SolveRequest) -> SolveOutcome {
        let tolerance = self.config.clamp_tolerance_stops;
        let base = request.base;
        let unknown = request.solve_for;

        for value in base.values().iter().chain(request.targets.iter()) {
            let table = self.table(value.kind(), request.increment);
            check_requested(&table, value, tolerance)?;
        }

        // Net exposure change from the two targets (positive = brighter)
        let delta: f64 = request
            .targets
            .iter()
            .map(|target| target.exposure_stops() - base.get(target.kind()).exposure_stops())
            .sum();

        // Cancel the change, then add compensation; exposure_sign flips it back into
        // the unknown's own stop-space
        let stops_applied = unknown.exposure_sign() * (request.ev_compensation - delta);
        let raw_stops = base.get(unknown).stops() + stops_applied;
        let raw_value = unknown.native_from_stops(raw_stops);

        debug!(
            solve_for = unknown.key(),
            delta,
            ev = request.ev_compensation,
            stops_applied,
            raw_value,
            "solving equivalent exposure"
        );

        let value = self
            .round_and_clamp(raw_value, unknown, request.increment)
            .map_err(|err| classify_computed(unknown, err))?;

        Ok(Resolution { value, stops_applied, raw_value, raw_stops })
    }
}

// =============================================================================
// TESTS
// =============================================================================
