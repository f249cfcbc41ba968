//! Stop table generation and the per-(kind, increment) cache
//!
//! Tables are laid out on an ideal grid of 2^(k / steps) around each kind's
//! anchor (1 s, f/1, ISO 25). Every grid point carries the conventional
//! marked value closest to it, so the table reads like a camera dial.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::types::{ExposureValue, IncrementStep, ParameterKind, StopEntry, StopTable};
use crate::{
    APERTURE_MAX_STOP, APERTURE_MIN_STOP, ISO_MAX_STOP, ISO_MIN_STOP, SHUTTER_MAX_STOP,
    SHUTTER_MIN_STOP,
};

// =============================================================================
// MARKED VALUES
// Third-stop series serves Full and Third tables, half-stop series serves Half
// =============================================================================

/// Shutter, third-stop series (seconds)
const SHUTTER_THIRDS: &[f64] = &[
    1.0 / 8000.0, 1.0 / 6400.0, 1.0 / 5000.0,
    1.0 / 4000.0, 1.0 / 3200.0, 1.0 / 2500.0,
    1.0 / 2000.0, 1.0 / 1600.0, 1.0 / 1250.0,
    1.0 / 1000.0, 1.0 / 800.0, 1.0 / 640.0,
    1.0 / 500.0, 1.0 / 400.0, 1.0 / 320.0,
    1.0 / 250.0, 1.0 / 200.0, 1.0 / 160.0,
    1.0 / 125.0, 1.0 / 100.0, 1.0 / 80.0,
    1.0 / 60.0, 1.0 / 50.0, 1.0 / 40.0,
    1.0 / 30.0, 1.0 / 25.0, 1.0 / 20.0,
    1.0 / 15.0, 1.0 / 13.0, 1.0 / 10.0,
    1.0 / 8.0, 1.0 / 6.0, 1.0 / 5.0,
    1.0 / 4.0, 0.3, 0.4,
    0.5, 0.6, 0.8,
    1.0, 1.3, 1.6,
    2.0, 2.5, 3.2,
    4.0, 5.0, 6.0,
    8.0, 10.0, 13.0,
    15.0, 20.0, 25.0,
    30.0,
];

/// Shutter, half-stop series (seconds)
const SHUTTER_HALVES: &[f64] = &[
    1.0 / 8000.0, 1.0 / 6000.0,
    1.0 / 4000.0, 1.0 / 3000.0,
    1.0 / 2000.0, 1.0 / 1500.0,
    1.0 / 1000.0, 1.0 / 750.0,
    1.0 / 500.0, 1.0 / 350.0,
    1.0 / 250.0, 1.0 / 180.0,
    1.0 / 125.0, 1.0 / 90.0,
    1.0 / 60.0, 1.0 / 45.0,
    1.0 / 30.0, 1.0 / 20.0,
    1.0 / 15.0, 1.0 / 10.0,
    1.0 / 8.0, 1.0 / 6.0,
    1.0 / 4.0, 0.3,
    0.5, 0.7,
    1.0, 1.5,
    2.0, 3.0,
    4.0, 6.0,
    8.0, 10.0,
    15.0, 20.0,
    30.0,
];

/// Aperture, third-stop series (f-number)
const APERTURE_THIRDS: &[f64] = &[
    1.0, 1.1, 1.2,
    1.4, 1.6, 1.8,
    2.0, 2.2, 2.5,
    2.8, 3.2, 3.5,
    4.0, 4.5, 5.0,
    5.6, 6.3, 7.1,
    8.0, 9.0, 10.0,
    11.0, 13.0, 14.0,
    16.0, 18.0, 20.0,
    22.0, 25.0, 29.0,
    32.0, 36.0, 40.0,
    45.0, 51.0, 57.0,
    64.0,
];

/// Aperture, half-stop series (f-number)
const APERTURE_HALVES: &[f64] = &[
    1.0, 1.2, 1.4, 1.7,
    2.0, 2.4, 2.8, 3.3,
    4.0, 4.8, 5.6, 6.7,
    8.0, 9.5, 11.0, 13.0,
    16.0, 19.0, 22.0, 27.0,
    32.0, 38.0, 45.0, 54.0,
    64.0,
];

/// ISO, third-stop series
const ISO_THIRDS: &[f64] = &[
    25.0, 32.0, 40.0,
    50.0, 64.0, 80.0,
    100.0, 125.0, 160.0,
    200.0, 250.0, 320.0,
    400.0, 500.0, 640.0,
    800.0, 1000.0, 1250.0,
    1600.0, 2000.0, 2500.0,
    3200.0, 4000.0, 5000.0,
    6400.0, 8000.0, 10000.0,
    12800.0, 16000.0, 20000.0,
    25600.0, 32000.0, 40000.0,
    51200.0, 64000.0, 80000.0,
    102400.0,
];

/// ISO, half-stop series
const ISO_HALVES: &[f64] = &[
    25.0, 35.0,
    50.0, 70.0,
    100.0, 140.0,
    200.0, 280.0,
    400.0, 560.0,
    800.0, 1100.0,
    1600.0, 2200.0,
    3200.0, 4500.0,
    6400.0, 9000.0,
    12800.0, 18000.0,
    25600.0, 36000.0,
    51200.0, 72000.0,
    102400.0,
];

/// Marked values to label grid points with
fn marks(kind: ParameterKind, increment: IncrementStep) -> &'static [f64] {
    match (kind, increment) {
        (ParameterKind::Shutter, IncrementStep::Half) => SHUTTER_HALVES,
        (ParameterKind::Shutter, _) => SHUTTER_THIRDS,
        (ParameterKind::Aperture, IncrementStep::Half) => APERTURE_HALVES,
        (ParameterKind::Aperture, _) => APERTURE_THIRDS,
        (ParameterKind::Iso, IncrementStep::Half) => ISO_HALVES,
        (ParameterKind::Iso, _) => ISO_THIRDS,
    }
}

/// Grid bounds in whole stops from the anchor, plus the anchor's own stop position
fn grid(kind: ParameterKind) -> (i32, i32, f64) {
    match kind {
        ParameterKind::Shutter => (SHUTTER_MIN_STOP, SHUTTER_MAX_STOP, 0.0),
        ParameterKind::Aperture => (APERTURE_MIN_STOP, APERTURE_MAX_STOP, 0.0),
        ParameterKind::Iso => (ISO_MIN_STOP, ISO_MAX_STOP, 25f64.log2()),
    }
}

/// Build the table for `kind` at `increment`
pub fn generate(kind: ParameterKind, increment: IncrementStep) -> StopTable {
    let (min_stop, max_stop, anchor) = grid(kind);
    let steps = increment.steps_per_stop() as i32;
    let series = marks(kind, increment);

    let entries: Vec<StopEntry> = (0..=(max_stop - min_stop) * steps)
        .map(|i| {
            let ideal = anchor + min_stop as f64 + i as f64 / steps as f64;
            let native = closest_mark(kind, series, ideal);
            let value = ExposureValue::from_native(kind, native);
            StopEntry { value, stops: value.stops() }
        })
        .collect();

    let table = StopTable::from_sorted(kind, increment, entries);
    debug!(
        kind = kind.key(),
        increment = increment.key(),
        entries = table.len(),
        "generated stop table"
    );
    table
}

fn closest_mark(kind: ParameterKind, series: &[f64], ideal_stops: f64) -> f64 {
    series
        .iter()
        .copied()
        .min_by(|a, b| {
            let da = (kind.stops_of(*a) - ideal_stops).abs();
            let db = (kind.stops_of(*b) - ideal_stops).abs();
            da.total_cmp(&db)
        })
        .unwrap_or_else(|| kind.native_from_stops(ideal_stops))
}

// =============================================================================
// CACHE
// =============================================================================

/// Lazily filled map from (kind, increment) to a shared immutable table.
///
/// Two threads racing on a missing key both generate; the tables are
/// identical so whichever insert lands last is kept.
#[derive(Debug, Default)]
pub struct StopTableCache {
    tables: RwLock<HashMap<(ParameterKind, IncrementStep), Arc<StopTable>>>,
}

impl StopTableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached table, generating it on first use
    pub fn get(&self, kind: ParameterKind, increment: IncrementStep) -> Arc<StopTable> {
        let key = (kind, increment);
        if let Some(table) = self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Arc::clone(table);
        }

        let table = Arc::new(generate(kind, increment));
        self.tables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::clone(&table));
        table
    }

    /// Number of tables generated so far
    pub fn len(&self) -> usize {
        self.tables.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// TESTS
// =============================================================================
