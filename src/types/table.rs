//! Stop tables: ordered marked values for one parameter kind

use serde::Serialize;

use crate::types::{ExposureValue, IncrementStep, ParameterKind};

/// One marked value and its position in stop-space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StopEntry {
    pub value: ExposureValue,
    pub stops: f64,
}

/// Immutable, strictly increasing (in stops) list of marked values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopTable {
    kind: ParameterKind,
    increment: IncrementStep,
    entries: Vec<StopEntry>,
}

impl StopTable {
    /// Build from entries already sorted by stop position.
    ///
    /// Entries that do not advance past their predecessor are dropped so
    /// that every stop position appears once.
    pub fn from_sorted(kind: ParameterKind, increment: IncrementStep, entries: Vec<StopEntry>) -> Self {
        let mut deduped: Vec<StopEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            if deduped.last().map_or(true, |last| entry.stops > last.stops) {
                deduped.push(entry);
            }
        }
        Self { kind, increment, entries: deduped }
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    pub fn increment(&self) -> IncrementStep {
        self.increment
    }

    pub fn entries(&self) -> &[StopEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> Option<&StopEntry> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&StopEntry> {
        self.entries.last()
    }

    /// Index of the entry closest to `stops`.
    ///
    /// An exact tie between two neighbours goes to the even index.
    pub fn nearest_index(&self, stops: f64) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        let upper = self.entries.partition_point(|e| e.stops < stops);
        if upper == 0 {
            return Some(0);
        }
        if upper == self.entries.len() {
            return Some(upper - 1);
        }
        let lower = upper - 1;
        let below = stops - self.entries[lower].stops;
        let above = self.entries[upper].stops - stops;
        let index = if (below - above).abs() <= 1e-12 {
            if lower % 2 == 0 { lower } else { upper }
        } else if below < above {
            lower
        } else {
            upper
        };
        Some(index)
    }

    pub fn nearest(&self, stops: f64) -> Option<&StopEntry> {
        self.nearest_index(stops).map(|i| &self.entries[i])
    }

    /// Is `value` one of the table's marked values?
    pub fn contains(&self, value: &ExposureValue) -> bool {
        self.entries.iter().any(|e| e.value == *value)
    }

    /// Entries formatted in their canonical notation
    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.value.to_string()).collect()
    }
}
