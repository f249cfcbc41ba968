//! Solve results and their terminal / JSON renderings

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::types::{ExposureTriple, ExposureValue, IncrementStep, ParameterKind, SolveError};

/// A successfully solved parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resolution {
    /// Marked value from the stop table
    pub value: ExposureValue,
    /// Signed shift of the solved parameter from its base, in its own stops, before rounding
    pub stops_applied: f64,
    /// Exact equivalent value in native units before rounding
    pub raw_value: f64,
    /// Stop position of `raw_value`
    pub raw_stops: f64,
}

impl Resolution {
    /// Stops lost or gained by snapping to the marked value
    pub fn rounding_error_stops(&self) -> f64 {
        self.value.stops() - self.raw_stops
    }
}

/// Result of one solve call
pub type SolveOutcome = Result<Resolution, SolveError>;

/// Resolved triple plus context, as shown by the CLI and returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct SolveReport {
    pub timestamp: DateTime<Utc>,
    pub solve_for: ParameterKind,
    /// Resolved value in canonical notation
    pub value: String,
    pub stops_applied: f64,
    pub raw_value: f64,
    pub increment: IncrementStep,
    pub ev_compensation: f64,
    /// Full resolved triple (targets plus solved value)
    pub shutter: String,
    pub aperture: String,
    pub iso: String,
    /// EV100 of the resolved triple
    pub ev100: f64,
}

impl SolveReport {
    pub fn new(
        resolution: &Resolution,
        target: ExposureTriple,
        solve_for: ParameterKind,
        increment: IncrementStep,
        ev_compensation: f64,
    ) -> Self {
        let resolved = target.with(resolution.value);
        let [shutter, aperture, iso] = resolved.values().map(|v| v.to_string());
        Self {
            timestamp: Utc::now(),
            solve_for,
            value: resolution.value.to_string(),
            stops_applied: resolution.stops_applied,
            raw_value: resolution.raw_value,
            increment,
            ev_compensation,
            shutter,
            aperture,
            iso,
            ev100: resolved.ev100(),
        }
    }

    /// Colored one-liner for terminals
    pub fn to_terminal_string(&self) -> String {
        format!(
            "{} {} = {} | {} {} ISO {} | shift={:+.2} stops | EV100={:.1}",
            "✓".green(),
            self.solve_for.key().bold(),
            self.value.green().bold(),
            self.shutter,
            self.aperture,
            self.iso,
            self.stops_applied,
            self.ev100
        )
    }

    /// Plain key=value line for scripts
    pub fn to_parseable_string(&self) -> String {
        format!(
            "{}={} | shutter={} | aperture={} | iso={} | shift={:.3} | ev100={:.2}",
            self.solve_for.key(),
            self.value,
            self.shutter,
            self.aperture,
            self.iso,
            self.stops_applied,
            self.ev100
        )
    }
}
