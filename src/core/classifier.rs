//! Result & error classifier
//!
//! Turns clamp failures into the caller-facing taxonomy:
//! - a computed value past its table -> over/underexposed
//! - a value the caller asked for past its table -> parameter limit

use tracing::debug;

use crate::core::rounding::round_and_clamp;
use crate::types::{ClampError, ExposureValue, ParameterKind, RangeEdge, SolveError, StopTable};

/// Classify a clamp failure for a value the solver computed.
///
/// Running off the end where the parameter gives the most light (longest
/// shutter, highest ISO, widest aperture) means the scene demands more
/// exposure than the parameter can provide: overexposed. The other end is
/// underexposed.
pub fn classify_computed(kind: ParameterKind, err: ClampError) -> SolveError {
    match err {
        ClampError::OutOfRange { excess_stops, edge, nearest, .. } => {
            let edge_sign = match edge {
                RangeEdge::Above => 1.0,
                RangeEdge::Below => -1.0,
            };
            let brighter = edge_sign * kind.exposure_sign() > 0.0;
            debug!(kind = kind.key(), %edge, excess_stops, %nearest, brighter, "computed value out of range");
            if brighter {
                SolveError::Overexposed { stops_overexposed: excess_stops }
            } else {
                SolveError::Underexposed { stops_underexposed: excess_stops }
            }
        }
        ClampError::NotRepresentable { requested, .. } => SolveError::ParameterLimit {
            parameter_name: kind.display_name().to_string(),
            requested_value: requested.to_string(),
            available_limit: "none".to_string(),
        },
    }
}

/// Check that a caller-supplied value lies within `table`'s range
pub fn check_requested(table: &StopTable, value: &ExposureValue, tolerance: f64) -> Result<(), SolveError> {
    match round_and_clamp(table, value.native(), tolerance) {
        Ok(_) => Ok(()),
        Err(ClampError::OutOfRange { nearest, .. }) => Err(SolveError::ParameterLimit {
            parameter_name: value.kind().display_name().to_string(),
            requested_value: value.to_string(),
            available_limit: nearest.to_string(),
        }),
        Err(ClampError::NotRepresentable { .. }) => Err(SolveError::ParameterLimit {
            parameter_name: value.kind().display_name().to_string(),
            requested_value: value.to_string(),
            available_limit: "none".to_string(),
        }),
    }
}
