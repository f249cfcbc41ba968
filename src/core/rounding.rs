//! Rounding & clamping: snap a raw value onto a stop table

use crate::types::{ClampError, ExposureValue, RangeEdge, StopTable};
use crate::STOP_EPSILON;

/// Snap `raw_value` (native units) to the nearest entry of `table`.
///
/// Values up to `tolerance` stops past either end snap to that end;
/// anything further out is reported with the excess in stops.
pub fn round_and_clamp(table: &StopTable, raw_value: f64, tolerance: f64) -> Result<ExposureValue, ClampError> {
    let kind = table.kind();
    if !raw_value.is_finite() || raw_value <= 0.0 {
        return Err(ClampError::NotRepresentable { kind, requested: raw_value });
    }
    let (Some(first), Some(last)) = (table.first(), table.last()) else {
        return Err(ClampError::NotRepresentable { kind, requested: raw_value });
    };

    let stops = kind.stops_of(raw_value);

    if stops > last.stops + tolerance + STOP_EPSILON {
        return Err(ClampError::OutOfRange {
            kind,
            requested: raw_value,
            nearest: last.value,
            excess_stops: stops - last.stops,
            edge: RangeEdge::Above,
        });
    }
    if stops < first.stops - tolerance - STOP_EPSILON {
        return Err(ClampError::OutOfRange {
            kind,
            requested: raw_value,
            nearest: first.value,
            excess_stops: first.stops - stops,
            edge: RangeEdge::Below,
        });
    }

    // nearest_index clamps to the ends, which covers the grace window
    let index = table.nearest_index(stops).unwrap_or(0);
    Ok(table.entries()[index].value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stop_table::generate;
    use crate::types::{IncrementStep, ParameterKind};
    use crate::CLAMP_TOLERANCE_STOPS;

    #[test]
    fn test_snaps_to_nearest_mark() {
        let table = generate(ParameterKind::Shutter, IncrementStep::Full);
        let value = round_and_clamp(&table, 1.0 / 1020.0, CLAMP_TOLERANCE_STOPS).unwrap();
        assert_eq!(value, ExposureValue::ShutterSpeed(1.0 / 1000.0));
    }

    #[test]
    fn test_exact_marks_are_unchanged() {
        for kind in ParameterKind::ALL {
            for increment in IncrementStep::ALL {
                let table = generate(kind, increment);
                for entry in table.entries() {
                    let snapped = round_and_clamp(&table, entry.value.native(), CLAMP_TOLERANCE_STOPS).unwrap();
                    assert_eq!(snapped, entry.value);
                }
            }
        }
    }

    #[test]
    fn test_grace_window_at_both_edges() {
        let table = generate(ParameterKind::Iso, IncrementStep::Third);
        let just_above = 102_400.0 * 0.05f64.exp2();
        let just_below = 25.0 * (-0.05f64).exp2();
        assert_eq!(round_and_clamp(&table, just_above, CLAMP_TOLERANCE_STOPS).unwrap(), ExposureValue::Iso(102_400));
        assert_eq!(round_and_clamp(&table, just_below, CLAMP_TOLERANCE_STOPS).unwrap(), ExposureValue::Iso(25));
    }

    #[test]
    fn test_beyond_tolerance_reports_excess() {
        let table = generate(ParameterKind::Shutter, IncrementStep::Third);
        let err = round_and_clamp(&table, 30.0 * 0.2f64.exp2(), CLAMP_TOLERANCE_STOPS).unwrap_err();
        match err {
            ClampError::OutOfRange { nearest, excess_stops, edge, .. } => {
                assert_eq!(nearest, ExposureValue::ShutterSpeed(30.0));
                assert_eq!(edge, RangeEdge::Above);
                assert!((excess_stops - 0.2).abs() < 1e-9);
            }
            other => panic!("unexpected {:?}", other),
        }

        let err = round_and_clamp(&table, 1.0 / 16000.0, CLAMP_TOLERANCE_STOPS).unwrap_err();
        assert!(matches!(err, ClampError::OutOfRange { edge: RangeEdge::Below, .. }));
    }

    #[test]
    fn test_rejects_non_positive() {
        let table = generate(ParameterKind::Aperture, IncrementStep::Full);
        assert!(matches!(round_and_clamp(&table, 0.0, 0.05), Err(ClampError::NotRepresentable { .. })));
        assert!(matches!(round_and_clamp(&table, f64::NAN, 0.05), Err(ClampError::NotRepresentable { .. })));
    }
}
