//! Solve requests

use serde::Serialize;

use crate::types::{ExposureTriple, ExposureValue, FormatError, IncrementStep, ParameterKind};
use crate::EV_COMPENSATION_LIMIT;

/// A validated request to solve one parameter of an exposure triple
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolveRequest {
    /// The known, correctly exposed triple
    pub base: ExposureTriple,
    /// Parameter whose equivalent value is computed
    pub solve_for: ParameterKind,
    /// New values for the two other parameters
    pub targets: [ExposureValue; 2],
    /// Table granularity for the result
    pub increment: IncrementStep,
    /// Stops added on top of the equivalent exposure (positive brightens)
    pub ev_compensation: f64,
}

impl SolveRequest {
    /// Create a request.
    ///
    /// # Panics
    ///
    /// Panics when `targets` does not hold exactly the two kinds other than
    /// `solve_for`. Callers building targets from user input go through
    /// [`SolveRequest::from_target_triple`] or the query layer instead.
    pub fn new(
        base: ExposureTriple,
        solve_for: ParameterKind,
        targets: [ExposureValue; 2],
        increment: IncrementStep,
        ev_compensation: f64,
    ) -> Result<Self, FormatError> {
        let expected = solve_for.others();
        let covered = expected.iter().all(|kind| targets.iter().any(|t| t.kind() == *kind));
        assert!(
            covered,
            "targets {:?} must supply {:?} and {:?} when solving for {:?}",
            targets.map(|t| t.kind()),
            expected[0],
            expected[1],
            solve_for
        );

        if !ev_compensation.is_finite() || ev_compensation.abs() > EV_COMPENSATION_LIMIT {
            return Err(FormatError::CompensationOutOfRange {
                value: ev_compensation,
                limit: EV_COMPENSATION_LIMIT,
            });
        }

        Ok(Self { base, solve_for, targets, increment, ev_compensation })
    }

    /// Take the two non-solved targets out of a full triple
    pub fn from_target_triple(
        base: ExposureTriple,
        target: ExposureTriple,
        solve_for: ParameterKind,
        increment: IncrementStep,
        ev_compensation: f64,
    ) -> Result<Self, FormatError> {
        let targets = solve_for.others().map(|kind| target.get(kind));
        Self::new(base, solve_for, targets, increment, ev_compensation)
    }

    /// Target triple with the solved slot still holding the base value
    pub fn target_triple(&self) -> ExposureTriple {
        self.targets.iter().fold(self.base, |triple, value| triple.with(*value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ExposureTriple {
        ExposureTriple::new(1.0 / 125.0, 8.0, 100)
    }

    #[test]
    fn test_targets_in_any_order() {
        let request = SolveRequest::new(
            base(),
            ParameterKind::Shutter,
            [ExposureValue::Iso(400), ExposureValue::Aperture(4.0)],
            IncrementStep::Third,
            0.0,
        )
        .unwrap();
        let target = request.target_triple();
        assert_eq!(target.iso, 400);
        assert_eq!(target.aperture, 4.0);
        assert_eq!(target.shutter, base().shutter);
    }

    #[test]
    #[should_panic(expected = "must supply")]
    fn test_mismatched_targets_panic() {
        let _ = SolveRequest::new(
            base(),
            ParameterKind::Shutter,
            [ExposureValue::ShutterSpeed(0.01), ExposureValue::Iso(200)],
            IncrementStep::Full,
            0.0,
        );
    }

    #[test]
    fn test_compensation_limits() {
        let ok = SolveRequest::from_target_triple(base(), base(), ParameterKind::Iso, IncrementStep::Full, -5.0);
        assert!(ok.is_ok());

        let err = SolveRequest::from_target_triple(base(), base(), ParameterKind::Iso, IncrementStep::Full, 5.5)
            .unwrap_err();
        assert_eq!(err.code(), "E004_EV_OUT_OF_RANGE");
    }
}
