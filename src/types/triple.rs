//! Shutter / aperture / ISO triples

use serde::{Deserialize, Serialize};

use crate::types::{ExposureValue, ParameterKind};

/// A complete exposure: one value per parameter kind.
///
/// The slot's kind is carried by the field, not by the value: `get` and
/// `with` convert to and from the tagged [`ExposureValue`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposureTriple {
    /// Seconds
    pub shutter: f64,
    /// f-number
    pub aperture: f64,
    /// ISO
    pub iso: u32,
}

impl ExposureTriple {
    pub fn new(shutter: f64, aperture: f64, iso: u32) -> Self {
        Self { shutter, aperture, iso }
    }

    /// Value held for `kind`
    pub fn get(&self, kind: ParameterKind) -> ExposureValue {
        match kind {
            ParameterKind::Shutter => ExposureValue::ShutterSpeed(self.shutter),
            ParameterKind::Aperture => ExposureValue::Aperture(self.aperture),
            ParameterKind::Iso => ExposureValue::Iso(self.iso),
        }
    }

    /// Copy with one slot replaced
    pub fn with(mut self, value: ExposureValue) -> Self {
        match value {
            ExposureValue::ShutterSpeed(seconds) => self.shutter = seconds,
            ExposureValue::Aperture(f_number) => self.aperture = f_number,
            ExposureValue::Iso(sensitivity) => self.iso = sensitivity,
        }
        self
    }

    pub fn values(&self) -> [ExposureValue; 3] {
        ParameterKind::ALL.map(|kind| self.get(kind))
    }

    /// Signed sum of every slot's exposure contribution.
    ///
    /// Two triples are equivalent exposures when their totals match.
    pub fn total_stops(&self) -> f64 {
        self.values().iter().map(ExposureValue::exposure_stops).sum()
    }

    /// Exposure value normalised to ISO 100: log2(N^2 / t) - log2(ISO / 100)
    pub fn ev100(&self) -> f64 {
        (self.aperture * self.aperture / self.shutter).log2() - (self.iso as f64 / 100.0).log2()
    }
}

impl std::fmt::Display for ExposureTriple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [shutter, aperture, iso] = self.values();
        write!(f, "{} @ {} ISO {}", shutter, aperture, iso)
    }
}
