//! Exposure parameter kinds and tagged exposure values

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::FormatError;

/// The three parameters of an exposure triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    /// Shutter speed in seconds
    #[serde(alias = "shutter_speed")]
    Shutter,
    /// Aperture as f-number
    #[serde(alias = "f_stop", alias = "fstop")]
    Aperture,
    /// ISO sensitivity
    Iso,
}

impl ParameterKind {
    pub const ALL: [ParameterKind; 3] = [Self::Shutter, Self::Aperture, Self::Iso];

    /// Human-readable name used in error messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Shutter => "shutter speed",
            Self::Aperture => "aperture",
            Self::Iso => "ISO",
        }
    }

    /// Short identifier used on the command line and in URLs
    pub fn key(&self) -> &'static str {
        match self {
            Self::Shutter => "shutter",
            Self::Aperture => "aperture",
            Self::Iso => "iso",
        }
    }

    /// +1 when raising this parameter's stops adds light, -1 when it removes light.
    ///
    /// A larger f-number closes the lens, so aperture stops count against exposure.
    pub fn exposure_sign(&self) -> f64 {
        match self {
            Self::Shutter | Self::Iso => 1.0,
            Self::Aperture => -1.0,
        }
    }

    /// Stop position of a native value (seconds, f-number or ISO)
    pub fn stops_of(&self, native: f64) -> f64 {
        match self {
            Self::Shutter | Self::Iso => native.log2(),
            Self::Aperture => 2.0 * native.log2(),
        }
    }

    /// Native value at a stop position
    pub fn native_from_stops(&self, stops: f64) -> f64 {
        match self {
            Self::Shutter | Self::Iso => stops.exp2(),
            Self::Aperture => (stops / 2.0).exp2(),
        }
    }

    /// The two kinds that are not `self`, in canonical order
    pub fn others(&self) -> [ParameterKind; 2] {
        match self {
            Self::Shutter => [Self::Aperture, Self::Iso],
            Self::Aperture => [Self::Shutter, Self::Iso],
            Self::Iso => [Self::Shutter, Self::Aperture],
        }
    }
}

impl std::fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for ParameterKind {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shutter" | "shutter_speed" | "shutterspeed" | "speed" => Ok(Self::Shutter),
            "aperture" | "fstop" | "f_stop" | "f" => Ok(Self::Aperture),
            "iso" => Ok(Self::Iso),
            other => Err(FormatError::InvalidQuery(format!("unknown parameter '{}'", other))),
        }
    }
}

/// One exposure parameter with its canonical numeric payload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ExposureValue {
    /// Exposure duration in seconds (> 0)
    ShutterSpeed(f64),
    /// f-number (> 0)
    Aperture(f64),
    /// ISO sensitivity (> 0)
    Iso(u32),
}

impl ExposureValue {
    /// Build a value of `kind` from a native number. ISO is rounded to an integer.
    pub fn from_native(kind: ParameterKind, native: f64) -> Self {
        match kind {
            ParameterKind::Shutter => Self::ShutterSpeed(native),
            ParameterKind::Aperture => Self::Aperture(native),
            ParameterKind::Iso => Self::Iso(native.round().max(1.0) as u32),
        }
    }

    pub fn kind(&self) -> ParameterKind {
        match self {
            Self::ShutterSpeed(_) => ParameterKind::Shutter,
            Self::Aperture(_) => ParameterKind::Aperture,
            Self::Iso(_) => ParameterKind::Iso,
        }
    }

    /// Seconds, f-number or ISO as a float
    pub fn native(&self) -> f64 {
        match *self {
            Self::ShutterSpeed(seconds) => seconds,
            Self::Aperture(f_number) => f_number,
            Self::Iso(sensitivity) => sensitivity as f64,
        }
    }

    /// Position in the kind's own stop-space
    pub fn stops(&self) -> f64 {
        self.kind().stops_of(self.native())
    }

    /// Contribution to total exposure, in stops
    pub fn exposure_stops(&self) -> f64 {
        self.kind().exposure_sign() * self.stops()
    }
}

impl std::fmt::Display for ExposureValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::core::value_parser::format(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_space_conversions() {
        assert!((ExposureValue::ShutterSpeed(0.5).stops() + 1.0).abs() < 1e-12);
        assert!((ExposureValue::Aperture(4.0).stops() - 4.0).abs() < 1e-12);
        assert!((ExposureValue::Iso(400).stops() - 400f64.log2()).abs() < 1e-12);
    }

    #[test]
    fn test_native_round_trip_through_stops() {
        for kind in ParameterKind::ALL {
            let native = 5.6;
            let back = kind.native_from_stops(kind.stops_of(native));
            assert!((back - native).abs() < 1e-9, "{:?}", kind);
        }
    }

    #[test]
    fn test_aperture_counts_against_exposure() {
        let wide = ExposureValue::Aperture(2.0);
        let narrow = ExposureValue::Aperture(4.0);
        assert!(wide.exposure_stops() > narrow.exposure_stops());
    }

    #[test]
    fn test_others_excludes_self() {
        for kind in ParameterKind::ALL {
            let others = kind.others();
            assert!(!others.contains(&kind));
            assert_ne!(others[0], others[1]);
        }
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("Shutter".parse::<ParameterKind>().unwrap(), ParameterKind::Shutter);
        assert_eq!("f_stop".parse::<ParameterKind>().unwrap(), ParameterKind::Aperture);
        assert_eq!("ISO".parse::<ParameterKind>().unwrap(), ParameterKind::Iso);
        assert!("focus".parse::<ParameterKind>().is_err());
    }
}
