//! Error taxonomy for parsing, clamping and solving

use serde_json::{json, Value};
use thiserror::Error;

use crate::types::{ExposureValue, ParameterKind};

/// Textual input could not be turned into a usable value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("Invalid {parameter} format: '{input}'")]
    Malformed { parameter: ParameterKind, input: String },

    #[error("The {parameter} value '{input}' is outside the accepted range")]
    OutOfRange { parameter: ParameterKind, input: String },

    #[error("A target {parameter} value is required")]
    Missing { parameter: ParameterKind },

    #[error("EV compensation {value} is outside the accepted range of ±{limit}")]
    CompensationOutOfRange { value: f64, limit: f64 },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl FormatError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Malformed { .. } => "E001_MALFORMED",
            Self::OutOfRange { .. } => "E002_OUT_OF_RANGE",
            Self::Missing { .. } => "E003_MISSING",
            Self::CompensationOutOfRange { .. } => "E004_EV_OUT_OF_RANGE",
            Self::InvalidQuery(_) => "E005_INVALID_QUERY",
        }
    }

    fn details(&self) -> Value {
        match self {
            Self::Malformed { parameter, input } | Self::OutOfRange { parameter, input } => {
                json!({ "parameter": parameter.key(), "input": input })
            }
            Self::Missing { parameter } => json!({ "parameter": parameter.key() }),
            Self::CompensationOutOfRange { value, limit } => json!({ "value": value, "limit": limit }),
            Self::InvalidQuery(message) => json!({ "message": message }),
        }
    }
}

/// Which end of a stop table a value fell past
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEdge {
    /// Beyond the highest stop position
    Above,
    /// Beyond the lowest stop position
    Below,
}

impl std::fmt::Display for RangeEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeEdge::Above => write!(f, "above"),
            RangeEdge::Below => write!(f, "below"),
        }
    }
}

/// A raw value could not be snapped onto a stop table
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClampError {
    #[error("{kind} value {requested} lies {excess_stops:.2} stops {edge} the table (closest: {nearest})")]
    OutOfRange {
        kind: ParameterKind,
        requested: f64,
        nearest: ExposureValue,
        excess_stops: f64,
        edge: RangeEdge,
    },

    #[error("{kind} value {requested} is not a positive finite number")]
    NotRepresentable { kind: ParameterKind, requested: f64 },
}

/// Failure of a solve call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Image will be overexposed by approximately {stops_overexposed:.1} stops")]
    Overexposed { stops_overexposed: f64 },

    #[error("Image will be underexposed by approximately {stops_underexposed:.1} stops")]
    Underexposed { stops_underexposed: f64 },

    #[error("The requested {parameter_name} ({requested_value}) exceeds available limits. The closest available value is {available_limit}.")]
    ParameterLimit {
        parameter_name: String,
        requested_value: String,
        available_limit: String,
    },
}

impl SolveError {
    /// Stable code for logs and API clients
    pub fn code(&self) -> &'static str {
        match self {
            Self::Format(e) => e.code(),
            Self::Overexposed { .. } => "E010_OVEREXPOSED",
            Self::Underexposed { .. } => "E011_UNDEREXPOSED",
            Self::ParameterLimit { .. } => "E020_PARAMETER_LIMIT",
        }
    }

    /// Structured payload so callers can build their own message
    pub fn details(&self) -> Value {
        match self {
            Self::Format(e) => e.details(),
            Self::Overexposed { stops_overexposed } => json!({ "stops_overexposed": stops_overexposed }),
            Self::Underexposed { stops_underexposed } => json!({ "stops_underexposed": stops_underexposed }),
            Self::ParameterLimit { parameter_name, requested_value, available_limit } => json!({
                "parameter_name": parameter_name,
                "requested_value": requested_value,
                "available_limit": available_limit,
            }),
        }
    }

    /// Input problems the caller fixes by re-entering a value
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exposure_messages_use_one_decimal() {
        let over = SolveError::Overexposed { stops_overexposed: 2.345 };
        assert_eq!(over.to_string(), "Image will be overexposed by approximately 2.3 stops");

        let under = SolveError::Underexposed { stops_underexposed: 0.96 };
        assert_eq!(under.to_string(), "Image will be underexposed by approximately 1.0 stops");
    }

    #[test]
    fn test_parameter_limit_message() {
        let err = SolveError::ParameterLimit {
            parameter_name: "aperture".to_string(),
            requested_value: "f/0.7".to_string(),
            available_limit: "f/1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "The requested aperture (f/0.7) exceeds available limits. The closest available value is f/1."
        );
        assert_eq!(err.details()["available_limit"], "f/1");
    }

    #[test]
    fn test_format_error_passes_through() {
        let err: SolveError = FormatError::Missing { parameter: ParameterKind::Iso }.into();
        assert!(err.is_format());
        assert_eq!(err.code(), "E003_MISSING");
        assert_eq!(err.to_string(), "A target ISO value is required");
    }
}
