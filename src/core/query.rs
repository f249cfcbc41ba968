//! Text query layer
//!
//! Turns caller text (JSON bodies, CLI flags, one-line queries) into a
//! validated [`SolveRequest`]. Line syntax:
//!
//! ```text
//! solve=shutter base=1/125,f/8,100 aperture=f/2.8 iso=100 step=full ev=+1
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::value_parser::{parse, parse_triple};
use crate::types::{ExposureTriple, FormatError, IncrementStep, ParameterKind, SolveRequest};

lazy_static! {
    /// key=value, value runs to the next whitespace
    static ref RE_QUERY_TOKEN: Regex = Regex::new(r"^([A-Za-z_]+)=(\S+)$").unwrap();
}

/// Base triple as text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseExposure {
    pub shutter: String,
    pub aperture: String,
    pub iso: String,
}

impl BaseExposure {
    /// Split "<shutter>,<aperture>,<iso>"
    pub fn from_list(value: &str) -> Result<Self, FormatError> {
        let parts: Vec<&str> = value.split(',').map(str::trim).collect();
        match parts.as_slice() {
            [shutter, aperture, iso] => Ok(Self {
                shutter: shutter.to_string(),
                aperture: aperture.to_string(),
                iso: iso.to_string(),
            }),
            _ => Err(FormatError::InvalidQuery(format!(
                "base must be <shutter>,<aperture>,<iso>, got '{}'",
                value
            ))),
        }
    }

    pub fn parse(&self) -> Result<ExposureTriple, FormatError> {
        parse_triple(&self.shutter, &self.aperture, &self.iso)
    }
}

/// Textual solve request.
///
/// The field named by `solve_for` may be absent; the other two are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureQuery {
    pub base: BaseExposure,
    pub solve_for: ParameterKind,
    #[serde(default)]
    pub shutter: Option<String>,
    #[serde(default)]
    pub aperture: Option<String>,
    #[serde(default)]
    pub iso: Option<String>,
    #[serde(default)]
    pub increment: Option<IncrementStep>,
    #[serde(default)]
    pub ev_compensation: f64,
}

impl ExposureQuery {
    fn target_text(&self, kind: ParameterKind) -> Option<&str> {
        let text = match kind {
            ParameterKind::Shutter => self.shutter.as_deref(),
            ParameterKind::Aperture => self.aperture.as_deref(),
            ParameterKind::Iso => self.iso.as_deref(),
        };
        text.filter(|t| !t.trim().is_empty())
    }

    /// Parse every value and build the request
    pub fn to_request(&self, default_increment: IncrementStep) -> Result<SolveRequest, FormatError> {
        let base = self.base.parse()?;
        let [first, second] = self.solve_for.others();
        let target = |kind: ParameterKind| {
            self.target_text(kind)
                .ok_or(FormatError::Missing { parameter: kind })
                .and_then(|text| parse(text, kind))
        };
        let targets = [target(first)?, target(second)?];
        SolveRequest::new(
            base,
            self.solve_for,
            targets,
            self.increment.unwrap_or(default_increment),
            self.ev_compensation,
        )
    }
}

/// Parse a one-line query such as
/// `solve=iso base=1/125,f/8,100 shutter=1/500 aperture=f/8 ev=1`
pub fn parse_query_line(line: &str) -> Result<ExposureQuery, FormatError> {
    let mut solve_for = None;
    let mut base = None;
    let mut query_targets: [Option<String>; 3] = [None, None, None];
    let mut increment = None;
    let mut ev_compensation = 0.0;

    for token in line.split_whitespace() {
        let caps = RE_QUERY_TOKEN
            .captures(token)
            .ok_or_else(|| FormatError::InvalidQuery(format!("expected key=value, got '{}'", token)))?;
        let key = caps[1].to_ascii_lowercase();
        let value = caps[2].to_string();

        match key.as_str() {
            "solve" | "solve_for" => solve_for = Some(value.parse::<ParameterKind>()?),
            "base" => base = Some(BaseExposure::from_list(&value)?),
            "shutter" => query_targets[0] = Some(value),
            "aperture" => query_targets[1] = Some(value),
            "iso" => query_targets[2] = Some(value),
            "step" | "increment" => increment = Some(value.parse::<IncrementStep>()?),
            "ev" => {
                ev_compensation = value
                    .parse::<f64>()
                    .map_err(|_| FormatError::InvalidQuery(format!("ev must be a number, got '{}'", value)))?
            }
            other => return Err(FormatError::InvalidQuery(format!("unknown key '{}'", other))),
        }
    }

    let solve_for = solve_for.ok_or_else(|| FormatError::InvalidQuery("missing solve=<kind>".to_string()))?;
    let base = base.ok_or_else(|| FormatError::InvalidQuery("missing base=<shutter>,<aperture>,<iso>".to_string()))?;
    let [shutter, aperture, iso] = query_targets;

    Ok(ExposureQuery { base, solve_for, shutter, aperture, iso, increment, ev_compensation })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExposureValue;
    use pretty_assertions::assert_eq;

    fn query(solve_for: ParameterKind) -> ExposureQuery {
        ExposureQuery {
            base: BaseExposure {
                shutter: "1/125".to_string(),
                aperture: "f/8".to_string(),
                iso: "100".to_string(),
            },
            solve_for,
            shutter: None,
            aperture: Some("f/2.8".to_string()),
            iso: Some("100".to_string()),
            increment: None,
            ev_compensation: 0.0,
        }
    }

    #[test]
    fn test_to_request_uses_default_increment() {
        let request = query(ParameterKind::Shutter).to_request(IncrementStep::Half).unwrap();
        assert_eq!(request.increment, IncrementStep::Half);
        assert_eq!(request.targets, [ExposureValue::Aperture(2.8), ExposureValue::Iso(100)]);
    }

    #[test]
    fn test_missing_target_is_reported() {
        let mut q = query(ParameterKind::Shutter);
        q.iso = Some("  ".to_string());
        let err = q.to_request(IncrementStep::Third).unwrap_err();
        assert_eq!(err, FormatError::Missing { parameter: ParameterKind::Iso });
    }

    #[test]
    fn test_solved_field_is_ignored() {
        let mut q = query(ParameterKind::Shutter);
        q.shutter = Some("garbage".to_string());
        assert!(q.to_request(IncrementStep::Third).is_ok());
    }

    #[test]
    fn test_parse_query_line() {
        let q = parse_query_line("solve=iso base=1/125,f/8,100 shutter=1/500 aperture=f/8 step=full ev=+1").unwrap();
        assert_eq!(q.solve_for, ParameterKind::Iso);
        assert_eq!(q.base.shutter, "1/125");
        assert_eq!(q.shutter.as_deref(), Some("1/500"));
        assert_eq!(q.aperture.as_deref(), Some("f/8"));
        assert_eq!(q.iso, None);
        assert_eq!(q.increment, Some(IncrementStep::Full));
        assert_eq!(q.ev_compensation, 1.0);
    }

    #[test]
    fn test_parse_query_line_seconds_mark() {
        let q = parse_query_line(r#"solve=shutter base=30",f/1.4,100 aperture=f/22 iso=25"#).unwrap();
        assert_eq!(q.base.shutter, "30\"");
    }

    #[test]
    fn test_parse_query_line_errors() {
        assert!(matches!(parse_query_line("base=1/125,f/8,100"), Err(FormatError::InvalidQuery(_))));
        assert!(matches!(parse_query_line("solve=iso"), Err(FormatError::InvalidQuery(_))));
        assert!(matches!(parse_query_line("solve=iso base=1/125,f/8"), Err(FormatError::InvalidQuery(_))));
        assert!(matches!(parse_query_line("solve=iso base=1/125,f/8,100 zoom=2"), Err(FormatError::InvalidQuery(_))));
        assert!(matches!(parse_query_line("solve=iso base=1/125,f/8,100 ev=lots"), Err(FormatError::InvalidQuery(_))));
        assert!(matches!(parse_query_line("solve iso"), Err(FormatError::InvalidQuery(_))));
    }
}
