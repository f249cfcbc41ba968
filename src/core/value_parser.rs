//! Value parser: photographic notations <-> canonical numbers
//!
//! Shutter: "1/125", `30"`, "2.5" (seconds)
//! Aperture: "f/2.8", "2.8"
//! ISO: "400" (25..=102400)

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::{ExposureTriple, ExposureValue, FormatError, ParameterKind};
use crate::{FRACTION_NOTATION_LIMIT_SECS, ISO_MAX, ISO_MIN};

lazy_static! {
    /// "1/N" with N integer or decimal
    static ref RE_SHUTTER_FRACTION: Regex = Regex::new(r"^1/(\d+(?:\.\d+)?|\.\d+)$").unwrap();

    /// S" (seconds mark)
    static ref RE_SHUTTER_SECONDS: Regex = Regex::new(r#"^(\d+(?:\.\d+)?|\.\d+)"$"#).unwrap();

    /// Bare unsigned decimal
    static ref RE_DECIMAL: Regex = Regex::new(r"^(\d+(?:\.\d+)?|\.\d+)$").unwrap();

    /// "f/N" or bare N; the prefix is case-insensitive
    static ref RE_APERTURE: Regex = Regex::new(r"^(?:[fF]/)?(\d+(?:\.\d+)?|\.\d+)$").unwrap();

    /// Digits only, no "ISO" prefix
    static ref RE_ISO: Regex = Regex::new(r"^\d+$").unwrap();
}

/// Parse `text` as a value of `kind`
pub fn parse(text: &str, kind: ParameterKind) -> Result<ExposureValue, FormatError> {
    let text = text.trim();
    match kind {
        ParameterKind::Shutter => parse_shutter(text),
        ParameterKind::Aperture => parse_aperture(text),
        ParameterKind::Iso => parse_iso(text),
    }
}

/// Canonical notation of a value
pub fn format(value: &ExposureValue) -> String {
    match *value {
        ExposureValue::ShutterSpeed(seconds) => format_shutter(seconds),
        ExposureValue::Aperture(f_number) => format_aperture(f_number),
        ExposureValue::Iso(sensitivity) => sensitivity.to_string(),
    }
}

/// Parse three strings into a triple
pub fn parse_triple(shutter: &str, aperture: &str, iso: &str) -> Result<ExposureTriple, FormatError> {
    let shutter = parse(shutter, ParameterKind::Shutter)?;
    let aperture = parse(aperture, ParameterKind::Aperture)?;
    let iso = parse_sensitivity(iso.trim())?;
    Ok(ExposureTriple::new(shutter.native(), aperture.native(), iso))
}

fn parse_shutter(text: &str) -> Result<ExposureValue, FormatError> {
    let kind = ParameterKind::Shutter;
    let seconds = if let Some(caps) = RE_SHUTTER_FRACTION.captures(text) {
        let denominator = number(&caps[1], kind, text)?;
        if denominator <= 0.0 {
            return Err(out_of_range(kind, text));
        }
        1.0 / denominator
    } else if let Some(caps) = RE_SHUTTER_SECONDS.captures(text) {
        number(&caps[1], kind, text)?
    } else if RE_DECIMAL.is_match(text) {
        number(text, kind, text)?
    } else {
        return Err(malformed(kind, text));
    };

    if seconds <= 0.0 || !seconds.is_finite() {
        return Err(out_of_range(kind, text));
    }
    Ok(ExposureValue::ShutterSpeed(seconds))
}

fn parse_aperture(text: &str) -> Result<ExposureValue, FormatError> {
    let kind = ParameterKind::Aperture;
    let caps = RE_APERTURE.captures(text).ok_or_else(|| malformed(kind, text))?;
    let f_number = number(&caps[1], kind, text)?;
    if f_number <= 0.0 || !f_number.is_finite() {
        return Err(out_of_range(kind, text));
    }
    Ok(ExposureValue::Aperture(f_number))
}

fn parse_iso(text: &str) -> Result<ExposureValue, FormatError> {
    parse_sensitivity(text).map(ExposureValue::Iso)
}

fn parse_sensitivity(text: &str) -> Result<u32, FormatError> {
    let kind = ParameterKind::Iso;
    if !RE_ISO.is_match(text) {
        return Err(malformed(kind, text));
    }
    // All-digit strings only fail to parse on overflow
    let sensitivity: u32 = text.parse().map_err(|_| out_of_range(kind, text))?;
    if !(ISO_MIN..=ISO_MAX).contains(&sensitivity) {
        return Err(out_of_range(kind, text));
    }
    Ok(sensitivity)
}

/// Short dial notation when it parses back exactly, otherwise the closest
/// notation that does ("1/3" rather than 0.33")
fn format_shutter(seconds: f64) -> String {
    let value = ExposureValue::ShutterSpeed(seconds);
    let fraction = |denominator: String| format!("1/{}", denominator);
    let mark = |secs: String| format!("{}\"", secs);

    let candidates = if seconds < FRACTION_NOTATION_LIMIT_SECS - crate::STOP_EPSILON {
        [
            fraction(trim_decimal(1.0 / seconds, 1)),
            fraction((1.0 / seconds).to_string()),
            mark(seconds.to_string()),
        ]
    } else {
        [
            mark(trim_decimal(seconds, 2)),
            fraction(trim_decimal(1.0 / seconds, 1)),
            mark(seconds.to_string()),
        ]
    };
    first_exact(candidates, &value)
}

fn format_aperture(f_number: f64) -> String {
    let value = ExposureValue::Aperture(f_number);
    first_exact(
        [format!("f/{}", trim_decimal(f_number, 1)), format!("f/{}", f_number)],
        &value,
    )
}

/// First candidate that parses back to `value`; the last one is shortest
/// round-trip float text and always does
fn first_exact<const N: usize>(candidates: [String; N], value: &ExposureValue) -> String {
    let kind = value.kind();
    let mut candidates = candidates.into_iter().peekable();
    while let Some(text) = candidates.next() {
        if candidates.peek().is_none() || parse(&text, kind).as_ref() == Ok(value) {
            return text;
        }
    }
    String::new()
}

/// Fixed-point with at most `decimals` places, trailing zeros removed
fn trim_decimal(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value);
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

fn number(digits: &str, kind: ParameterKind, input: &str) -> Result<f64, FormatError> {
    digits.parse::<f64>().map_err(|_| malformed(kind, input))
}

fn malformed(parameter: ParameterKind, input: &str) -> FormatError {
    FormatError::Malformed { parameter, input: input.to_string() }
}

fn out_of_range(parameter: ParameterKind, input: &str) -> FormatError {
    FormatError::OutOfRange { parameter, input: input.to_string() }
}

// =============================================================================
// TESTS
// =============================================================================
