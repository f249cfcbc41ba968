//! evsolve: exposure equivalence engine
//!
//! Parses photographic notations, builds stop tables and solves for the
//! shutter speed, aperture or ISO that keeps a shot equivalently exposed.

pub mod core;
pub mod types;

// =============================================================================
// ROUNDING & CLAMPING
// =============================================================================

/// Grace window (stops) beyond a table edge that still snaps to the edge
pub const CLAMP_TOLERANCE_STOPS: f64 = 0.05;

/// Absorbs float noise when comparing stop positions
pub const STOP_EPSILON: f64 = 1e-9;

/// EV compensation accepted in either direction (stops)
pub const EV_COMPENSATION_LIMIT: f64 = 5.0;

// =============================================================================
// PARSER BOUNDS
// =============================================================================

/// Lowest ISO accepted by the parser
pub const ISO_MIN: u32 = 25;

/// Highest ISO accepted by the parser
pub const ISO_MAX: u32 = 102_400;

/// Shutter speeds shorter than this are written as "1/N", longer as `S"`
pub const FRACTION_NOTATION_LIMIT_SECS: f64 = 0.3;

// =============================================================================
// STOP TABLE GRID
// Ideal stop positions relative to each kind's anchor (1 s, f/1, ISO 25)
// =============================================================================

/// Fastest shutter: 2^-13 s (marked 1/8000)
pub const SHUTTER_MIN_STOP: i32 = -13;
/// Slowest shutter: 2^5 s (marked 30")
pub const SHUTTER_MAX_STOP: i32 = 5;

/// Widest aperture: f/1
pub const APERTURE_MIN_STOP: i32 = 0;
/// Smallest aperture: f/64
pub const APERTURE_MAX_STOP: i32 = 12;

/// ISO 25
pub const ISO_MIN_STOP: i32 = 0;
/// ISO 102400
pub const ISO_MAX_STOP: i32 = 12;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
