//! Core types for evsolve

mod value;
mod triple;
mod increment;
mod table;
mod request;
mod outcome;
mod error;

pub use value::{ParameterKind, ExposureValue};
pub use triple::ExposureTriple;
pub use increment::IncrementStep;
pub use table::{StopTable, StopEntry};
pub use request::SolveRequest;
pub use outcome::{Resolution, SolveOutcome, SolveReport};
pub use error::{FormatError, ClampError, RangeEdge, SolveError};
