//! Stop increment granularity

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::FormatError;

/// Spacing between adjacent marked values on a camera dial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncrementStep {
    /// 1 stop
    Full,
    /// 1/2 stop
    Half,
    /// 1/3 stop
    #[default]
    Third,
}

impl IncrementStep {
    pub const ALL: [IncrementStep; 3] = [Self::Full, Self::Half, Self::Third];

    /// Table entries per stop
    pub fn steps_per_stop(&self) -> u32 {
        match self {
            Self::Full => 1,
            Self::Half => 2,
            Self::Third => 3,
        }
    }

    /// Distance between adjacent entries, in stops
    pub fn spacing(&self) -> f64 {
        1.0 / self.steps_per_stop() as f64
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Half => "half",
            Self::Third => "third",
        }
    }
}

impl std::fmt::Display for IncrementStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for IncrementStep {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" | "1" => Ok(Self::Full),
            "half" | "1/2" => Ok(Self::Half),
            "third" | "1/3" => Ok(Self::Third),
            other => Err(FormatError::InvalidQuery(format!("unknown increment '{}'", other))),
        }
    }
}
