//! Core modules for evsolve

pub mod value_parser;
pub mod stop_table;
pub mod rounding;
pub mod classifier;
pub mod solver;
pub mod query;
pub mod config;
pub mod api;

pub use value_parser::{parse, format, parse_triple};
pub use stop_table::{generate, StopTableCache};
pub use rounding::round_and_clamp;
pub use solver::ExposureEngine;
pub use query::{ExposureQuery, BaseExposure, parse_query_line};
pub use config::{EngineConfig, ConfigError};
pub use api::{create_router, run_server};
