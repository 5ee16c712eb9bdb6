pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::storage::LocalStorage;
pub use config::{toml_config::TomlConfig, RunConfig};
pub use crate::core::{
    engine::{BenchEngine, RunSummary},
    harness::{measure, measure_series, run_single, Evaluator},
    iterative::{iterative_sum, iterative_term},
    recursive::{on_recursion_stack, recursive_sum, recursive_term, RecursionLimit},
};
pub use domain::model::{
    EvaluationResult, Operation, OperationSelection, SequenceParams, SeriesProgress,
    SingleRunReport, Strategy, TimingSeries,
};
pub use utils::error::{GeoError, Result};
