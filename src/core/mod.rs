pub mod engine;
pub mod harness;
pub mod iterative;
pub mod recursive;
pub mod report;

pub use crate::domain::model::{
    EvaluationResult, Operation, SequenceParams, SeriesProgress, SingleRunReport, Strategy,
    TimingSeries,
};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
