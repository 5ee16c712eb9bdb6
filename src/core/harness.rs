//! Wall-clock measurement of the evaluators.
//!
//! A series re-measures every size from scratch, so producing it costs
//! O(n²) evaluator work in total against O(n) for a single run. The
//! progress callback is invoked after each size and may stop the loop.

use crate::core::iterative::{iterative_sum, iterative_term};
use crate::core::recursive::{recursive_sum, recursive_term, RecursionLimit};
use crate::domain::model::{
    EvaluationResult, Operation, SequenceParams, SeriesProgress, SingleRunReport, Strategy,
    StrategyResult, TimingSeries,
};
use crate::utils::error::{GeoError, Result};
use num_bigint::BigInt;
use std::hint::black_box;
use std::time::Instant;

/// Dispatches an operation/strategy pair to the matching evaluator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    limit: RecursionLimit,
}

impl Evaluator {
    pub fn new(limit: RecursionLimit) -> Self {
        Self { limit }
    }

    pub fn recursion_limit(&self) -> RecursionLimit {
        self.limit
    }

    pub fn evaluate(
        &self,
        operation: Operation,
        strategy: Strategy,
        params: &SequenceParams,
    ) -> Result<BigInt> {
        let SequenceParams { a, r, n } = params;
        match (operation, strategy) {
            (Operation::Sum, Strategy::Iterative) => Ok(iterative_sum(a, r, *n)),
            (Operation::Term, Strategy::Iterative) => iterative_term(a, r, *n),
            (Operation::Sum, Strategy::Recursive) => recursive_sum(a, r, *n, self.limit),
            (Operation::Term, Strategy::Recursive) => recursive_term(a, r, *n, self.limit),
        }
    }
}

/// Times a single call of `f`. Only the call itself is inside the clock window.
pub fn measure<F>(f: F, params: &SequenceParams) -> Result<EvaluationResult>
where
    F: FnOnce(&SequenceParams) -> Result<BigInt>,
{
    let start = Instant::now();
    let outcome = f(black_box(params));
    let elapsed = start.elapsed();

    let value = outcome?;
    Ok(EvaluationResult {
        value,
        elapsed_ms: elapsed.as_secs_f64() * 1000.0,
    })
}

/// Evaluates each operation once per strategy at `params.n`.
pub fn run_single(
    evaluator: &Evaluator,
    operations: &[Operation],
    params: &SequenceParams,
) -> Result<SingleRunReport> {
    let mut results = Vec::with_capacity(operations.len() * Strategy::ALL.len());

    for &operation in operations {
        for strategy in Strategy::ALL {
            let result = measure(|p| evaluator.evaluate(operation, strategy, p), params)?;
            tracing::debug!(
                "{} {}({}) took {:.6} ms",
                strategy,
                operation.symbol(),
                params.n,
                result.elapsed_ms
            );
            results.push(StrategyResult {
                operation,
                strategy,
                result,
            });
        }
    }

    Ok(SingleRunReport {
        params: params.clone(),
        results,
    })
}

/// Measures both strategies for every size `1..=params.n`.
///
/// `on_progress` sees a strictly increasing `completed` count ending at
/// `total`. Returning `false` before the last size stops the loop with
/// [`GeoError::Cancelled`].
pub fn measure_series(
    evaluator: &Evaluator,
    operation: Operation,
    params: &SequenceParams,
    on_progress: &mut dyn FnMut(SeriesProgress) -> bool,
) -> Result<TimingSeries> {
    let total = params.n;
    let mut series = TimingSeries::with_capacity(operation, total as usize);

    for k in 1..=total {
        let sized = params.with_n(k);

        let iterative = measure(|p| evaluator.evaluate(operation, Strategy::Iterative, p), &sized)?;
        let recursive = measure(|p| evaluator.evaluate(operation, Strategy::Recursive, p), &sized)?;
        black_box(&iterative.value);
        black_box(&recursive.value);

        series.push(k, iterative.elapsed_ms, recursive.elapsed_ms);

        let keep_going = on_progress(SeriesProgress {
            operation,
            completed: k,
            total,
        });
        if !keep_going && k < total {
            tracing::info!("⏹️ {} series cancelled at n = {} of {}", operation, k, total);
            return Err(GeoError::Cancelled {
                completed: k,
                total,
            });
        }
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_reports_value_and_nonnegative_time() {
        let params = SequenceParams::new(2, 3, 3);
        let evaluator = Evaluator::default();
        let result = measure(|p| evaluator.evaluate(Operation::Sum, Strategy::Iterative, p), &params)
            .unwrap();
        assert_eq!(result.value, BigInt::from(26));
        assert!(result.elapsed_ms >= 0.0);
    }

    #[test]
    fn test_measure_propagates_evaluator_error() {
        let params = SequenceParams::new(1, 2, 20);
        let evaluator = Evaluator::new(RecursionLimit::new(5));
        let err = measure(|p| evaluator.evaluate(Operation::Term, Strategy::Recursive, p), &params)
            .unwrap_err();
        assert!(matches!(err, GeoError::RecursionLimitExceeded { .. }));
    }

    #[test]
    fn test_single_run_covers_every_cell() {
        let params = SequenceParams::new(2, 3, 3);
        let report = run_single(&Evaluator::default(), &Operation::ALL, &params).unwrap();

        assert_eq!(report.results.len(), 4);
        for strategy in Strategy::ALL {
            assert_eq!(report.get(Operation::Sum, strategy).unwrap().value, BigInt::from(26));
            assert_eq!(report.get(Operation::Term, strategy).unwrap().value, BigInt::from(18));
        }
    }

    #[test]
    fn test_series_length_and_inputs() {
        let params = SequenceParams::new(1, 2, 12);
        let series =
            measure_series(&Evaluator::default(), Operation::Sum, &params, &mut |_| true).unwrap();

        assert_eq!(series.len(), 12);
        assert_eq!(series.iterative_times.len(), 12);
        assert_eq!(series.recursive_times.len(), 12);
        assert_eq!(series.inputs, (1..=12).collect::<Vec<u64>>());
    }

    #[test]
    fn test_series_progress_is_monotonic() {
        let params = SequenceParams::new(3, 2, 8);
        let mut seen = Vec::new();
        measure_series(&Evaluator::default(), Operation::Term, &params, &mut |p| {
            seen.push(p.fraction());
            true
        })
        .unwrap();

        assert_eq!(seen.len(), 8);
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(*seen.last().unwrap(), 1.0);
    }

    #[test]
    fn test_series_can_be_cancelled() {
        let params = SequenceParams::new(1, 2, 10);
        let mut calls = 0;
        let err = measure_series(&Evaluator::default(), Operation::Sum, &params, &mut |p| {
            calls += 1;
            p.completed < 4
        })
        .unwrap_err();

        assert_eq!(calls, 4);
        match err {
            GeoError::Cancelled { completed, total } => {
                assert_eq!(completed, 4);
                assert_eq!(total, 10);
            }
            other => panic!("expected cancellation, got {:?}", other),
        }
    }

    #[test]
    fn test_series_hits_recursion_limit() {
        let params = SequenceParams::new(1, 1, 30);
        let evaluator = Evaluator::new(RecursionLimit::new(10));
        let err =
            measure_series(&evaluator, Operation::Sum, &params, &mut |_| true).unwrap_err();
        assert!(matches!(err, GeoError::RecursionLimitExceeded { depth: 11, limit: 10 }));
    }
}
