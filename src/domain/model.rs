use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which geometric-sequence quantity is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// `a + a*r + ... + a*r^(n-1)`
    Sum,
    /// `a * r^(n-1)`
    Term,
}

impl Operation {
    pub const ALL: [Operation; 2] = [Operation::Sum, Operation::Term];

    /// Short notation used in result lines, `S(n)` or `T(n)`.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Sum => "S",
            Operation::Term => "T",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Sum => "sum",
            Operation::Term => "term",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Iterative,
    Recursive,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::Iterative, Strategy::Recursive];

    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Iterative => "Iterative",
            Strategy::Recursive => "Recursive",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Operations requested for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OperationSelection {
    Sum,
    Term,
    #[default]
    Both,
}

impl OperationSelection {
    pub fn operations(&self) -> Vec<Operation> {
        match self {
            OperationSelection::Sum => vec![Operation::Sum],
            OperationSelection::Term => vec![Operation::Term],
            OperationSelection::Both => Operation::ALL.to_vec(),
        }
    }
}

/// First term, common ratio and length/index of a geometric sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceParams {
    pub a: BigInt,
    pub r: BigInt,
    pub n: u64,
}

impl SequenceParams {
    pub fn new(a: impl Into<BigInt>, r: impl Into<BigInt>, n: u64) -> Self {
        Self {
            a: a.into(),
            r: r.into(),
            n,
        }
    }

    /// Same `a` and `r`, different length.
    pub fn with_n(&self, n: u64) -> Self {
        Self {
            a: self.a.clone(),
            r: self.r.clone(),
            n,
        }
    }
}

/// Output of one timed evaluator call.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub value: BigInt,
    pub elapsed_ms: f64,
}

/// Per-size timings of both strategies for one operation.
///
/// The three vectors are index-aligned: `inputs[i]` was measured as
/// `iterative_times[i]` and `recursive_times[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingSeries {
    pub operation: Operation,
    pub inputs: Vec<u64>,
    pub iterative_times: Vec<f64>,
    pub recursive_times: Vec<f64>,
}

impl TimingSeries {
    pub fn with_capacity(operation: Operation, capacity: usize) -> Self {
        Self {
            operation,
            inputs: Vec::with_capacity(capacity),
            iterative_times: Vec::with_capacity(capacity),
            recursive_times: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, n: u64, iterative_ms: f64, recursive_ms: f64) {
        self.inputs.push(n);
        self.iterative_times.push(iterative_ms);
        self.recursive_times.push(recursive_ms);
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = (u64, f64, f64)> + '_ {
        self.inputs
            .iter()
            .zip(self.iterative_times.iter())
            .zip(self.recursive_times.iter())
            .map(|((n, it), rec)| (*n, *it, *rec))
    }
}

/// One cell of a single run: operation × strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyResult {
    pub operation: Operation,
    pub strategy: Strategy,
    pub result: EvaluationResult,
}

/// Results of evaluating every requested operation once with both strategies.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleRunReport {
    pub params: SequenceParams,
    pub results: Vec<StrategyResult>,
}

impl SingleRunReport {
    pub fn get(&self, operation: Operation, strategy: Strategy) -> Option<&EvaluationResult> {
        self.results
            .iter()
            .find(|r| r.operation == operation && r.strategy == strategy)
            .map(|r| &r.result)
    }

    pub fn operations(&self) -> Vec<Operation> {
        let mut ops: Vec<Operation> = Vec::new();
        for r in &self.results {
            if !ops.contains(&r.operation) {
                ops.push(r.operation);
            }
        }
        ops
    }
}

/// Series generation progress handed to the caller after each measured size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesProgress {
    pub operation: Operation,
    pub completed: u64,
    pub total: u64,
}

impl SeriesProgress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    pub fn is_done(&self) -> bool {
        self.completed >= self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_expands_to_operations() {
        assert_eq!(OperationSelection::Both.operations(), vec![Operation::Sum, Operation::Term]);
        assert_eq!(OperationSelection::Term.operations(), vec![Operation::Term]);
    }

    #[test]
    fn test_series_rows_are_aligned() {
        let mut series = TimingSeries::with_capacity(Operation::Sum, 2);
        series.push(1, 0.5, 0.7);
        series.push(2, 0.6, 0.9);

        let rows: Vec<_> = series.rows().collect();
        assert_eq!(rows, vec![(1, 0.5, 0.7), (2, 0.6, 0.9)]);
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_progress_fraction() {
        let p = SeriesProgress {
            operation: Operation::Term,
            completed: 1,
            total: 4,
        };
        assert_eq!(p.fraction(), 0.25);
        assert!(!p.is_done());
    }
}
