//! Self-referential evaluation.
//!
//! Every descent level is a real call frame, so measured times include call
//! overhead. Depth is checked against a [`RecursionLimit`] on entry to each
//! frame; crossing it returns [`GeoError::RecursionLimitExceeded`] instead of
//! overflowing the thread stack.
//!
//! The ceiling only holds if the calling thread has room for that many
//! frames. A default 2 MiB thread does not fit [`DEFAULT_RECURSION_LIMIT`];
//! run deep evaluations through [`on_recursion_stack`], which is what
//! `BenchEngine` does for every measurement.

use crate::utils::error::{GeoError, Result};
use num_bigint::BigInt;
use num_traits::Zero;
use std::thread;

pub const DEFAULT_RECURSION_LIMIT: u64 = 10_000;

/// Stack reserved per evaluator frame on a measurement thread.
pub const FRAME_STACK_BYTES: u64 = 1024;
pub const BASE_STACK_BYTES: u64 = 2 * 1024 * 1024;
pub const MAX_STACK_BYTES: u64 = 1024 * 1024 * 1024;

/// Deepest ceiling whose frames still fit in [`MAX_STACK_BYTES`].
pub const MAX_RECURSION_LIMIT: u64 = (MAX_STACK_BYTES - BASE_STACK_BYTES) / FRAME_STACK_BYTES;

/// Maximum number of nested evaluator frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecursionLimit(u64);

impl RecursionLimit {
    pub fn new(max_depth: u64) -> Self {
        Self(max_depth)
    }

    pub fn max_depth(&self) -> u64 {
        self.0
    }

    /// Thread stack needed to reach `max_depth` frames.
    pub fn stack_bytes(&self) -> u64 {
        BASE_STACK_BYTES
            .saturating_add(self.0.saturating_mul(FRAME_STACK_BYTES))
            .min(MAX_STACK_BYTES)
    }

    fn check(&self, depth: u64) -> Result<()> {
        if depth > self.max_depth() {
            return Err(GeoError::RecursionLimitExceeded {
                depth,
                limit: self.0,
            });
        }
        Ok(())
    }
}

impl Default for RecursionLimit {
    fn default() -> Self {
        Self(DEFAULT_RECURSION_LIMIT)
    }
}

/// Runs `f` on a dedicated thread whose stack fits `limit` frames.
pub fn on_recursion_stack<T, F>(limit: RecursionLimit, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let stack_bytes = limit.stack_bytes();
    tracing::debug!(
        "Measurement thread stack: {} bytes for {} frames",
        stack_bytes,
        limit.max_depth()
    );

    let handle = thread::Builder::new()
        .name("geoseq-eval".to_string())
        .stack_size(stack_bytes as usize)
        .spawn(f)?;

    handle.join().map_err(|_| GeoError::WorkerError {
        message: "measurement thread panicked".to_string(),
    })?
}

/// `S(n) = a + r * S(n - 1)`, with `S(1) = a`. `n == 0` is the empty sum.
pub fn recursive_sum(a: &BigInt, r: &BigInt, n: u64, limit: RecursionLimit) -> Result<BigInt> {
    if n == 0 {
        return Ok(BigInt::zero());
    }
    limit.check(n)?;
    sum_frame(a, r, n, 1, limit)
}

fn sum_frame(a: &BigInt, r: &BigInt, n: u64, depth: u64, limit: RecursionLimit) -> Result<BigInt> {
    limit.check(depth)?;
    if n == 1 {
        return Ok(a.clone());
    }
    let rest = sum_frame(a, r, n - 1, depth + 1, limit)?;
    Ok(a + r * rest)
}

/// `T(n) = T(n - 1) * r`, with `T(1) = a`.
pub fn recursive_term(a: &BigInt, r: &BigInt, n: u64, limit: RecursionLimit) -> Result<BigInt> {
    if n == 0 {
        return Err(GeoError::invalid("n", n, "term index must be at least 1"));
    }
    limit.check(n)?;
    term_frame(a, r, n, 1, limit)
}

fn term_frame(a: &BigInt, r: &BigInt, n: u64, depth: u64, limit: RecursionLimit) -> Result<BigInt> {
    limit.check(depth)?;
    if n == 1 {
        return Ok(a.clone());
    }
    Ok(term_frame(a, r, n - 1, depth + 1, limit)? * r)
}
