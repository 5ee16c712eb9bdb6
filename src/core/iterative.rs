//! Loop-based evaluation with a fixed number of working values.

use crate::utils::error::{GeoError, Result};
use num_bigint::BigInt;
use num_traits::Zero;

/// Sum of the first `n` terms. `n == 0` is the empty sum.
///
/// Performs exactly `n` add/multiply steps, with no shortcut for `r == 1`.
pub fn iterative_sum(a: &BigInt, r: &BigInt, n: u64) -> BigInt {
    let mut total = BigInt::zero();
    let mut current = a.clone();

    for _ in 0..n {
        total += &current;
        current *= r;
    }

    total
}

/// The `n`-th term, 1-based.
pub fn iterative_term(a: &BigInt, r: &BigInt, n: u64) -> Result<BigInt> {
    if n == 0 {
        return Err(GeoError::invalid("n", n, "term index must be at least 1"));
    }

    let mut current = a.clone();
    if n == 1 {
        return Ok(current);
    }

    for _ in 1..n {
        current *= r;
    }

    Ok(current)
}
