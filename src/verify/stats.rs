//! Distance-from-orthogonality metrics.
//!
//! The verifier answers yes or no. These measures grade how far a matrix is
//! from being an orthogonal array, which is what a search over candidate
//! designs needs. Both are zero exactly for matrices that verify.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{FrequencyTable, Verifier};
use crate::error::Result;
use crate::matrix::BinaryMatrix;
use crate::utils::combinations;

/// A report on the balance of each column.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BalanceReport {
    /// Whether each factor is perfectly balanced (as many zeros as ones).
    pub factor_balance: Vec<bool>,
    /// Number of ones in each factor.
    pub ones: Vec<usize>,
    /// Expected count of each level if balanced, `None` when N is odd.
    pub expected_count: Option<usize>,
}

impl BalanceReport {
    /// Whether every factor is balanced.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.factor_balance.iter().all(|&b| b)
    }
}

impl BinaryMatrix {
    /// Perform a balance check on all factors.
    ///
    /// Equivalent to verifying strength 1, but reports every column.
    #[must_use]
    pub fn balance_report(&self) -> BalanceReport {
        let n = self.runs();
        let expected_count = (n % 2 == 0).then_some(n / 2);

        let ones: Vec<usize> = self
            .iter_columns()
            .map(|col| col.iter().filter(|&&v| v).count())
            .collect();
        let factor_balance = ones.iter().map(|&c| Some(c) == expected_count).collect();

        BalanceReport {
            factor_balance,
            ones,
            expected_count,
        }
    }
}

/// Sum over all `strength`-column subsets of the Euclidean distance between
/// the observed combination counts and λ = ⌊N / 2^t⌋.
///
/// Combinations that never occur contribute λ² each.
///
/// # Errors
///
/// Same validation as [`Verifier::validate`] with default settings, except
/// that every weight up to `strength` counts towards the ceiling.
///
/// # Example
///
/// ```
/// use oacheck::{delta_distance, BinaryMatrix};
///
/// let l4: BinaryMatrix = "0 0 0\n0 1 1\n1 0 1\n1 1 0".parse().unwrap();
/// assert_eq!(delta_distance(&l4, 2).unwrap(), 0.0);
///
/// let skewed: BinaryMatrix = "0 0\n0 0\n1 1\n1 1".parse().unwrap();
/// assert!(delta_distance(&skewed, 2).unwrap() > 0.0);
/// ```
pub fn delta_distance(matrix: &BinaryMatrix, strength: u32) -> Result<f64> {
    Verifier::new().check_budget(matrix, strength, strength)?;

    let lambda = (matrix.runs() >> strength) as u128;
    let required = 1u128 << strength;

    let total = combinations(matrix.factors(), strength as usize)
        .map(|cols| {
            let table = FrequencyTable::build(matrix, &cols);
            let observed: u128 = table
                .iter()
                .map(|(_, count)| {
                    let diff = (count as u128).abs_diff(lambda);
                    diff * diff
                })
                .sum();
            let missing = required - table.len() as u128;
            ((observed + missing * lambda * lambda) as f64).sqrt()
        })
        .sum();

    Ok(total)
}

/// Sum over all weights `1..=strength` and all column subsets of that
/// weight of |Σ_rows (−1)^(xor of the selected cells)|.
///
/// These are the Walsh coefficients of the row distribution; a binary
/// matrix is an orthogonal array of strength t exactly when all of them
/// vanish.
///
/// # Errors
///
/// Same validation as [`Verifier::validate`] with default settings, except
/// that every weight up to `strength` counts towards the ceiling.
pub fn walsh_distance(matrix: &BinaryMatrix, strength: u32) -> Result<u64> {
    Verifier::new().check_budget(matrix, strength, strength)?;

    let mut total = 0u64;
    for weight in 1..=strength as usize {
        for cols in combinations(matrix.factors(), weight) {
            let views: Vec<_> = cols.iter().map(|&c| matrix.column(c)).collect();
            let odd = (0..matrix.runs())
                .filter(|&row| views.iter().fold(false, |acc, col| acc ^ col[row]))
                .count();
            let even = matrix.runs() - odd;
            total += even.abs_diff(odd) as u64;
        }
    }

    Ok(total)
}

/// Number of ones per row, bucketed: entry `d` counts rows of Hamming
/// weight `d`.
///
/// For any OA(N, k, 2, t) with t ≥ 1 the mean row weight is exactly k/2.
///
/// # Example
///
/// ```
/// use oacheck::{weight_distribution, BinaryMatrix};
///
/// let l4: BinaryMatrix = "0 0 0\n0 1 1\n1 0 1\n1 1 0".parse().unwrap();
/// assert_eq!(weight_distribution(&l4), vec![1, 0, 3, 0]);
/// ```
#[must_use]
pub fn weight_distribution(matrix: &BinaryMatrix) -> Vec<usize> {
    let mut distribution = vec![0usize; matrix.factors() + 1];
    for row in matrix.rows() {
        distribution[row.iter().filter(|&&v| v).count()] += 1;
    }
    distribution
}
