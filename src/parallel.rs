//! Parallel verification support.
//!
//! This module fans the column subsets of each weight out over the Rayon
//! thread pool. Enable with the `parallel` feature flag.
//!
//! # Usage
//!
//! ```
//! use oacheck::{BinaryMatrix, Verifier};
//!
//! let m: BinaryMatrix = "0 0 0\n0 1 1\n1 0 1\n1 1 0".parse().unwrap();
//! let verdict = Verifier::new().parallel(true).verify(&m, 2).unwrap();
//! assert!(verdict.is_orthogonal());
//! ```
//!
//! # Semantics
//!
//! Weights are still checked in ascending order, so the certified strength
//! is the same as in a sequential run. Within a weight, the first
//! counterexample any worker finds sets a shared flag that stops the
//! others; which counterexample wins is not specified. A panicking worker
//! propagates its panic to the caller, so a subset is never silently
//! skipped.
//!
//! Parallelism pays off for many columns or long matrices. For small
//! inputs the sequential scan is usually faster.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::error::Result;
use crate::matrix::BinaryMatrix;
use crate::utils::combinations;
use crate::verify::{check_subset, expected_count, indivisible, indivisible_subset, Defect, Verdict, Verifier};

/// First failing subset at `weight`, scanning in parallel.
pub(crate) fn scan_weight(matrix: &BinaryMatrix, weight: u32) -> Option<(Vec<usize>, Defect)> {
    let Some(expected) = expected_count(matrix.runs(), weight) else {
        return Some((indivisible_subset(weight), indivisible(matrix, weight)));
    };

    let failed = AtomicBool::new(false);
    combinations(matrix.factors(), weight as usize)
        .take_while(|_| !failed.load(Ordering::Relaxed))
        .par_bridge()
        .find_map_any(|cols| {
            let defect = check_subset(matrix, &cols, expected)?;
            failed.store(true, Ordering::Relaxed);
            Some((cols, defect))
        })
}

/// Verify a matrix with the subset scan fanned out over the Rayon pool.
///
/// # Errors
///
/// See [`Verifier::validate`].
pub fn par_verify_strength(matrix: &BinaryMatrix, strength: u32) -> Result<Verdict> {
    Verifier::new().parallel(true).verify(matrix, strength)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::verify_strength;

    fn full_factorial(factors: usize) -> BinaryMatrix {
        let rows: Vec<Vec<bool>> = (0..1usize << factors)
            .map(|i| (0..factors).rev().map(|b| (i >> b) & 1 == 1).collect())
            .collect();
        BinaryMatrix::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_par_full_factorial() {
        let m = full_factorial(5);
        let verdict = par_verify_strength(&m, 5).unwrap();
        assert_eq!(verdict.params().unwrap().to_string(), "OA(32, 5, 2, 5)");
    }

    #[test]
    fn test_par_equivalence_orthogonal() {
        let m = full_factorial(4);
        for t in 1..=4 {
            assert_eq!(
                par_verify_strength(&m, t).unwrap(),
                verify_strength(&m, t).unwrap()
            );
        }
    }

    #[test]
    fn test_par_counterexample_weight() {
        // Append a parity column: every 5-subset containing it is constant
        // in xor, so the array has strength 4 but not 5.
        let base = full_factorial(4);
        let rows: Vec<Vec<bool>> = base
            .rows()
            .map(|r| {
                let mut row = r.to_vec();
                row.push(r.iter().fold(false, |acc, &v| acc ^ v));
                row
            })
            .collect();
        let m = BinaryMatrix::from_rows(&rows).unwrap();

        let par = par_verify_strength(&m, 5).unwrap();
        let seq = verify_strength(&m, 5).unwrap();
        assert!(!par.is_orthogonal());
        assert_eq!(par.certified_strength(), 4);
        assert_eq!(seq.certified_strength(), 4);
        assert_eq!(par.counterexample().unwrap().weight, 5);
    }

    #[test]
    fn test_par_indivisible() {
        let m: BinaryMatrix = "0 1\n1 0\n0 1".parse().unwrap();
        let verdict = par_verify_strength(&m, 2).unwrap();
        assert_eq!(
            verdict.counterexample().unwrap().defect,
            Defect::Indivisible { runs: 3, weight: 1 }
        );
    }
}
