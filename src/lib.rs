//! # oacheck
//!
//! Verification of binary orthogonal arrays.
//!
//! ## Overview
//!
//! A binary design matrix with N rows and k columns is an orthogonal array
//! of strength t when every choice of up to t columns shows each possible
//! 0/1 combination equally often across the rows. This crate:
//! - Loads matrices from whitespace-separated `0`/`1` text, one row per line
//! - Decides whether a matrix is an OA(N, k, 2, t), checking every weight
//!   1..=t for divisibility, coverage and balance
//! - Explains failures with the offending column subset and combination
//! - Grades near-misses with distance metrics
//!
//! ## Quick Start
//!
//! ```rust
//! use oacheck::{verify_strength, BinaryMatrix, Report};
//!
//! let m: BinaryMatrix = "0 0 0\n0 1 1\n1 0 1\n1 1 0".parse().unwrap();
//!
//! let verdict = verify_strength(&m, 2).unwrap();
//! assert!(verdict.is_orthogonal());
//! assert_eq!(Report::new(&verdict).to_string(), "orthogonal: OA(4, 3, 2, 2)");
//!
//! let verdict = verify_strength(&m, 3).unwrap();
//! assert!(!verdict.is_orthogonal());
//! assert_eq!(verdict.certified_strength(), 2);
//! ```
//!
//! ## Notation
//!
//! An orthogonal array is denoted as OA(N, k, s, t) where:
//! - **N**: Number of runs (rows)
//! - **k**: Number of factors (columns)
//! - **s**: Number of levels, always 2 here
//! - **t**: Strength (every t-column subarray contains all 2^t tuples equally)
//!
//! ## Features
//!
//! - `parallel` (default): Fan subset scanning out over rayon
//! - `serde`: Enable serialization/deserialization of verdicts and reports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod matrix;
pub mod report;
pub mod utils;
pub mod verify;

#[cfg(feature = "parallel")]
pub mod parallel;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::matrix::{BinaryMatrix, CellAlphabet, MatrixLoader};
    pub use crate::report::{Outcome, Report};
    pub use crate::utils::{binomial, combinations, subset_count, Combinations};
    pub use crate::verify::{
        compute_strength, delta_distance, verify_strength, walsh_distance, weight_distribution,
        BalanceReport, Counterexample, Defect, FrequencyTable, LevelCombination, OAParams, Verdict,
        Verifier,
    };

    #[cfg(feature = "parallel")]
    pub use crate::parallel::par_verify_strength;
}

// Re-export commonly used items at crate root
pub use error::{Error, Result};
pub use matrix::{BinaryMatrix, MatrixLoader};
pub use report::{Outcome, Report};
pub use verify::{
    compute_strength, delta_distance, verify_strength, walsh_distance, weight_distribution,
    Verdict, Verifier,
};

#[cfg(feature = "parallel")]
pub use parallel::par_verify_strength;
