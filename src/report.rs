//! Human-readable rendering of verdicts.
//!
//! A [`Report`] renders a [`Verdict`] as a single line. [`Outcome`]
//! collapses a verification result into the three statuses callers need to
//! tell apart: orthogonal, not orthogonal, or unusable input/parameters.
//!
//! ```
//! use oacheck::{verify_strength, BinaryMatrix, Report};
//!
//! let m: BinaryMatrix = "0 0\n0 1\n1 0\n1 1".parse().unwrap();
//! let verdict = verify_strength(&m, 2).unwrap();
//! assert_eq!(Report::new(&verdict).to_string(), "orthogonal: OA(4, 2, 2, 2)");
//! ```

use std::fmt;

use crate::error::Result;
use crate::verify::{Counterexample, Defect, Verdict};

/// Single-line report for a verdict.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    verdict: &'a Verdict,
}

impl<'a> Report<'a> {
    /// Wrap a verdict for display.
    #[must_use]
    pub fn new(verdict: &'a Verdict) -> Self {
        Self { verdict }
    }

    /// The three-way status of the wrapped verdict.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        Outcome::from_verdict(self.verdict)
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.verdict {
            Verdict::Orthogonal(params) => write!(f, "orthogonal: {params}"),
            Verdict::NotOrthogonal(cex) => write!(f, "not orthogonal: {}", Diagnostic(cex)),
        }
    }
}

struct Diagnostic<'a>(&'a Counterexample);

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cex = self.0;
        write!(f, "columns {:?} at weight {}: ", cex.columns, cex.weight)?;
        match &cex.defect {
            Defect::Indivisible { runs, weight } => match 1u128.checked_shl(*weight) {
                Some(n) => write!(f, "N = {runs} is not divisible by 2^{weight} = {n}")?,
                None => write!(f, "N = {runs} is not divisible by 2^{weight}")?,
            },
            Defect::MissingCombination {
                combination,
                expected,
                observed,
                ..
            } => write!(
                f,
                "combination {combination} never occurs, expected {expected} occurrence(s) \
                 ({observed} of {} combinations observed)",
                1u128 << combination.width()
            )?,
            Defect::Imbalanced {
                combination,
                count,
                expected,
                ..
            } => write!(
                f,
                "combination {combination} occurs {count} time(s), expected {expected}"
            )?,
        }
        write!(
            f,
            " (certified strength {} of {} requested, N = {}, k = {})",
            cex.certified_strength, cex.requested_strength, cex.runs, cex.factors
        )
    }
}

/// Three-way status of a verification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The matrix is an orthogonal array of the requested strength.
    Orthogonal,
    /// The matrix was checked and is not orthogonal.
    NotOrthogonal,
    /// Malformed input or invalid parameters; no verdict was produced.
    Error,
}

impl Outcome {
    /// Status of a computed verdict.
    #[must_use]
    pub fn from_verdict(verdict: &Verdict) -> Self {
        if verdict.is_orthogonal() {
            Self::Orthogonal
        } else {
            Self::NotOrthogonal
        }
    }

    /// Status of a verification result, errors included.
    #[must_use]
    pub fn from_result(result: &Result<Verdict>) -> Self {
        match result {
            Ok(verdict) => Self::from_verdict(verdict),
            Err(_) => Self::Error,
        }
    }

    /// Process exit status: 0 orthogonal, 1 not orthogonal, 2 error.
    #[must_use]
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Orthogonal => 0,
            Self::NotOrthogonal => 1,
            Self::Error => 2,
        }
    }
}
