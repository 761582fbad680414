//! Orthogonal array verification.
//!
//! A binary matrix with N rows and k columns is an orthogonal array
//! OA(N, k, 2, t) when, for every weight w in 1..=t and every choice of w
//! columns, each of the 2^w level-combinations occurs exactly λ = N / 2^w
//! times among the rows.
//!
//! ## Algorithm
//!
//! For each weight w = 1..=t, in ascending order:
//! 1. If N is not divisible by 2^w the array cannot be balanced at this
//!    weight; fail immediately without scanning.
//! 2. Otherwise enumerate the C(k, w) column subsets lazily, in
//!    lexicographic order.
//! 3. For each subset build a [`FrequencyTable`] of realised
//!    level-combinations and check both coverage (2^w distinct
//!    combinations) and balance (every count equals λ).
//!
//! The scan stops at the first failing subset. Time complexity is
//! O(N · Σ_{w=1..t} C(k, w) · w).
//!
//! Outcomes are values, not errors: a matrix that is not orthogonal yields
//! [`Verdict::NotOrthogonal`] with a [`Counterexample`]. Errors are reserved
//! for unusable input or parameters and are raised before any scanning.

mod stats;

pub use stats::{delta_distance, walsh_distance, weight_distribution, BalanceReport};

use std::collections::{BTreeMap, HashMap};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::matrix::BinaryMatrix;
use crate::utils::{combinations, subset_count};

/// Default ceiling on Σ_w C(k, w), the number of column subsets a single
/// verification may scan.
pub const DEFAULT_MAX_SUBSETS: u64 = 100_000_000;

/// Parameters of a certified binary orthogonal array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OAParams {
    /// Number of runs (rows).
    pub runs: usize,
    /// Number of factors (columns).
    pub factors: usize,
    /// Strength (orthogonality degree).
    pub strength: u32,
}

impl OAParams {
    /// Number of levels of every factor.
    pub const LEVELS: u32 = 2;

    /// Get the index λ = N / 2^t.
    #[must_use]
    pub fn index(&self) -> usize {
        self.runs.checked_shr(self.strength).unwrap_or(0)
    }
}

impl fmt::Display for OAParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OA({}, {}, {}, {})",
            self.runs,
            self.factors,
            Self::LEVELS,
            self.strength
        )
    }
}

/// The values a row takes on a chosen subset of columns.
///
/// Packed into a `u64` with the first selected column as the most
/// significant bit, so ordering by `bits` is lexicographic ordering of the
/// value tuples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LevelCombination {
    width: u32,
    bits: u64,
}

impl LevelCombination {
    /// Largest supported subset size.
    pub const MAX_WIDTH: u32 = 63;

    /// Build a combination from packed bits.
    ///
    /// # Panics
    ///
    /// Panics if `width` exceeds [`Self::MAX_WIDTH`] or `bits` does not fit.
    #[must_use]
    pub fn new(width: u32, bits: u64) -> Self {
        assert!(width <= Self::MAX_WIDTH, "width {width} exceeds {}", Self::MAX_WIDTH);
        assert!(bits >> width == 0, "bits {bits:#b} do not fit in width {width}");
        Self { width, bits }
    }

    /// Build a combination from a tuple of values.
    ///
    /// # Panics
    ///
    /// Panics if `values` is longer than [`Self::MAX_WIDTH`].
    #[must_use]
    pub fn from_values(values: &[bool]) -> Self {
        let bits = values.iter().fold(0u64, |acc, &v| (acc << 1) | u64::from(v));
        Self::new(values.len() as u32, bits)
    }

    /// Number of columns in the combination.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The packed value, first column most significant.
    #[must_use]
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Unpack into one boolean per selected column.
    #[must_use]
    pub fn values(&self) -> Vec<bool> {
        (0..self.width)
            .rev()
            .map(|shift| (self.bits >> shift) & 1 == 1)
            .collect()
    }
}

impl fmt::Display for LevelCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<&str> = self
            .values()
            .into_iter()
            .map(|v| if v { "1" } else { "0" })
            .collect();
        write!(f, "({})", cells.join(","))
    }
}

/// Occurrence counts of the level-combinations realised on one column subset.
///
/// Only combinations that occur at least once are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    width: u32,
    counts: HashMap<u64, usize>,
}

impl FrequencyTable {
    /// Scan every row of `matrix` on the given columns.
    ///
    /// # Panics
    ///
    /// Panics if a column index is out of bounds or more than
    /// [`LevelCombination::MAX_WIDTH`] columns are given.
    #[must_use]
    pub fn build(matrix: &BinaryMatrix, columns: &[usize]) -> Self {
        let width = columns.len() as u32;
        assert!(width <= LevelCombination::MAX_WIDTH, "too many columns: {width}");

        let views: Vec<_> = columns.iter().map(|&c| matrix.column(c)).collect();
        let mut counts: HashMap<u64, usize> = HashMap::new();
        for row in 0..matrix.runs() {
            let key = views
                .iter()
                .fold(0u64, |acc, col| (acc << 1) | u64::from(col[row]));
            *counts.entry(key).or_insert(0) += 1;
        }

        Self { width, counts }
    }

    /// Number of columns the table was built over.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of distinct combinations observed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no rows were counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Occurrences of `combination`, zero if it was never observed.
    #[must_use]
    pub fn get(&self, combination: LevelCombination) -> usize {
        if combination.width != self.width {
            return 0;
        }
        self.counts.get(&combination.bits).copied().unwrap_or(0)
    }

    /// Iterate over observed combinations and their counts, in no
    /// particular order.
    pub fn iter(&self) -> impl Iterator<Item = (LevelCombination, usize)> + '_ {
        self.counts
            .iter()
            .map(|(&bits, &count)| (LevelCombination { width: self.width, bits }, count))
    }

    /// Observed combinations in lexicographic order.
    #[must_use]
    pub fn sorted(&self) -> BTreeMap<LevelCombination, usize> {
        self.iter().collect()
    }

    /// Check coverage and balance against the per-combination count `expected`.
    ///
    /// Coverage is checked first: a missing combination is reported even if
    /// the observed ones happen to share the same count.
    #[must_use]
    pub fn defect(&self, expected: usize) -> Option<Defect> {
        let required = 1u64 << self.width;
        if (self.counts.len() as u64) < required {
            let bits = (0..required)
                .find(|bits| !self.counts.contains_key(bits))
                .unwrap_or_default();
            return Some(Defect::MissingCombination {
                combination: LevelCombination {
                    width: self.width,
                    bits,
                },
                expected,
                observed: self.counts.len(),
                counts: self.sorted(),
            });
        }

        if self.counts.values().all(|&count| count == expected) {
            return None;
        }
        let counts = self.sorted();
        let (&combination, &count) = counts.iter().find(|(_, &count)| count != expected)?;
        Some(Defect::Imbalanced {
            combination,
            count,
            expected,
            counts,
        })
    }
}

/// Why a column subset fails the balance property.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Defect {
    /// N is not divisible by 2^w, so no subset of this weight can balance.
    Indivisible {
        /// Number of runs.
        runs: usize,
        /// The weight w.
        weight: u32,
    },
    /// Some of the 2^w combinations never occur.
    MissingCombination {
        /// The lexicographically first combination that never occurs.
        combination: LevelCombination,
        /// Required occurrences of every combination.
        expected: usize,
        /// Number of distinct combinations that do occur.
        observed: usize,
        /// Counts of the observed combinations.
        counts: BTreeMap<LevelCombination, usize>,
    },
    /// Every combination occurs, but not equally often.
    Imbalanced {
        /// The lexicographically first combination with a wrong count.
        combination: LevelCombination,
        /// Its number of occurrences.
        count: usize,
        /// Required occurrences of every combination.
        expected: usize,
        /// Counts of all combinations.
        counts: BTreeMap<LevelCombination, usize>,
    },
}

/// Diagnostic for a matrix that is not an orthogonal array of the
/// requested strength.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Counterexample {
    /// Number of runs (rows).
    pub runs: usize,
    /// Number of factors (columns).
    pub factors: usize,
    /// The strength that was requested.
    pub requested_strength: u32,
    /// Highest weight at which every column subset balanced.
    pub certified_strength: u32,
    /// Weight at which the failure was found.
    pub weight: u32,
    /// The failing column subset, in ascending order.
    pub columns: Vec<usize>,
    /// What is wrong with it.
    pub defect: Defect,
}

/// Result of verifying a matrix at a given strength.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Verdict {
    /// Balanced at every weight up to the requested strength.
    Orthogonal(OAParams),
    /// A column subset failed the balance or coverage check.
    NotOrthogonal(Counterexample),
}

impl Verdict {
    /// Whether the matrix is an orthogonal array of the requested strength.
    #[must_use]
    pub fn is_orthogonal(&self) -> bool {
        matches!(self, Self::Orthogonal(_))
    }

    /// Highest strength certified by this verification.
    #[must_use]
    pub fn certified_strength(&self) -> u32 {
        match self {
            Self::Orthogonal(params) => params.strength,
            Self::NotOrthogonal(cex) => cex.certified_strength,
        }
    }

    /// The certified parameters, if orthogonal.
    #[must_use]
    pub fn params(&self) -> Option<&OAParams> {
        match self {
            Self::Orthogonal(params) => Some(params),
            Self::NotOrthogonal(_) => None,
        }
    }

    /// The failure diagnostic, if not orthogonal.
    #[must_use]
    pub fn counterexample(&self) -> Option<&Counterexample> {
        match self {
            Self::Orthogonal(_) => None,
            Self::NotOrthogonal(cex) => Some(cex),
        }
    }
}

/// Required count of each level-combination at weight `weight`, or `None`
/// if `runs` is not divisible by 2^weight.
#[must_use]
pub fn expected_count(runs: usize, weight: u32) -> Option<usize> {
    let combinations = 1usize.checked_shl(weight)?;
    (runs % combinations == 0).then(|| runs / combinations)
}

/// Check one column subset, returning its defect if it does not balance.
///
/// `expected` is the required count per combination for a subset of this size.
pub(crate) fn check_subset(matrix: &BinaryMatrix, columns: &[usize], expected: usize) -> Option<Defect> {
    let table = FrequencyTable::build(matrix, columns);
    let defect = table.defect(expected);
    tracing::trace!(?columns, distinct = table.len(), balanced = defect.is_none(), "checked subset");
    defect
}

/// First failing subset at `weight`, scanning sequentially.
fn scan_weight(matrix: &BinaryMatrix, weight: u32) -> Option<(Vec<usize>, Defect)> {
    let Some(expected) = expected_count(matrix.runs(), weight) else {
        return Some((indivisible_subset(weight), indivisible(matrix, weight)));
    };

    combinations(matrix.factors(), weight as usize)
        .find_map(|cols| check_subset(matrix, &cols, expected).map(|defect| (cols, defect)))
}

/// The subset reported when a whole weight fails on divisibility.
pub(crate) fn indivisible_subset(weight: u32) -> Vec<usize> {
    (0..weight as usize).collect()
}

pub(crate) fn indivisible(matrix: &BinaryMatrix, weight: u32) -> Defect {
    Defect::Indivisible {
        runs: matrix.runs(),
        weight,
    }
}

/// Configurable orthogonal array verifier.
///
/// # Example
///
/// ```
/// use oacheck::{BinaryMatrix, Verifier};
///
/// let m: BinaryMatrix = "0 0 0\n0 1 1\n1 0 1\n1 1 0".parse().unwrap();
/// let verdict = Verifier::new().verify(&m, 2).unwrap();
/// assert!(verdict.is_orthogonal());
/// assert_eq!(verdict.params().unwrap().to_string(), "OA(4, 3, 2, 2)");
///
/// // The same L4 array is not of strength 3
/// let verdict = Verifier::new().verify(&m, 3).unwrap();
/// assert_eq!(verdict.certified_strength(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verifier {
    max_subsets: u64,
    parallel: bool,
}

impl Default for Verifier {
    fn default() -> Self {
        Self {
            max_subsets: DEFAULT_MAX_SUBSETS,
            parallel: false,
        }
    }
}

impl Verifier {
    /// Create a sequential verifier with the default subset ceiling.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ceiling on the number of column subsets to scan.
    #[must_use]
    pub fn max_subsets(mut self, max_subsets: u64) -> Self {
        self.max_subsets = max_subsets;
        self
    }

    /// Fan the subsets of each weight out over the rayon thread pool.
    ///
    /// Without the `parallel` feature this setting is ignored.
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Whether subset scanning will run in parallel.
    #[must_use]
    pub fn is_parallel(&self) -> bool {
        self.parallel && cfg!(feature = "parallel")
    }

    /// Validate `strength` against the matrix and the subset ceiling.
    ///
    /// Returns the number of column subsets a full verification would scan.
    /// Weights w with 2^w not dividing N fail without scanning, so only
    /// weights up to the number of trailing zero bits of N are counted.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidStrength`] if `strength` is outside `1..=factors`
    /// - [`Error::InfeasibleConfiguration`] if the subset count exceeds the ceiling
    pub fn validate(&self, matrix: &BinaryMatrix, strength: u32) -> Result<u64> {
        let scanned = strength.min(matrix.runs().trailing_zeros());
        self.check_budget(matrix, strength, scanned)
    }

    /// Validate `strength` and charge every weight in `1..=scanned` against
    /// the ceiling.
    pub(crate) fn check_budget(
        &self,
        matrix: &BinaryMatrix,
        strength: u32,
        scanned: u32,
    ) -> Result<u64> {
        let factors = matrix.factors();
        if strength == 0 || strength as usize > factors {
            return Err(Error::InvalidStrength { strength, factors });
        }

        let subsets = subset_count(factors, scanned);
        match subsets {
            Some(n) if n <= self.max_subsets => {
                if n > self.max_subsets / 10 {
                    tracing::warn!(
                        subsets = n,
                        ceiling = self.max_subsets,
                        "verification is close to the subset ceiling"
                    );
                }
                Ok(n)
            }
            _ => Err(Error::InfeasibleConfiguration {
                factors,
                strength,
                subsets,
                ceiling: self.max_subsets,
            }),
        }
    }

    /// Verify that `matrix` is an orthogonal array of strength `strength`.
    ///
    /// # Errors
    ///
    /// See [`Verifier::validate`]; no error is raised once scanning starts.
    pub fn verify(&self, matrix: &BinaryMatrix, strength: u32) -> Result<Verdict> {
        let subsets = self.validate(matrix, strength)?;
        tracing::debug!(
            runs = matrix.runs(),
            factors = matrix.factors(),
            strength,
            subsets,
            parallel = self.is_parallel(),
            "verifying orthogonality"
        );

        for weight in 1..=strength {
            if let Some((columns, defect)) = self.scan_weight(matrix, weight) {
                tracing::info!(weight, ?columns, "not orthogonal");
                return Ok(Verdict::NotOrthogonal(Counterexample {
                    runs: matrix.runs(),
                    factors: matrix.factors(),
                    requested_strength: strength,
                    certified_strength: weight - 1,
                    weight,
                    columns,
                    defect,
                }));
            }
            tracing::debug!(weight, "all subsets balanced");
        }

        let params = OAParams {
            runs: matrix.runs(),
            factors: matrix.factors(),
            strength,
        };
        tracing::info!(%params, "orthogonal");
        Ok(Verdict::Orthogonal(params))
    }

    fn scan_weight(&self, matrix: &BinaryMatrix, weight: u32) -> Option<(Vec<usize>, Defect)> {
        #[cfg(feature = "parallel")]
        if self.parallel {
            return crate::parallel::scan_weight(matrix, weight);
        }
        scan_weight(matrix, weight)
    }
}

/// Verify that a matrix is an orthogonal array of the given strength, with
/// default settings.
///
/// # Errors
///
/// See [`Verifier::validate`].
pub fn verify_strength(matrix: &BinaryMatrix, strength: u32) -> Result<Verdict> {
    Verifier::new().verify(matrix, strength)
}

/// Compute the actual strength of a matrix.
///
/// This finds the highest t ≤ `max_check` for which the matrix is balanced,
/// or 0 if not even single columns are. The search is capped at the number
/// of columns and at the largest w with 2^w dividing N.
///
/// # Errors
///
/// Returns [`Error::InfeasibleConfiguration`] if checking up to the capped
/// strength would exceed the default subset ceiling.
pub fn compute_strength(matrix: &BinaryMatrix, max_check: u32) -> Result<u32> {
    let max_t = max_check
        .min(u32::try_from(matrix.factors()).unwrap_or(u32::MAX))
        .min(matrix.runs().trailing_zeros());
    if max_t == 0 {
        return Ok(0);
    }
    Ok(verify_strength(matrix, max_t)?.certified_strength())
}
