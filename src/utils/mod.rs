//! Combinatorial helpers: binomial coefficients and lazy column-subset
//! enumeration.
//!
//! Subsets are produced one at a time in lexicographic order, so scanning
//! C(k, t) subsets never needs more than O(t) memory for the enumeration.

/// Compute binomial coefficient C(n, k) = n! / (k! * (n-k)!)
///
/// Returns `None` if the result would overflow `u64`.
///
/// # Examples
///
/// ```
/// use oacheck::utils::binomial;
///
/// assert_eq!(binomial(5, 2), Some(10));
/// assert_eq!(binomial(10, 5), Some(252));
/// assert_eq!(binomial(5, 0), Some(1));
/// assert_eq!(binomial(3, 5), Some(0)); // k > n
/// ```
#[must_use]
pub fn binomial(n: u64, k: u64) -> Option<u64> {
    if k > n {
        return Some(0);
    }

    // C(n, k) = C(n, n-k)
    let k = k.min(n - k);

    let mut result: u64 = 1;
    for i in 0..k {
        // result * (n - i) is always divisible by (i + 1); widen to avoid
        // spurious overflow in the intermediate product.
        let wide = u128::from(result) * u128::from(n - i) / u128::from(i + 1);
        result = u64::try_from(wide).ok()?;
    }

    Some(result)
}

/// Total number of column subsets of size `1..=strength` drawn from `factors`
/// columns, i.e. Σ C(k, w).
///
/// Returns `None` on `u64` overflow.
///
/// ```
/// use oacheck::utils::subset_count;
///
/// assert_eq!(subset_count(4, 2), Some(4 + 6));
/// assert_eq!(subset_count(3, 3), Some(7));
/// ```
#[must_use]
pub fn subset_count(factors: usize, strength: u32) -> Option<u64> {
    let n = u64::try_from(factors).ok()?;
    (1..=u64::from(strength)).try_fold(0u64, |acc, w| acc.checked_add(binomial(n, w)?))
}

/// Generate all k-combinations of indices 0..n in lexicographic order.
///
/// # Examples
///
/// ```
/// use oacheck::utils::combinations;
///
/// let combos: Vec<Vec<usize>> = combinations(4, 2).collect();
/// assert_eq!(combos.len(), 6); // C(4,2) = 6
/// assert_eq!(combos[0], vec![0, 1]);
/// assert_eq!(combos[5], vec![2, 3]);
/// ```
pub fn combinations(n: usize, k: usize) -> CombinationIter {
    Combinations::new(n, k).iter()
}

/// A restartable description of the k-subsets of `0..n`.
///
/// The value itself holds no enumeration state; every call to
/// [`Combinations::iter`] starts a fresh pass from `[0, 1, .., k-1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Combinations {
    n: usize,
    k: usize,
}

impl Combinations {
    /// Describe the k-subsets of `0..n`.
    #[must_use]
    pub fn new(n: usize, k: usize) -> Self {
        Self { n, k }
    }

    /// Number of subsets, `None` on overflow.
    #[must_use]
    pub fn len(&self) -> Option<u64> {
        binomial(self.n as u64, self.k as u64)
    }

    /// Whether the sequence yields nothing at all (`k > n`).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.k > self.n
    }

    /// Start a new lexicographic pass.
    #[must_use]
    pub fn iter(&self) -> CombinationIter {
        CombinationIter::new(self.n, self.k)
    }
}

impl IntoIterator for Combinations {
    type Item = Vec<usize>;
    type IntoIter = CombinationIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &Combinations {
    type Item = Vec<usize>;
    type IntoIter = CombinationIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over k-combinations of 0..n.
#[derive(Debug, Clone)]
pub struct CombinationIter {
    n: usize,
    k: usize,
    indices: Vec<usize>,
    finished: bool,
}

impl CombinationIter {
    fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            k,
            indices: (0..k.min(n)).collect(),
            finished: k > n,
        }
    }
}

impl Iterator for CombinationIter {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if self.k == 0 {
            self.finished = true;
            return Some(Vec::new());
        }

        let result = self.indices.clone();

        // Find rightmost index that can be incremented
        let mut i = self.k;
        while i > 0 {
            i -= 1;
            if self.indices[i] < self.n - self.k + i {
                self.indices[i] += 1;
                for j in (i + 1)..self.k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                return Some(result);
            }
        }

        self.finished = true;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            (0, Some(0))
        } else {
            let count = binomial(self.n as u64, self.k as u64)
                .and_then(|c| usize::try_from(c).ok())
                .unwrap_or(usize::MAX);
            (0, Some(count))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(0, 0), Some(1));
        assert_eq!(binomial(5, 0), Some(1));
        assert_eq!(binomial(5, 5), Some(1));
        assert_eq!(binomial(5, 2), Some(10));
        assert_eq!(binomial(10, 3), Some(120));
        assert_eq!(binomial(20, 10), Some(184_756));
        assert_eq!(binomial(3, 5), Some(0)); // k > n
        assert_eq!(binomial(62, 31), Some(465_428_353_255_261_088));
        assert_eq!(binomial(200, 100), None);
    }

    #[test]
    fn test_subset_count() {
        assert_eq!(subset_count(5, 1), Some(5));
        assert_eq!(subset_count(5, 5), Some(31));
        assert_eq!(subset_count(5, 0), Some(0));
        assert_eq!(subset_count(300, 150), None);
    }

    #[test]
    fn test_combinations() {
        let c: Vec<_> = combinations(4, 2).collect();
        assert_eq!(c.len(), 6);
        assert_eq!(c[0], vec![0, 1]);
        assert_eq!(c[1], vec![0, 2]);
        assert_eq!(c[2], vec![0, 3]);
        assert_eq!(c[3], vec![1, 2]);
        assert_eq!(c[4], vec![1, 3]);
        assert_eq!(c[5], vec![2, 3]);

        let c: Vec<_> = combinations(5, 3).collect();
        assert_eq!(c.len(), 10);

        let c: Vec<_> = combinations(3, 0).collect();
        assert_eq!(c.len(), 1);
        assert_eq!(c[0], Vec::<usize>::new());

        let c: Vec<_> = combinations(3, 4).collect();
        assert_eq!(c.len(), 0);

        let c: Vec<_> = combinations(3, 3).collect();
        assert_eq!(c, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_combinations_restart() {
        let subsets = Combinations::new(5, 2);
        let first: Vec<_> = subsets.iter().collect();
        let second: Vec<_> = subsets.into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(subsets.len(), Some(first.len() as u64));
        assert!(!subsets.is_empty());
        assert!(Combinations::new(2, 3).is_empty());
    }

    #[test]
    fn test_combinations_lazy() {
        // C(60, 30) subsets would never fit in memory
        let mut iter = combinations(60, 30);
        assert_eq!(iter.next(), Some((0..30).collect::<Vec<_>>()));
        let mut expected: Vec<usize> = (0..29).collect();
        expected.push(30);
        assert_eq!(iter.next(), Some(expected));
    }
}
