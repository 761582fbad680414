//! Binary design matrices.
//!
//! A [`BinaryMatrix`] is an N×k table of boolean cells, built once from
//! input and read-only thereafter. Cells are stored column-major: each
//! factor's N values are contiguous, which is the access pattern of the
//! verifier (it zips a handful of columns row by row).
//!
//! Matrices are normally produced by [`MatrixLoader`] from a text stream,
//! one row per line:
//!
//! ```
//! use oacheck::BinaryMatrix;
//!
//! let m: BinaryMatrix = "0 0\n0 1\n\n1 0\n1 1\n".parse().unwrap();
//! assert_eq!(m.runs(), 4);
//! assert_eq!(m.factors(), 2);
//! assert!(m.get(3, 1));
//! ```

mod parse;

pub use parse::{CellAlphabet, MatrixLoader};

use ndarray::{Array2, ArrayView1, Axis};
use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A rectangular binary matrix with N rows (runs) and k columns (factors).
#[derive(Clone, PartialEq, Eq)]
pub struct BinaryMatrix {
    /// Column-major cells, shape (factors, runs).
    columns: Array2<bool>,
}

impl BinaryMatrix {
    /// Build a matrix from rows, checking rectangularity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyMatrix`] if there are no rows or the rows have
    /// no cells, and [`Error::RaggedMatrix`] for the first row whose length
    /// differs from the first row's.
    pub fn from_rows(rows: &[Vec<bool>]) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(Error::EmptyMatrix);
        };
        let factors = first.len();
        if factors == 0 {
            return Err(Error::EmptyMatrix);
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != factors {
                return Err(Error::RaggedMatrix {
                    row: i + 1,
                    line: i + 1,
                    expected: factors,
                    actual: row.len(),
                });
            }
        }

        Ok(Self::transpose(rows, factors))
    }

    /// Explicit transpose of validated, equal-length rows into column-major
    /// storage.
    fn transpose(rows: &[Vec<bool>], factors: usize) -> Self {
        let columns = Array2::from_shape_fn((factors, rows.len()), |(col, row)| rows[row][col]);
        Self { columns }
    }

    /// Load a matrix from a text stream using the default `0`/`1` alphabet.
    ///
    /// # Errors
    ///
    /// See [`MatrixLoader::load`].
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        MatrixLoader::new().load(reader)
    }

    /// Get the number of runs (rows).
    #[must_use]
    pub fn runs(&self) -> usize {
        self.columns.ncols()
    }

    /// Get the number of factors (columns).
    #[must_use]
    pub fn factors(&self) -> usize {
        self.columns.nrows()
    }

    /// Get the value at a specific position.
    ///
    /// # Panics
    ///
    /// Panics if the indices are out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.columns[[col, row]]
    }

    /// Get a column as a contiguous view of N cells.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= factors()`.
    #[must_use]
    pub fn column(&self, idx: usize) -> ArrayView1<'_, bool> {
        self.columns.row(idx)
    }

    /// Get a row as a strided view of k cells.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= runs()`.
    #[must_use]
    pub fn row(&self, idx: usize) -> ArrayView1<'_, bool> {
        self.columns.column(idx)
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, bool>> {
        self.columns.columns().into_iter()
    }

    /// Iterate over columns.
    pub fn iter_columns(&self) -> impl Iterator<Item = ArrayView1<'_, bool>> {
        self.columns.rows().into_iter()
    }

    /// Select a subset (or reordering) of columns, returning a new matrix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if any index is not a column, and
    /// [`Error::EmptyMatrix`] if `cols` is empty.
    pub fn select_columns(&self, cols: &[usize]) -> Result<Self> {
        Self::check_indices(cols, self.factors())?;
        Ok(Self {
            columns: self.columns.select(Axis(0), cols),
        })
    }

    /// Select a subset (or reordering) of rows, returning a new matrix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if any index is not a row, and
    /// [`Error::EmptyMatrix`] if `rows` is empty.
    pub fn select_rows(&self, rows: &[usize]) -> Result<Self> {
        Self::check_indices(rows, self.runs())?;
        Ok(Self {
            columns: self.columns.select(Axis(1), rows),
        })
    }

    fn check_indices(indices: &[usize], size: usize) -> Result<()> {
        if indices.is_empty() {
            return Err(Error::EmptyMatrix);
        }
        match indices.iter().find(|&&i| i >= size) {
            Some(&index) => Err(Error::IndexOutOfBounds { index, size }),
            None => Ok(()),
        }
    }
}

impl FromStr for BinaryMatrix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        MatrixLoader::new().load(s.as_bytes())
    }
}

impl fmt::Debug for BinaryMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BinaryMatrix({}x{}) {:?}", self.runs(), self.factors(), self.columns.t())
    }
}

/// Renders the matrix in the same row-per-line format the loader accepts.
impl fmt::Display for BinaryMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let row_str: Vec<&str> = row.iter().map(|&v| if v { "1" } else { "0" }).collect();
            writeln!(f, "{}", row_str.join(" "))?;
        }
        Ok(())
    }
}
