//! Text loader for binary matrices.
//!
//! The input format is one row per line, cells separated by whitespace.
//! Blank lines are skipped. Every failure is reported eagerly, as soon as
//! the offending line is read, so no partial matrix is ever returned.

use std::io::BufRead;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::BinaryMatrix;
use crate::error::{Error, Result};

/// The set of tokens accepted as cell values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CellAlphabet {
    /// Only `0` and `1`.
    #[default]
    Digits,
    /// `0`/`1`, `T`/`F` and `true`/`false` in any letter case.
    Lenient,
}

impl CellAlphabet {
    /// Map a token to its boolean value, or `None` if it is not a literal
    /// of this alphabet.
    #[must_use]
    pub fn parse(self, token: &str) -> Option<bool> {
        match token {
            "0" => return Some(false),
            "1" => return Some(true),
            _ => {}
        }
        if self == Self::Digits {
            return None;
        }
        if token.eq_ignore_ascii_case("t") || token.eq_ignore_ascii_case("true") {
            Some(true)
        } else if token.eq_ignore_ascii_case("f") || token.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

/// Streaming loader producing a [`BinaryMatrix`].
///
/// # Example
///
/// ```
/// use oacheck::matrix::{CellAlphabet, MatrixLoader};
///
/// let m = MatrixLoader::new()
///     .alphabet(CellAlphabet::Lenient)
///     .load("T F\nF T\n".as_bytes())
///     .unwrap();
/// assert_eq!(m.runs(), 2);
/// assert!(m.get(0, 0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixLoader {
    alphabet: CellAlphabet,
}

impl MatrixLoader {
    /// Create a loader accepting only `0` and `1`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the accepted cell alphabet.
    #[must_use]
    pub fn alphabet(mut self, alphabet: CellAlphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    /// Read every line of `reader` and build the matrix.
    ///
    /// # Errors
    ///
    /// - [`Error::Io`] if reading fails
    /// - [`Error::MalformedCell`] for the first token outside the alphabet
    /// - [`Error::RaggedMatrix`] for the first row whose width differs from the first row
    /// - [`Error::EmptyMatrix`] if no non-blank line was read
    pub fn load<R: BufRead>(&self, reader: R) -> Result<BinaryMatrix> {
        let mut rows: Vec<Vec<bool>> = Vec::new();
        let mut width = None;

        for (line_idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = line_idx + 1;

            let row = self.parse_row(&line, line_no)?;
            if row.is_empty() {
                continue;
            }

            match width {
                None => width = Some(row.len()),
                Some(expected) if expected != row.len() => {
                    return Err(Error::RaggedMatrix {
                        row: rows.len() + 1,
                        line: line_no,
                        expected,
                        actual: row.len(),
                    });
                }
                Some(_) => {}
            }
            rows.push(row);
        }

        let factors = width.ok_or(Error::EmptyMatrix)?;
        tracing::debug!(runs = rows.len(), factors, "loaded matrix");
        Ok(BinaryMatrix::transpose(&rows, factors))
    }

    fn parse_row(&self, line: &str, line_no: usize) -> Result<Vec<bool>> {
        line.split_whitespace()
            .enumerate()
            .map(|(i, token)| {
                self.alphabet
                    .parse(token)
                    .ok_or_else(|| Error::malformed_cell(line_no, i + 1, token))
            })
            .collect()
    }
}
