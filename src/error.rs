//! Error types for the oacheck library.
//!
//! Every variant here is fatal to a run and is raised before the
//! verification loop starts. A matrix that simply fails the orthogonality
//! check is not an error; see [`crate::verify::Verdict`].

use thiserror::Error;

/// The main error type for the oacheck library.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ============ Input Errors ============
    /// A cell token is not a recognized boolean literal.
    #[error("line {line}, column {column}: malformed cell {token:?} (expected a binary literal)")]
    MalformedCell {
        /// 1-based line number in the input stream.
        line: usize,
        /// 1-based position of the token within its line.
        column: usize,
        /// The offending token.
        token: String,
    },

    /// Rows of unequal length.
    #[error("row {row} (line {line}) has {actual} cells, expected {expected}")]
    RaggedMatrix {
        /// 1-based data row index (blank lines are not counted).
        row: usize,
        /// 1-based line number in the input stream.
        line: usize,
        /// Width established by the first row.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
    },

    /// The input contained no rows.
    #[error("matrix is empty: no non-blank rows in input")]
    EmptyMatrix,

    /// Reading the input stream failed.
    #[error("failed to read input: {message}")]
    Io {
        /// The underlying I/O error message.
        message: String,
    },

    // ============ Parameter Validation Errors ============
    /// The requested strength is outside `1..=factors`.
    #[error("strength {strength} is invalid for a {factors}-column matrix (valid range: 1..={factors})")]
    InvalidStrength {
        /// The requested strength.
        strength: u32,
        /// Number of columns of the matrix.
        factors: usize,
    },

    /// The number of column subsets to scan exceeds the configured ceiling.
    #[error(
        "checking strength {strength} on {factors} columns needs {} column subsets, over the limit of {ceiling}",
        display_subsets(.subsets)
    )]
    InfeasibleConfiguration {
        /// Number of columns of the matrix.
        factors: usize,
        /// The requested strength.
        strength: u32,
        /// Total subsets over weights `1..=strength`, `None` on overflow.
        subsets: Option<u64>,
        /// The configured ceiling.
        ceiling: u64,
    },

    /// Index is out of bounds.
    #[error("index {index} is out of bounds for size {size}")]
    IndexOutOfBounds {
        /// The invalid index.
        index: usize,
        /// The maximum valid size.
        size: usize,
    },
}

fn display_subsets(subsets: &Option<u64>) -> String {
    subsets.map_or_else(|| "more than 2^64".to_string(), |n| n.to_string())
}

/// A specialized `Result` type for oacheck operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

impl Error {
    /// Create a new `MalformedCell` error.
    #[must_use]
    pub fn malformed_cell(line: usize, column: usize, token: impl Into<String>) -> Self {
        Self::MalformedCell {
            line,
            column,
            token: token.into(),
        }
    }

    /// Whether the error stems from the input matrix rather than the parameters.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedCell { .. } | Self::RaggedMatrix { .. } | Self::EmptyMatrix | Self::Io { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::malformed_cell(3, 2, "2");
        assert!(err.to_string().contains("line 3"));
        assert!(err.to_string().contains("\"2\""));

        let err = Error::RaggedMatrix {
            row: 4,
            line: 6,
            expected: 2,
            actual: 3,
        };
        assert!(err.to_string().contains("row 4"));
        assert!(err.to_string().contains("expected 2"));

        let err = Error::InvalidStrength {
            strength: 5,
            factors: 3,
        };
        assert!(err.to_string().contains("strength 5"));
        assert!(err.to_string().contains("1..=3"));
    }

    #[test]
    fn test_infeasible_display() {
        let err = Error::InfeasibleConfiguration {
            factors: 40,
            strength: 20,
            subsets: Some(1_000),
            ceiling: 10,
        };
        assert!(err.to_string().contains("1000"));

        let err = Error::InfeasibleConfiguration {
            factors: 200,
            strength: 100,
            subsets: None,
            ceiling: 10,
        };
        assert!(err.to_string().contains("2^64"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stream closed");
        let err: Error = io.into();
        assert!(err.is_input_error());
        assert!(err.to_string().contains("stream closed"));
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(Error::EmptyMatrix, Error::EmptyMatrix);
        assert_ne!(
            Error::InvalidStrength {
                strength: 0,
                factors: 2
            },
            Error::InvalidStrength {
                strength: 3,
                factors: 2
            }
        );
        assert!(!Error::InvalidStrength {
            strength: 0,
            factors: 2
        }
        .is_input_error());
    }
}
