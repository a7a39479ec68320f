//! Error types for retrofit.

use thiserror::Error;

/// Result type for retrofit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for retrofit operations.
///
/// Only resource failures and precondition violations show up here.
/// Malformed individual records (a vector line with an unparseable component,
/// an undecodable lexicon line) are skipped where they are read and never
/// surface as an `Error`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A vector does not have the dimensionality of the space it joins.
    #[error("Dimension mismatch{}: expected {expected}, found {found}", line_suffix(.line))]
    DimensionMismatch {
        /// Dimensionality fixed by the space (or the file header).
        expected: usize,
        /// Dimensionality of the offending vector.
        found: usize,
        /// 1-based source line, when the vector came from a file.
        line: Option<usize>,
    },

    /// A vector source produced no vectors at all.
    #[error("Empty vocabulary: {0}")]
    EmptyVocabulary(String),

    /// The relation graph names a word the vector space does not contain.
    #[error("Unknown word in relation graph: {0}")]
    UnknownWord(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be read or parsed.
    #[error("Config error: {0}")]
    Config(String),
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(" at line {l}")).unwrap_or_default()
}

impl Error {
    /// Create a dimension mismatch error without source position.
    #[must_use]
    pub fn dimension_mismatch(expected: usize, found: usize) -> Self {
        Self::DimensionMismatch {
            expected,
            found,
            line: None,
        }
    }

    /// Create an empty vocabulary error.
    #[must_use]
    pub fn empty_vocabulary(source: impl Into<String>) -> Self {
        Self::EmptyVocabulary(source.into())
    }

    /// Create an unknown word error.
    #[must_use]
    pub fn unknown_word(word: impl Into<String>) -> Self {
        Self::UnknownWord(word.into())
    }

    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a config error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Attach a 1-based source line to a dimension mismatch.
    ///
    /// Other variants are returned unchanged.
    #[must_use]
    pub fn at_line(self, line: usize) -> Self {
        match self {
            Self::DimensionMismatch {
                expected, found, ..
            } => Self::DimensionMismatch {
                expected,
                found,
                line: Some(line),
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_message() {
        let err = Error::dimension_mismatch(3, 2);
        assert_eq!(err.to_string(), "Dimension mismatch: expected 3, found 2");

        let err = err.at_line(7);
        assert_eq!(
            err.to_string(),
            "Dimension mismatch at line 7: expected 3, found 2"
        );
    }

    #[test]
    fn test_at_line_leaves_other_variants() {
        let err = Error::unknown_word("cat").at_line(3);
        assert!(matches!(err, Error::UnknownWord(ref w) if w == "cat"));
    }
}
