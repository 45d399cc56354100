//! Error types for statement parsing.

use thiserror::Error;

/// Result type alias for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that abort parsing of a statement file.
///
/// None of these are recoverable: the first one raised ends the parse.
#[derive(Error, Debug)]
pub enum ParseError {
    /// A data row does not have the fixed number of columns
    #[error("Wrong number of fields in line {line}! Found {found} fields but should be {expected}!")]
    Structural {
        line: usize,
        found: usize,
        expected: usize,
    },

    /// A data row belongs to another account than the first data row
    #[error("AccountID does not match on all lines! Line {line} has {found} but file started with {expected}")]
    AccountMismatch {
        line: usize,
        found: String,
        expected: String,
    },

    /// A data row is in another currency than the first data row
    #[error("Currency does not match on all lines! Line {line} has {found} but file started with {expected}")]
    CurrencyMismatch {
        line: usize,
        found: String,
        expected: String,
    },

    /// Memo starts with a known prefix but lacks the mandatory detail
    #[error("Cannot parse {pattern} info in line {line}. ({memo})")]
    PatternMismatch {
        line: usize,
        pattern: &'static str,
        memo: String,
    },

    /// Date column is not `DD/MM/YYYY`
    #[error("Invalid date in line {line}: {value:?}")]
    InvalidDate { line: usize, value: String },

    /// Amount column is not a decimal number
    #[error("Invalid amount in line {line}: {value:?}")]
    InvalidAmount { line: usize, value: String },

    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A row could not be split (invalid UTF-8, ...)
    #[error("CSV parsing error in line {line}: {source}")]
    Csv {
        line: usize,
        #[source]
        source: csv::Error,
    },

    /// Failed to write statement lines as CSV
    #[error("CSV writing error: {0}")]
    Write(#[from] csv::Error),
}

impl ParseError {
    /// Returns the 1-based line the error was raised at, if it is row-level.
    ///
    /// Lines are counted as records: blank lines in the file are not counted.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Structural { line, .. }
            | ParseError::AccountMismatch { line, .. }
            | ParseError::CurrencyMismatch { line, .. }
            | ParseError::PatternMismatch { line, .. }
            | ParseError::InvalidDate { line, .. }
            | ParseError::InvalidAmount { line, .. }
            | ParseError::Csv { line, .. } => Some(*line),
            ParseError::Io(_) | ParseError::Write(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_message_cites_counts() {
        let err = ParseError::Structural {
            line: 3,
            found: 17,
            expected: 18,
        };
        assert_eq!(
            err.to_string(),
            "Wrong number of fields in line 3! Found 17 fields but should be 18!"
        );
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn test_pattern_mismatch_contains_memo() {
        let err = ParseError::PatternMismatch {
            line: 7,
            pattern: "savings",
            memo: "AUTOMATISCH SPAREN NAAR".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("savings"));
        assert!(msg.contains("(AUTOMATISCH SPAREN NAAR)"));
    }

    #[test]
    fn test_io_error_has_no_line() {
        let err = ParseError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.line(), None);
    }
}
