//! Error types for the notation codecs.

use thiserror::Error;

/// Structural failure of a parser.
///
/// Parsers never panic on input; they return one of these so that callers
/// can fall back to the next notation or report the failing line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed SFEN: {0}")]
    Sfen(String),

    #[error("malformed move: {0}")]
    Move(String),

    #[error("malformed USI position: {0}")]
    Usi(String),

    #[error("KIF line {line}: {reason}")]
    Kif { line: usize, reason: String },

    #[error("CSA line {line}: {reason}")]
    Csa { line: usize, reason: String },

    #[error("malformed BOD diagram: {0}")]
    Bod(String),

    #[error("{0} parsing is not supported")]
    Unsupported(&'static str),

    #[error("no notation matched the input")]
    NoMatch,
}

impl ParseError {
    /// Returns the 1-based line of line-oriented formats.
    pub fn line(&self) -> Option<usize> {
        match *self {
            ParseError::Kif { line, .. } | ParseError::Csa { line, .. } => Some(line),
            _ => None,
        }
    }

    pub(crate) fn kif(line: usize, reason: impl Into<String>) -> Self {
        ParseError::Kif {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn csa(line: usize, reason: impl Into<String>) -> Self {
        ParseError::Csa {
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_numbers() {
        assert_eq!(Some(3), ParseError::kif(3, "bad move").line());
        assert_eq!(Some(7), ParseError::csa(7, "bad move").line());
        assert_eq!(None, ParseError::NoMatch.line());
    }

    #[test]
    fn messages() {
        assert_eq!("KIF line 3: bad move", ParseError::kif(3, "bad move").to_string());
        assert_eq!(
            "KI2 parsing is not supported",
            ParseError::Unsupported("KI2").to_string()
        );
    }
}
