//! Parse failures.

use std::fmt;

/// Why a catalog could not be loaded.
///
/// Offsets are byte offsets into the input; lines are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input is not valid UTF-8.
    Encoding { offset: usize },
    /// The input is not well-formed XML.
    Syntax {
        offset: usize,
        line: usize,
        message: String,
    },
    /// Well-formed XML that does not describe a catalog.
    MalformedStructure {
        offset: usize,
        line: usize,
        reason: String,
    },
}

impl ParseError {
    /// Byte offset of the failure.
    #[must_use]
    pub fn offset(&self) -> usize {
        match self {
            Self::Encoding { offset }
            | Self::Syntax { offset, .. }
            | Self::MalformedStructure { offset, .. } => *offset,
        }
    }

    /// 1-based line of the failure, when known.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Encoding { .. } => None,
            Self::Syntax { line, .. } | Self::MalformedStructure { line, .. } => Some(*line),
        }
    }

    #[must_use]
    pub fn is_malformed_structure(&self) -> bool {
        matches!(self, Self::MalformedStructure { .. })
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encoding { offset } => write!(f, "invalid UTF-8 at byte {offset}"),
            Self::Syntax { line, message, .. } => {
                write!(f, "XML syntax error at line {line}: {message}")
            }
            Self::MalformedStructure { line, reason, .. } => {
                write!(f, "malformed catalog at line {line}: {reason}")
            }
        }
    }
}

impl std::error::Error for ParseError {}
