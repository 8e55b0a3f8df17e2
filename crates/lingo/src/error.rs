//! Errors from loading catalogs into a store.

use std::fmt;

use lingo_catalog::ParseError;

/// A catalog could not replace the one currently served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The new catalog bytes did not parse.
    Parse(ParseError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "catalog rejected: {err}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<ParseError> for LoadError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}
