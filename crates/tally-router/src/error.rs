//! Route table construction errors

use std::fmt;

/// Errors raised while building a [`RouteTable`](crate::RouteTable)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A `:` segment without a name, e.g. `/vote/:`
    EmptyParamName(String),
    /// A catch-all segment followed by more segments
    CatchAllNotLast(String),
    /// The same parameter name captured twice along one path
    DuplicateParam { pattern: String, name: String },
    /// Two entries registered under the same route name
    DuplicateName(String),
    /// Entry with no view, no redirect and no children
    MissingTarget(String),
    /// Redirect target uses a parameter the source pattern never captures
    UnboundRedirectParam { pattern: String, name: String },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::EmptyParamName(path) => {
                write!(f, "empty parameter name in pattern {}", path)
            }
            TableError::CatchAllNotLast(path) => {
                write!(f, "catch-all must be the last segment in {}", path)
            }
            TableError::DuplicateParam { pattern, name } => {
                write!(f, "parameter :{} appears twice in {}", name, pattern)
            }
            TableError::DuplicateName(name) => write!(f, "route name {} is already taken", name),
            TableError::MissingTarget(path) => {
                write!(f, "route {} has no view, redirect or children", path)
            }
            TableError::UnboundRedirectParam { pattern, name } => {
                write!(f, "redirect from {} uses :{} which it does not capture", pattern, name)
            }
        }
    }
}

impl std::error::Error for TableError {}
