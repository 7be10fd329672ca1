//! Error types for tally-core

use tally_router::TableError;
use thiserror::Error;

/// Result type alias for tally operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for route resolution and navigation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// No route matches the path
    #[error("No route matches {path}")]
    NoMatch { path: String },

    /// Redirect chain revisited a path or exceeded the hop limit
    #[error("Redirect cycle at {path} after {hops} hops")]
    RedirectCycle { path: String, hops: usize },

    /// A path needs a parameter that was not supplied
    #[error("Missing required parameter :{param} for {route}")]
    MissingRequiredParameter { route: String, param: String },

    /// No route registered under this name
    #[error("Unknown route name: {0}")]
    UnknownRoute(String),

    /// A newer navigation started before this one committed
    #[error("Navigation to {path} was superseded")]
    Superseded { path: String },

    /// The route table could not be built
    #[error("Invalid route table: {0}")]
    InvalidRoute(#[from] TableError),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Whether the rendering layer should show its not-found view
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NoMatch { .. })
    }
}
