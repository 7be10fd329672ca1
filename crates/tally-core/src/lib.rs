//! tally-core: Route resolution for the tally front-end
//!
//! Shared between the WASM bindings and native tests.
//!
//! - [`Resolver`] - matches paths, follows redirects, applies the base path
//! - [`CurrentLocation`] - single-writer cell the rendering layer reads
//! - [`Navigator`] - drives navigations, state machine and history
//! - [`app`] - the application's route table

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod app;
pub mod config;
pub mod error;
pub mod history;
pub mod navigator;
pub mod path;
pub mod resolver;
pub mod state;

// Re-exports
pub use error::{Error, Result};
pub use config::{HistoryMode, RouterConfig, DEFAULT_MAX_REDIRECTS};
pub use history::History;
pub use navigator::Navigator;
pub use path::{Location, Query};
pub use resolver::{Followed, Resolution, ResolvedRoute, Resolver};
pub use state::{CurrentLocation, NavState, Navigation, Outcome, SubscriptionId};
pub use app::View;

// Route tree re-exports
pub use tally_router::{Pattern, RouteEntry, RouteTable, Segment, TableError};
