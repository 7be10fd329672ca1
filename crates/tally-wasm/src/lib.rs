//! tally-wasm: Browser bindings for the tally router
//!
//! Exposes the navigator to the JavaScript rendering layer and keeps the
//! browser URL in sync with committed navigations.

pub mod outcome;

#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::*;

pub use outcome::NavOutcome;
pub use tally_core::{HistoryMode, NavState, RouterConfig, View};
