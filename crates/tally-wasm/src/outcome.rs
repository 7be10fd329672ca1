//! Flat navigation result for the JS side
//!
//! Params travel as a flat `[name, value, name, value, ...]` list.

use tally_core::{NavState, Navigation, Outcome, View};

/// Navigation outcome without nested Rust types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavOutcome {
    pub state: NavState,
    /// View to render, `None` unless resolved
    pub view: Option<View>,
    /// Shell-to-leaf view chain
    pub matched: Vec<View>,
    /// Route name
    pub name: Option<String>,
    /// In-app path that was rendered (or not found)
    pub path: String,
    /// Path with query and hash, for the address bar
    pub full_path: String,
    /// Flattened params
    pub params: Vec<String>,
    /// Why the navigation failed
    pub error: Option<String>,
}

impl NavOutcome {
    pub fn from_navigation(navigation: &Navigation<View>) -> Self {
        match &navigation.outcome {
            Outcome::Resolved(route) => NavOutcome {
                state: NavState::Resolved,
                view: Some(route.view),
                matched: route.matched.clone(),
                name: route.name.clone(),
                path: route.path.clone(),
                full_path: route.full_path(),
                params: route
                    .params
                    .iter()
                    .flat_map(|(k, v)| [k.clone(), v.clone()])
                    .collect(),
                error: None,
            },
            Outcome::NotFound { path } => NavOutcome {
                state: NavState::NotFound,
                view: None,
                matched: Vec::new(),
                name: None,
                path: path.clone(),
                full_path: path.clone(),
                params: Vec::new(),
                error: None,
            },
            Outcome::Failed(err) => NavOutcome {
                state: NavState::Failed,
                view: None,
                matched: Vec::new(),
                name: None,
                path: navigation.requested.clone(),
                full_path: navigation.requested.clone(),
                params: Vec::new(),
                error: Some(err.to_string()),
            },
        }
    }

    pub fn found(&self) -> bool {
        self.state == NavState::Resolved
    }

    /// Look up a param in the flat list
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .chunks_exact(2)
            .find(|pair| pair[0] == name)
            .map(|pair| pair[1].as_str())
    }

    /// View names, shell first
    pub fn matched_names(&self) -> Vec<String> {
        self.matched.iter().map(|v| v.as_str().to_string()).collect()
    }
}

/// Unflatten `[name, value, ...]`; a dangling name is dropped
pub fn pairs(flat: &[String]) -> Vec<(&str, &str)> {
    flat.chunks_exact(2)
        .map(|pair| (pair[0].as_str(), pair[1].as_str()))
        .collect()
}

/// Call each listener in turn while navigation `id` is still the latest
///
/// A listener that navigates makes the rest of the round stale; the newer
/// navigation notifies everyone itself.
pub fn notify_latest<L, C, F>(listeners: &[L], id: u64, latest: C, mut call: F)
where
    C: Fn() -> Option<u64>,
    F: FnMut(&L),
{
    for listener in listeners {
        if latest() != Some(id) {
            break;
        }
        call(listener);
    }
}
