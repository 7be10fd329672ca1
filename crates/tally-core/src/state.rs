//! Current location cell
//!
//! Holds the outcome of the latest navigation for the rendering layer.
//! Only the [`Navigator`](crate::Navigator) writes to it; views read it and
//! subscribe to changes.
//!
//! Every navigation takes a ticket. Only the holder of the newest ticket may
//! move the state machine or commit, so a superseded navigation leaves no
//! trace.

use crate::resolver::ResolvedRoute;
use crate::Error;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Navigation state machine
///
/// `Idle -> Resolving -> (Redirecting -> Resolving)* -> Resolved | NotFound | Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Idle,
    Resolving,
    Redirecting,
    Resolved,
    NotFound,
    Failed,
}

impl NavState {
    /// Resolved, NotFound and Failed end a navigation cycle
    pub fn is_terminal(&self) -> bool {
        matches!(self, NavState::Resolved | NavState::NotFound | NavState::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NavState::Idle => "idle",
            NavState::Resolving => "resolving",
            NavState::Redirecting => "redirecting",
            NavState::Resolved => "resolved",
            NavState::NotFound => "not_found",
            NavState::Failed => "failed",
        }
    }
}

impl std::fmt::Display for NavState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a navigation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<V> {
    /// Render this route
    Resolved(ResolvedRoute<V>),
    /// Render the not-found view
    NotFound { path: String },
    /// Navigation aborted (redirect cycle, missing parameter)
    Failed(Error),
}

/// One committed navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation<V> {
    /// Ticket of the navigation, increasing
    pub id: u64,
    /// Path as requested
    pub requested: String,
    /// Paths that redirected on the way, in order
    pub redirects: Vec<String>,
    pub outcome: Outcome<V>,
}

impl<V> Navigation<V> {
    pub fn route(&self) -> Option<&ResolvedRoute<V>> {
        match &self.outcome {
            Outcome::Resolved(route) => Some(route),
            _ => None,
        }
    }

    /// Terminal state this navigation ended in
    pub fn state(&self) -> NavState {
        match self.outcome {
            Outcome::Resolved(_) => NavState::Resolved,
            Outcome::NotFound { .. } => NavState::NotFound,
            Outcome::Failed(_) => NavState::Failed,
        }
    }

    /// First path of the redirect chain
    pub fn redirected_from(&self) -> Option<&str> {
        self.redirects.first().map(|s| s.as_str())
    }
}

/// Handle returned by [`CurrentLocation::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Change listener
pub type Listener<V> = Arc<dyn Fn(&Navigation<V>) + Send + Sync>;

/// State machine listener, sees every transition including intermediate ones
pub type StateListener = Arc<dyn Fn(NavState) + Send + Sync>;

struct Cell<V> {
    state: NavState,
    /// Newest ticket handed out
    ticket: u64,
    current: Option<Arc<Navigation<V>>>,
}

/// Single-writer cell holding the latest navigation
pub struct CurrentLocation<V> {
    cell: RwLock<Cell<V>>,
    listeners: Mutex<Vec<(SubscriptionId, Listener<V>)>>,
    state_listeners: Mutex<Vec<(SubscriptionId, StateListener)>>,
    next_listener: AtomicU64,
}

impl<V> CurrentLocation<V> {
    pub fn new() -> Self {
        Self {
            cell: RwLock::new(Cell {
                state: NavState::Idle,
                ticket: 0,
                current: None,
            }),
            listeners: Mutex::new(Vec::new()),
            state_listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(1),
        }
    }

    /// Latest committed navigation
    pub fn current(&self) -> Option<Arc<Navigation<V>>> {
        self.cell.read().current.clone()
    }

    pub fn state(&self) -> NavState {
        self.cell.read().state
    }

    /// Call `listener` after every committed navigation
    ///
    /// Listeners run outside any lock and may start a new navigation.
    pub fn subscribe(
        &self,
        listener: impl Fn(&Navigation<V>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// Call `listener` on every state machine transition
    pub fn subscribe_state(&self, listener: impl Fn(NavState) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.state_listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener; false if it was already gone
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock();
        let mut state_listeners = self.state_listeners.lock();
        let before = listeners.len() + state_listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        state_listeners.retain(|(existing, _)| *existing != id);
        listeners.len() + state_listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.lock().len() + self.state_listeners.lock().len()
    }

    /// Start a navigation, superseding any in flight
    pub(crate) fn begin(&self) -> u64 {
        let ticket = {
            let mut cell = self.cell.write();
            cell.ticket += 1;
            cell.state = NavState::Resolving;
            cell.ticket
        };
        self.notify_state(NavState::Resolving);
        ticket
    }

    /// Move the state machine if `ticket` is still the newest
    pub(crate) fn transition(&self, ticket: u64, state: NavState) -> bool {
        {
            let mut cell = self.cell.write();
            if cell.ticket != ticket {
                return false;
            }
            cell.state = state;
        }
        self.notify_state(state);
        true
    }

    fn notify_state(&self, state: NavState) {
        let listeners: Vec<StateListener> = self
            .state_listeners
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            (*listener)(state);
        }
    }

    pub(crate) fn is_latest(&self, ticket: u64) -> bool {
        self.cell.read().ticket == ticket
    }

    /// Replace the current navigation and notify listeners
    ///
    /// Returns `None` when a newer navigation has begun.
    pub(crate) fn commit(&self, navigation: Navigation<V>) -> Option<Arc<Navigation<V>>> {
        let ticket = navigation.id;
        let navigation = Arc::new(navigation);
        {
            let mut cell = self.cell.write();
            if cell.ticket != ticket {
                return None;
            }
            cell.state = navigation.state();
            cell.current = Some(navigation.clone());
        }
        self.notify_state(navigation.state());

        let listeners: Vec<Listener<V>> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            // A listener may have started a newer navigation
            if !self.is_latest(ticket) {
                break;
            }
            (*listener)(&*navigation);
        }

        Some(navigation)
    }
}

impl<V> Default for CurrentLocation<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for CurrentLocation<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cell = self.cell.read();
        f.debug_struct("CurrentLocation")
            .field("state", &cell.state)
            .field("ticket", &cell.ticket)
            .field("subscribers", &self.listeners.lock().len())
            .finish()
    }
}
