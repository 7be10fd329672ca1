//! Navigator
//!
//! Drives one navigation at a time through the resolver, moves the state
//! machine, commits the outcome to the [`CurrentLocation`] cell and keeps
//! the history stack.

use crate::config::RouterConfig;
use crate::history::History;
use crate::path::Location;
use crate::resolver::{ResolvedRoute, Resolver};
use crate::state::{CurrentLocation, NavState, Navigation, Outcome};
use crate::{Error, Result};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tally_router::RouteEntry;
use tracing::{debug, info, warn};

/// History update applied after a committed navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Record {
    Push,
    Replace,
    /// Move the history position by `delta` once committed
    Move(isize),
    Keep,
}

/// Sole writer of the current location
#[derive(Debug)]
pub struct Navigator<V> {
    resolver: Resolver<V>,
    location: Arc<CurrentLocation<V>>,
    history: Mutex<History>,
    /// Ticket of the last navigation written to history, 0 for none
    recorded: AtomicU64,
}

impl<V: Clone> Navigator<V> {
    pub fn new(resolver: Resolver<V>) -> Self {
        Self {
            resolver,
            location: Arc::new(CurrentLocation::new()),
            history: Mutex::new(History::new()),
            recorded: AtomicU64::new(0),
        }
    }

    /// Build the route table and a navigator over it
    pub fn from_routes(routes: Vec<RouteEntry<V>>, config: RouterConfig) -> Result<Self> {
        Ok(Self::new(Resolver::new(routes, config)?))
    }

    /// Read handle for the rendering layer
    pub fn location(&self) -> Arc<CurrentLocation<V>> {
        self.location.clone()
    }

    pub fn resolver(&self) -> &Resolver<V> {
        &self.resolver
    }

    pub fn current(&self) -> Option<Arc<Navigation<V>>> {
        self.location.current()
    }

    pub fn state(&self) -> NavState {
        self.location.state()
    }

    /// Snapshot of the history stack
    pub fn history(&self) -> History {
        self.history.lock().clone()
    }

    /// Whether the committed navigation pushed or replaced a history entry
    ///
    /// False for failed navigations and paths outside the base.
    pub fn recorded_current(&self) -> bool {
        let recorded = self.recorded.load(Ordering::Acquire);
        recorded != 0 && self.current().is_some_and(|nav| nav.id == recorded)
    }

    /// Resolve a browser path (base included) and commit the outcome
    ///
    /// A not-found path still commits a NotFound outcome so the rendering
    /// layer can show its not-found view; the error is returned as well.
    pub fn navigate(&self, raw: &str) -> Result<ResolvedRoute<V>> {
        self.run(raw, self.resolver.locate(raw), Record::Keep)
    }

    /// Navigate and add a history entry
    pub fn push(&self, raw: &str) -> Result<ResolvedRoute<V>> {
        self.run(raw, self.resolver.locate(raw), Record::Push)
    }

    /// Navigate and overwrite the current history entry
    pub fn replace(&self, raw: &str) -> Result<ResolvedRoute<V>> {
        self.run(raw, self.resolver.locate(raw), Record::Replace)
    }

    /// Navigate to a named route
    pub fn push_named(&self, name: &str, params: &[(&str, &str)]) -> Result<ResolvedRoute<V>> {
        let path = self.resolver.url_for(name, params)?;
        self.run(&path, Some(Location::parse(&path)), Record::Push)
    }

    /// Step back one entry; `None` at the start of history
    pub fn back(&self) -> Option<Result<ResolvedRoute<V>>> {
        self.go(-1)
    }

    /// Step forward one entry; `None` at the end of history
    pub fn forward(&self) -> Option<Result<ResolvedRoute<V>>> {
        self.go(1)
    }

    /// Move `delta` entries through history and resolve the entry there
    ///
    /// The position only moves once the navigation commits.
    pub fn go(&self, delta: isize) -> Option<Result<ResolvedRoute<V>>> {
        let target = self.history.lock().peek(delta).map(str::to_string)?;
        Some(self.run(&target, Some(Location::parse(&target)), Record::Move(delta)))
    }

    /// Jump to the history entry at `index`
    pub fn go_to(&self, index: usize) -> Option<Result<ResolvedRoute<V>>> {
        let position = self.history.lock().position();
        let delta = isize::try_from(index).ok()? - isize::try_from(position).ok()?;
        self.go(delta)
    }

    fn run(
        &self,
        requested: &str,
        location: Option<Location>,
        record: Record,
    ) -> Result<ResolvedRoute<V>> {
        let ticket = self.location.begin();
        debug!(ticket, path = requested, state = %NavState::Resolving, "navigation started");

        let mut redirects = Vec::new();
        let resolved = match location.clone() {
            Some(location) => self.resolver.follow_from(location, |from, to| {
                redirects.push(from.to_string());
                self.location.transition(ticket, NavState::Redirecting);
                debug!(ticket, from, to, state = %NavState::Redirecting, "redirect matched");
                self.location.transition(ticket, NavState::Resolving);
            }),
            None => Err(Error::NoMatch {
                path: requested.to_string(),
            }),
        };

        let outcome = match &resolved {
            Ok(route) => Outcome::Resolved(route.clone()),
            Err(Error::NoMatch { path }) => {
                warn!(ticket, path = %path, "no route matches");
                Outcome::NotFound { path: path.clone() }
            }
            Err(err) => {
                warn!(ticket, path = requested, error = %err, "navigation aborted");
                Outcome::Failed(err.clone())
            }
        };

        // Entry recorded in history; failed navigations leave the URL alone
        let entry = match &outcome {
            Outcome::Resolved(route) => Some(route.full_path()),
            Outcome::NotFound { .. } => location.as_ref().map(Location::full_path),
            Outcome::Failed(_) => None,
        };

        let navigation = Navigation {
            id: ticket,
            requested: requested.to_string(),
            redirects,
            outcome,
        };
        let state = navigation.state();

        let Some(committed) = self.location.commit(navigation) else {
            debug!(ticket, path = requested, "navigation superseded");
            return Err(Error::Superseded {
                path: requested.to_string(),
            });
        };
        info!(ticket, path = requested, state = %state, redirects = committed.redirects.len(), "navigation committed");

        if let Some(entry) = entry {
            let mut history = self.history.lock();
            // A listener may already have navigated elsewhere
            if self.location.is_latest(ticket) {
                match record {
                    Record::Push => history.push(entry),
                    Record::Replace => history.replace(entry),
                    Record::Move(delta) => {
                        history.go(delta);
                    }
                    Record::Keep => {}
                }
                if matches!(record, Record::Push | Record::Replace) {
                    self.recorded.store(ticket, Ordering::Release);
                }
            }
        }

        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    }

    fn navigator() -> Navigator<&'static str> {
        init_logging();
        Navigator::from_routes(
            vec![RouteEntry::new("/")
                .view("Home")
                .redirect("/list")
                .child(RouteEntry::new("list").view("List"))
                .child(RouteEntry::new("vote").redirect("/list"))
                .child(RouteEntry::new("vote/:vid").name("vote").view("Vote"))
                .child(RouteEntry::new("loop").redirect("/loop"))],
            RouterConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_navigate_commits_resolved() {
        let nav = navigator();
        assert_eq!(nav.state(), NavState::Idle);

        let route = nav.navigate("/").unwrap();
        assert_eq!(route.view, "List");
        assert_eq!(nav.state(), NavState::Resolved);

        let current = nav.current().unwrap();
        assert_eq!(current.requested, "/");
        assert_eq!(current.redirected_from(), Some("/"));
        assert_eq!(current.route(), Some(&route));
    }

    #[test]
    fn test_not_found_is_committed() {
        let nav = navigator();
        let err = nav.navigate("/unknown").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(nav.state(), NavState::NotFound);
        assert_eq!(
            nav.current().unwrap().outcome,
            Outcome::NotFound {
                path: "/unknown".to_string()
            }
        );
    }

    #[test]
    fn test_redirect_cycle_fails_navigation() {
        let nav = navigator();
        let err = nav.navigate("/loop").unwrap_err();
        assert!(matches!(err, Error::RedirectCycle { .. }));
        assert_eq!(nav.state(), NavState::Failed);
        assert_eq!(nav.current().unwrap().outcome, Outcome::Failed(err));
    }

    #[test]
    fn test_ids_increase_per_navigation() {
        let nav = navigator();
        nav.navigate("/list").unwrap();
        let first = nav.current().unwrap().id;
        nav.navigate("/vote/3").unwrap();
        let second = nav.current().unwrap().id;
        assert!(second > first);
        assert_eq!(nav.current().unwrap().route().unwrap().param("vid"), Some("3"));
    }

    #[test]
    fn test_subscribers_notified_once_per_navigation() {
        let nav = navigator();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        nav.location().subscribe(move |navigation| {
            assert!(navigation.state().is_terminal());
            seen.fetch_add(1, Ordering::SeqCst);
        });

        nav.navigate("/vote").unwrap();
        nav.navigate("/nowhere").unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_listener_navigation_supersedes() {
        let nav = Arc::new(navigator());
        let inner = Arc::downgrade(&nav);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();

        nav.location().subscribe(move |navigation| {
            log.lock().push(navigation.requested.clone());
            // Send not-found visitors back to the list
            if navigation.state() == NavState::NotFound {
                if let Some(nav) = inner.upgrade() {
                    let _ = nav.push("/list");
                }
            }
        });

        nav.push("/vote/1").unwrap();
        let err = nav.push("/missing").unwrap_err();
        assert!(err.is_not_found());

        assert_eq!(nav.current().unwrap().requested, "/list");
        assert_eq!(
            *seen.lock(),
            vec!["/vote/1".to_string(), "/missing".to_string(), "/list".to_string()]
        );
        // The superseded not-found entry never reached history
        assert_eq!(
            nav.history().entries(),
            &["/vote/1".to_string(), "/list".to_string()]
        );
    }

    #[test]
    fn test_history_push_back_forward() {
        let nav = navigator();
        nav.push("/").unwrap();
        nav.push("/vote/1?tab=results").unwrap();
        nav.push("/vote/2").unwrap();

        // Redirects record where they landed
        assert_eq!(
            nav.history().entries(),
            &[
                "/list".to_string(),
                "/vote/1?tab=results".to_string(),
                "/vote/2".to_string(),
            ]
        );

        let route = nav.back().unwrap().unwrap();
        assert_eq!(route.param("vid"), Some("1"));
        assert_eq!(route.query_value("tab"), Some("results"));

        assert_eq!(nav.back().unwrap().unwrap().view, "List");
        assert!(nav.back().is_none());

        assert_eq!(nav.forward().unwrap().unwrap().param("vid"), Some("1"));
        assert_eq!(nav.go(1).unwrap().unwrap().param("vid"), Some("2"));
        assert!(nav.forward().is_none());
    }

    #[test]
    fn test_replace_and_failed_history() {
        let nav = navigator();
        nav.push("/vote/1").unwrap();
        nav.replace("/vote/2").unwrap();
        nav.push("/loop").unwrap_err();
        nav.push("/gone").unwrap_err();

        assert_eq!(
            nav.history().entries(),
            &["/vote/2".to_string(), "/gone".to_string()]
        );
    }

    #[test]
    fn test_push_named() {
        let nav = navigator();
        let route = nav.push_named("vote", &[("vid", "77")]).unwrap();
        assert_eq!(route.view, "Vote");
        assert_eq!(nav.history().current(), Some("/vote/77"));

        assert_eq!(
            nav.push_named("vote", &[]),
            Err(Error::MissingRequiredParameter {
                route: "vote".to_string(),
                param: "vid".to_string(),
            })
        );
    }

    #[test]
    fn test_outside_base_is_not_found() {
        init_logging();
        let nav = Navigator::from_routes(
            vec![RouteEntry::new("/list").view("List")],
            RouterConfig::new().base("/app"),
        )
        .unwrap();

        assert_eq!(nav.navigate("/app/list").unwrap().view, "List");
        assert!(nav.navigate("/list").unwrap_err().is_not_found());
        assert_eq!(nav.state(), NavState::NotFound);
    }

    #[test]
    fn test_redirect_moves_through_redirecting() {
        let nav = navigator();
        let states = Arc::new(Mutex::new(Vec::new()));
        let log = states.clone();
        nav.location().subscribe_state(move |state| log.lock().push(state));

        nav.navigate("/vote").unwrap();
        assert_eq!(
            *states.lock(),
            vec![
                NavState::Resolving,
                NavState::Redirecting,
                NavState::Resolving,
                NavState::Resolved,
            ]
        );

        states.lock().clear();
        nav.navigate("/vote/5").unwrap();
        assert_eq!(*states.lock(), vec![NavState::Resolving, NavState::Resolved]);
    }

    #[test]
    fn test_recorded_current() {
        init_logging();
        let nav = Navigator::from_routes(
            vec![
                RouteEntry::new("/list").view("List"),
                RouteEntry::new("/loop").redirect("/loop"),
            ],
            RouterConfig::new().base("/app"),
        )
        .unwrap();
        assert!(!nav.recorded_current());

        nav.push("/app/list").unwrap();
        assert!(nav.recorded_current());

        // Outside the base: rendered as not found, history untouched
        assert!(nav.push("/elsewhere").unwrap_err().is_not_found());
        assert_eq!(nav.state(), NavState::NotFound);
        assert!(!nav.recorded_current());
        assert_eq!(nav.history().entries(), &["/list".to_string()]);

        assert!(nav.push("/app/missing").unwrap_err().is_not_found());
        assert!(nav.recorded_current());

        nav.replace("/app/loop").unwrap_err();
        assert!(!nav.recorded_current());
        assert_eq!(nav.history().current(), Some("/missing"));
    }

    #[test]
    fn test_superseded_go_keeps_position() {
        let nav = Arc::new(navigator());
        nav.push("/list").unwrap();
        nav.push("/vote/1").unwrap();

        let armed = Arc::new(std::sync::atomic::AtomicBool::new(true));
        let inner = Arc::downgrade(&nav);
        let trigger = armed.clone();
        nav.location().subscribe(move |_| {
            if trigger.swap(false, Ordering::SeqCst) {
                if let Some(nav) = inner.upgrade() {
                    let _ = nav.navigate("/vote/1");
                }
            }
        });

        assert_eq!(nav.back().unwrap().unwrap().view, "List");
        assert!(!armed.load(Ordering::SeqCst));
        assert_eq!(nav.current().unwrap().requested, "/vote/1");
        assert_eq!(nav.history().position(), 1);
        assert_eq!(nav.history().current(), Some("/vote/1"));
    }

    #[test]
    fn test_go_to_index() {
        let nav = navigator();
        nav.push("/list").unwrap();
        nav.push("/vote/1").unwrap();
        nav.push("/vote/2").unwrap();

        assert_eq!(nav.go_to(0).unwrap().unwrap().view, "List");
        assert_eq!(nav.history().position(), 0);
        assert!(nav.go_to(7).is_none());
        assert_eq!(nav.go_to(2).unwrap().unwrap().param("vid"), Some("2"));

        nav.go_to(1).unwrap().unwrap();
        nav.push("/vote/9").unwrap();
        assert_eq!(
            nav.history().entries(),
            &["/list".to_string(), "/vote/1".to_string(), "/vote/9".to_string()]
        );
    }
}
