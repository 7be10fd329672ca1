//! The tally front-end's route table
//!
//! ```text
//! /            name=home  view=Home  redirect=/list
//!   list                  view=List
//!   vote                  redirect=/list
//!   vote/:vid  name=vote  view=Vote
//! ```
//!
//! `Home` is the outer shell; `List` and `Vote` render inside it.

use crate::config::RouterConfig;
use crate::navigator::Navigator;
use crate::resolver::Resolver;
use crate::Result;
use tally_router::RouteEntry;

/// Parameter carrying the topic id on the vote screen
pub const VOTE_ID_PARAM: &str = "vid";

/// Screens of the voting front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// Outer shell
    Home,
    /// Topic list
    List,
    /// Voting screen for one topic
    Vote,
}

impl View {
    /// Parse a view name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Home" => Some(View::Home),
            "List" => Some(View::List),
            "Vote" => Some(View::Vote),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            View::Home => "Home",
            View::List => "List",
            View::Vote => "Vote",
        }
    }

    /// Parameters the view needs as props
    pub fn required_params(&self) -> &'static [&'static str] {
        match self {
            View::Vote => &[VOTE_ID_PARAM],
            View::Home | View::List => &[],
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Route entries of the application, declared once at startup
pub fn routes() -> Vec<RouteEntry<View>> {
    vec![RouteEntry::new("/")
        .name("home")
        .view(View::Home)
        .redirect("/list")
        .children(vec![
            RouteEntry::new("list").view(View::List),
            RouteEntry::new("vote").redirect("/list"),
            RouteEntry::new("vote/:vid").name("vote").view(View::Vote),
        ])]
}

pub fn resolver(config: RouterConfig) -> Result<Resolver<View>> {
    Resolver::new(routes(), config)
}

pub fn navigator(config: RouterConfig) -> Result<Navigator<View>> {
    Navigator::from_routes(routes(), config)
}
