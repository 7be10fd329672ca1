//! tally-router: Zero-dependency route tree
//!
//! Maps URL paths onto a nested tree of route entries for the tally
//! front-end. Each entry renders a view, redirects elsewhere, or only groups
//! children under a shared outer view.
//!
//! ## Path Syntax
//! - `list` - Literal segment
//! - `:name` - Named parameter (captures one segment)
//! - `*` or `*name` - Catch-all (captures the remaining path)
//!
//! ## Priority
//! Among siblings:
//! 1. Literal segments (highest)
//! 2. Parameter segments
//! 3. Catch-all segments (lowest)
//!
//! Ties keep declaration order. Children are tried before their parent, so
//! the deepest matching entry wins.
//!
//! ## Example
//! ```
//! use tally_router::{RouteEntry, RouteTable, Target};
//!
//! let table = RouteTable::new(vec![
//!     RouteEntry::new("/")
//!         .view("Home")
//!         .redirect("/list")
//!         .child(RouteEntry::new("list").view("List"))
//!         .child(RouteEntry::new("vote/:vid").name("vote").view("Vote")),
//! ])
//! .unwrap();
//!
//! let m = table.find("/vote/42").unwrap();
//! assert_eq!(m.target, Target::View("Vote"));
//! assert_eq!(m.matched, vec!["Home", "Vote"]);
//! assert_eq!(m.params, vec![("vid".to_string(), "42".to_string())]);
//! ```

use std::collections::HashMap;

mod entry;
mod error;
mod pattern;

pub use entry::RouteEntry;
pub use error::TableError;
pub use pattern::{Pattern, Segment};

/// What a matched entry asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target<V> {
    /// Render this view
    View(V),
    /// Resolve this path instead
    Redirect(String),
}

/// Route match result
#[derive(Debug, Clone, PartialEq)]
pub struct Match<V> {
    /// Full pattern of the matched entry, e.g. `/vote/:vid`
    pub pattern: String,
    /// Name of the matched entry
    pub name: Option<String>,
    /// View or redirect of the matched entry
    pub target: Target<V>,
    /// Views from the outermost entry down to the matched one
    pub matched: Vec<V>,
    /// Captured path parameters as (name, value) pairs
    pub params: Vec<(String, String)>,
}

impl<V> Match<V> {
    /// Get params as HashMap for convenient access
    pub fn params_map(&self) -> HashMap<String, String> {
        self.params.iter().cloned().collect()
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self.target, Target::Redirect(_))
    }
}

/// Compiled entry with its full pattern
#[derive(Debug)]
struct Node<V> {
    pattern: Pattern,
    name: Option<String>,
    view: Option<V>,
    redirect: Option<String>,
    children: Vec<Node<V>>,
    /// Some descendant has an absolute path and must be visited even when
    /// this node's own pattern does not prefix the path
    reaches_absolute: bool,
}

/// Route tree built once at startup
///
/// Matching walks the tree top-down and returns the first entry whose full
/// pattern consumes the whole path.
#[derive(Debug)]
pub struct RouteTable<V> {
    roots: Vec<Node<V>>,
    /// Route name -> full pattern
    names: HashMap<String, Pattern>,
    case_sensitive: bool,
}

impl<V: Clone> RouteTable<V> {
    /// Compile entries into a table
    ///
    /// Literal segments match case-insensitively until
    /// [`case_sensitive`](Self::case_sensitive) is set.
    pub fn new(entries: Vec<RouteEntry<V>>) -> Result<Self, TableError> {
        let mut names = HashMap::new();
        let root = Pattern::default();
        let roots = Self::compile_level(entries, &root, &mut names)?;
        Ok(Self {
            roots,
            names,
            case_sensitive: false,
        })
    }

    /// Toggle exact-case matching of literal segments
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    fn compile_level(
        entries: Vec<RouteEntry<V>>,
        parent: &Pattern,
        names: &mut HashMap<String, Pattern>,
    ) -> Result<Vec<Node<V>>, TableError> {
        let mut ranked = Vec::with_capacity(entries.len());
        for entry in entries {
            let own = Pattern::parse(&entry.path)?;
            let rank: Vec<u8> = own.segments().iter().map(Segment::rank).collect();
            ranked.push((rank, Self::compile(entry, own, parent, names)?));
        }
        // Stable: equal ranks keep declaration order
        ranked.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(ranked.into_iter().map(|(_, node)| node).collect())
    }

    fn compile(
        entry: RouteEntry<V>,
        own: Pattern,
        parent: &Pattern,
        names: &mut HashMap<String, Pattern>,
    ) -> Result<Node<V>, TableError> {
        let pattern = parent.join(&own)?;

        let mut seen: Vec<&str> = Vec::new();
        for name in pattern.params() {
            if seen.contains(&name) {
                return Err(TableError::DuplicateParam {
                    pattern: pattern.to_string(),
                    name: name.to_string(),
                });
            }
            seen.push(name);
        }

        if entry.view.is_none() && entry.redirect.is_none() && entry.children.is_empty() {
            return Err(TableError::MissingTarget(pattern.to_string()));
        }

        if let Some(target) = &entry.redirect {
            let target_path = target.split(|c: char| c == '?' || c == '#').next().unwrap_or("");
            let target = Pattern::parse(target_path)?;
            if let Some(name) = target.params().find(|name| !seen.contains(name)) {
                return Err(TableError::UnboundRedirectParam {
                    pattern: pattern.to_string(),
                    name: name.to_string(),
                });
            };
        }

        if let Some(name) = &entry.name {
            if names.insert(name.clone(), pattern.clone()).is_some() {
                return Err(TableError::DuplicateName(name.clone()));
            }
        }

        let children = Self::compile_level(entry.children, &pattern, names)?;
        let reaches_absolute = children
            .iter()
            .any(|c| c.reaches_absolute || (c.pattern.is_absolute() && !c.pattern_extends(&pattern)));

        Ok(Node {
            pattern,
            name: entry.name,
            view: entry.view,
            redirect: entry.redirect,
            children,
            reaches_absolute,
        })
    }

    /// Find the entry matching `path`
    ///
    /// Redirects are reported, not followed.
    ///
    /// # Example
    /// ```
    /// use tally_router::{RouteEntry, RouteTable, Target};
    ///
    /// let table = RouteTable::new(vec![
    ///     RouteEntry::new("/vote").redirect("/list"),
    ///     RouteEntry::new("/list").view(1),
    /// ])
    /// .unwrap();
    ///
    /// let m = table.find("/vote").unwrap();
    /// assert_eq!(m.target, Target::Redirect("/list".to_string()));
    /// assert!(table.find("/unknown").is_none());
    /// ```
    pub fn find(&self, path: &str) -> Option<Match<V>> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut chain = Vec::new();
        Self::find_in(&self.roots, &segments, self.case_sensitive, &mut chain)
    }

    fn find_in<'a>(
        nodes: &'a [Node<V>],
        segments: &[&str],
        case_sensitive: bool,
        chain: &mut Vec<&'a Node<V>>,
    ) -> Option<Match<V>> {
        for node in nodes {
            if !node.reaches_absolute && !node.pattern.is_prefix_of(segments, case_sensitive) {
                continue;
            }

            chain.push(node);

            // Deeper entries first
            if let Some(m) = Self::find_in(&node.children, segments, case_sensitive, chain) {
                return Some(m);
            }

            if let Some(m) = Self::terminal(node, segments, case_sensitive, chain) {
                return Some(m);
            }

            chain.pop();
        }

        None
    }

    fn terminal(
        node: &Node<V>,
        segments: &[&str],
        case_sensitive: bool,
        chain: &[&Node<V>],
    ) -> Option<Match<V>> {
        // Redirect takes precedence over the view
        let target = match (&node.redirect, &node.view) {
            (Some(to), _) => Target::Redirect(to.clone()),
            (None, Some(view)) => Target::View(view.clone()),
            (None, None) => return None,
        };
        let params = node.pattern.capture(segments, case_sensitive)?;

        Some(Match {
            pattern: node.pattern.to_string(),
            name: node.name.clone(),
            target,
            matched: chain.iter().filter_map(|n| n.view.clone()).collect(),
            params,
        })
    }

    /// Full pattern registered under `name`
    pub fn pattern_for(&self, name: &str) -> Option<&Pattern> {
        self.names.get(name)
    }

    /// All route names
    pub fn names(&self) -> Vec<String> {
        self.names.keys().cloned().collect()
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

impl<V> Node<V> {
    /// Whether this node's full pattern starts with `parent`
    fn pattern_extends(&self, parent: &Pattern) -> bool {
        self.pattern.segments().starts_with(parent.segments())
    }
}
