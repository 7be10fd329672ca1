//! Declarative route entries

/// A configured mapping from a path pattern to a view or a redirect
///
/// Entries nest: a child's path is relative to its parent unless it starts
/// with `/`, and the parent's view wraps the child's view.
///
/// # Example
/// ```
/// use tally_router::RouteEntry;
///
/// let root = RouteEntry::new("/")
///     .name("home")
///     .view("Home")
///     .redirect("/list")
///     .child(RouteEntry::new("list").view("List"))
///     .child(RouteEntry::new("vote/:vid").name("vote").view("Vote"));
///
/// assert_eq!(root.redirect_target(), Some("/list"));
/// assert_eq!(root.children_entries().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEntry<V> {
    pub(crate) path: String,
    pub(crate) name: Option<String>,
    pub(crate) view: Option<V>,
    pub(crate) redirect: Option<String>,
    pub(crate) children: Vec<RouteEntry<V>>,
}

impl<V> RouteEntry<V> {
    /// Create an entry for `path` with no target yet
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            view: None,
            redirect: None,
            children: Vec::new(),
        }
    }

    /// Name the entry for lookups by name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Render `view` when this entry matches
    pub fn view(mut self, view: V) -> Self {
        self.view = Some(view);
        self
    }

    /// Redirect to `target` when this entry is the final match.
    /// Takes precedence over the view.
    pub fn redirect(mut self, target: impl Into<String>) -> Self {
        self.redirect = Some(target.into());
        self
    }

    /// Add a nested entry
    pub fn child(mut self, child: RouteEntry<V>) -> Self {
        self.children.push(child);
        self
    }

    /// Add several nested entries, keeping their order
    pub fn children(mut self, children: impl IntoIterator<Item = RouteEntry<V>>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn route_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn view_target(&self) -> Option<&V> {
        self.view.as_ref()
    }

    pub fn redirect_target(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    pub fn children_entries(&self) -> &[RouteEntry<V>] {
        &self.children
    }
}
