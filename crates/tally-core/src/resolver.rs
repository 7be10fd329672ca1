//! Route resolution
//!
//! Turns a navigated path into the view to render:
//! - strips the configured base
//! - matches the route tree
//! - follows redirects up to the configured hop limit
//! - decodes captured parameters

use crate::config::{HistoryMode, RouterConfig};
use crate::path::{self, Location, Query};
use crate::{Error, Result};
use std::collections::BTreeMap;
use tally_router::{Pattern, RouteEntry, RouteTable, Target};
use tracing::debug;

/// Outcome of matching a path that ends on a view
///
/// Immutable; a new one is produced for every navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute<V> {
    /// Normalized in-app path that matched
    pub path: String,
    /// Full pattern of the matched entry
    pub pattern: String,
    /// Route name, if the entry has one
    pub name: Option<String>,
    /// Decoded path parameters
    pub params: BTreeMap<String, String>,
    pub query: Query,
    pub hash: Option<String>,
    /// View of the matched entry
    pub view: V,
    /// Views from the outermost shell down to `view`
    pub matched: Vec<V>,
}

impl<V> ResolvedRoute<V> {
    /// Get a path parameter
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|s| s.as_str())
    }

    /// Get a path parameter the view cannot render without
    pub fn require_param(&self, name: &str) -> Result<&str> {
        self.param(name).ok_or_else(|| Error::MissingRequiredParameter {
            route: self.pattern.clone(),
            param: name.to_string(),
        })
    }

    /// Get the first query value for `key`
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Path with query and hash, without the base
    pub fn full_path(&self) -> String {
        path::full_path(&self.path, &self.query, self.hash.as_deref())
    }
}

/// Result of a single resolution step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<V> {
    /// A view entry matched
    Resolved(ResolvedRoute<V>),
    /// A redirect entry matched; `to` is an in-app path with query and hash
    Redirect { from: String, to: String },
    /// Nothing matched
    NotFound { path: String },
}

/// Final route plus the paths that redirected on the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Followed<V> {
    pub route: ResolvedRoute<V>,
    pub redirects: Vec<String>,
}

/// Route resolver over a static route table
#[derive(Debug)]
pub struct Resolver<V> {
    table: RouteTable<V>,
    config: RouterConfig,
}

impl<V: Clone> Resolver<V> {
    /// Build the route table and apply the config
    pub fn new(routes: Vec<RouteEntry<V>>, config: RouterConfig) -> Result<Self> {
        let table = RouteTable::new(routes)?.case_sensitive(config.case_sensitive);
        Ok(Self { table, config })
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn table(&self) -> &RouteTable<V> {
        &self.table
    }

    /// Strip the base and parse; `None` when `raw` lies outside the base
    pub fn locate(&self, raw: &str) -> Option<Location> {
        path::strip_base(raw, &self.config.base).map(Location::parse)
    }

    /// One matching step, redirects are reported, not followed
    pub fn step(&self, location: &Location) -> Result<Resolution<V>> {
        let Some(m) = self.table.find(&location.path) else {
            return Ok(Resolution::NotFound {
                path: location.path.clone(),
            });
        };

        match m.target {
            Target::Redirect(target) => {
                let to = redirect_location(&target, &m.params, location, &m.pattern)?;
                Ok(Resolution::Redirect {
                    from: location.path.clone(),
                    to: to.full_path(),
                })
            }
            Target::View(view) => Ok(Resolution::Resolved(ResolvedRoute {
                path: location.path.clone(),
                pattern: m.pattern,
                name: m.name,
                params: m
                    .params
                    .iter()
                    .map(|(name, value)| (name.clone(), path::decode(value)))
                    .collect(),
                query: location.query.clone(),
                hash: location.hash.clone(),
                view,
                matched: m.matched,
            })),
        }
    }

    /// Resolve `raw` to its final view, following redirects
    pub fn resolve(&self, raw: &str) -> Result<ResolvedRoute<V>> {
        self.follow(raw).map(|followed| followed.route)
    }

    /// Like [`resolve`](Self::resolve), also reporting the redirect chain
    pub fn follow(&self, raw: &str) -> Result<Followed<V>> {
        let location = self.locate(raw).ok_or_else(|| Error::NoMatch {
            path: raw.to_string(),
        })?;
        let mut redirects = Vec::new();
        let route = self.follow_from(location, |from, _| redirects.push(from.to_string()))?;
        Ok(Followed { route, redirects })
    }

    /// Follow redirects starting from an in-app location
    ///
    /// `on_redirect(from, to)` runs once per hop.
    pub fn follow_from<F>(&self, mut location: Location, mut on_redirect: F) -> Result<ResolvedRoute<V>>
    where
        F: FnMut(&str, &str),
    {
        let mut visited: Vec<String> = Vec::new();

        loop {
            match self.step(&location)? {
                Resolution::Resolved(route) => return Ok(route),
                Resolution::NotFound { path } => return Err(Error::NoMatch { path }),
                Resolution::Redirect { from, to } => {
                    on_redirect(&from, &to);
                    visited.push(from);

                    let next = Location::parse(&to);
                    let hops = visited.len();
                    if hops > self.config.max_redirects || visited.contains(&next.path) {
                        return Err(Error::RedirectCycle {
                            path: next.path,
                            hops,
                        });
                    }

                    debug!(hop = hops, to = %next.path, "following redirect");
                    location = next;
                }
            }
        }
    }

    /// Browser URL for an in-app path, with base and mode applied
    ///
    /// `/list` becomes `/app/list` in history mode and `/app/#/list` in
    /// hash mode.
    pub fn href(&self, path: &str) -> String {
        let full = Location::parse(path).full_path();
        match self.config.mode {
            HistoryMode::Hash => format!("{}#{}", self.config.base, full),
            HistoryMode::History | HistoryMode::Memory => {
                format!("{}{}", self.config.base.trim_end_matches('/'), full)
            }
        }
    }

    /// Build the in-app path of a named route
    pub fn url_for(&self, name: &str, params: &[(&str, &str)]) -> Result<String> {
        let pattern = self
            .table
            .pattern_for(name)
            .ok_or_else(|| Error::UnknownRoute(name.to_string()))?;

        pattern
            .fill(|param| {
                params
                    .iter()
                    .find(|(key, _)| *key == param)
                    .map(|(_, value)| urlencoding::encode(value))
            })
            .map_err(|param| Error::MissingRequiredParameter {
                route: name.to_string(),
                param: param.to_string(),
            })
    }
}

/// Substitute captured params into a redirect target; the source query and
/// hash carry over unless the target has its own
fn redirect_location(
    target: &str,
    params: &[(String, String)],
    from: &Location,
    source_pattern: &str,
) -> Result<Location> {
    let parsed = Location::parse(target);
    let pattern = Pattern::parse(&parsed.path)?;

    let path = pattern
        .fill(|name| {
            params
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        })
        .map_err(|param| Error::MissingRequiredParameter {
            route: source_pattern.to_string(),
            param: param.to_string(),
        })?;

    Ok(Location {
        path,
        query: if parsed.query.is_empty() {
            from.query.clone()
        } else {
            parsed.query
        },
        hash: parsed.hash.or_else(|| from.hash.clone()),
    })
}
