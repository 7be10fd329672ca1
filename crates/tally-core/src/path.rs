//! URL path handling
//!
//! Splits a navigated URL into path, query and hash, normalizes the path and
//! strips the configured base prefix.

use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt::Write;

/// Ordered query pairs, decoded
pub type Query = SmallVec<[(String, String); 4]>;

/// An in-app location (base already stripped)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Normalized path, always starting with `/`
    pub path: String,
    pub query: Query,
    /// Fragment without the leading `#`
    pub hash: Option<String>,
}

impl Location {
    /// Parse a location such as `/vote/42?tab=results#top`
    pub fn parse(raw: &str) -> Location {
        let (rest, hash) = match raw.split_once('#') {
            Some((rest, hash)) => (rest, Some(hash.to_string())),
            None => (raw, None),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (rest, Query::new()),
        };

        Location {
            path: normalize_path(path).into_owned(),
            query,
            hash,
        }
    }

    /// Path with re-encoded query and hash appended
    pub fn full_path(&self) -> String {
        full_path(&self.path, &self.query, self.hash.as_deref())
    }
}

/// Join a path, query pairs and fragment back into a URL path
pub fn full_path(path: &str, query: &[(String, String)], hash: Option<&str>) -> String {
    let mut out = String::from(path);
    for (i, (key, value)) in query.iter().enumerate() {
        out.push(if i == 0 { '?' } else { '&' });
        out.push_str(&urlencoding::encode(key));
        if !value.is_empty() {
            let _ = write!(out, "={}", urlencoding::encode(value));
        }
    }
    if let Some(hash) = hash {
        out.push('#');
        out.push_str(hash);
    }
    out
}

/// Validates if a path is in canonical form
///
/// - Must start with `/`
/// - Must not contain `//` or `\`
/// - Must not end with `/` (except root `/`)
pub fn is_normalized(path: &str) -> bool {
    if !path.starts_with('/') {
        return false;
    }
    if path.contains("//") || path.contains('\\') {
        return false;
    }
    path == "/" || !path.ends_with('/')
}

/// Normalize a path to canonical form
///
/// Returns `Cow::Borrowed` when the input is already canonical.
///
/// ```
/// use tally_core::path::normalize_path;
///
/// assert_eq!(normalize_path("/vote/42"), "/vote/42");
/// assert_eq!(normalize_path("vote//42/"), "/vote/42");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_normalized(path) {
        return Cow::Borrowed(path);
    }
    let segments: Vec<&str> = path
        .split(|c: char| c == '/' || c == '\\')
        .filter(|s| !s.is_empty())
        .collect();
    Cow::Owned(format!("/{}", segments.join("/")))
}

/// Normalize a base prefix to `/`-delimited form (`app` -> `/app/`)
pub fn normalize_base(base: &str) -> String {
    let base = normalize_path(base.trim());
    if base == "/" {
        base.into_owned()
    } else {
        format!("{}/", base)
    }
}

/// Strip a normalized base (`/app/`) from `path`
///
/// Matching is ASCII case-insensitive. Returns `None` when `path` lies
/// outside the base.
pub fn strip_base<'a>(path: &'a str, base: &str) -> Option<&'a str> {
    if base == "/" {
        return Some(path);
    }
    let bare = base.trim_end_matches('/');
    let head = path.get(..bare.len())?;
    if !head.eq_ignore_ascii_case(bare) {
        return None;
    }
    let rest = &path[bare.len()..];
    match rest.chars().next() {
        None | Some('/') | Some('?') | Some('#') => Some(rest),
        Some(_) => None,
    }
}

/// Parse a query string (without leading `?`) into decoded pairs
pub fn parse_query(query: &str) -> Query {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (decode_query(key), decode_query(value)),
            None => (decode_query(pair), String::new()),
        })
        .collect()
}

/// Percent-decode a path component; invalid UTF-8 is kept verbatim
pub fn decode(component: &str) -> String {
    urlencoding::decode(component)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| component.to_string())
}

fn decode_query(component: &str) -> String {
    decode(&component.replace('+', " "))
}
