//! Route patterns as tagged segments
//!
//! A pattern such as `/vote/:vid` is parsed once into
//! `[Literal("vote"), Param("vid")]` and matched with explicit functions.

use crate::TableError;
use std::fmt;

/// One segment of a route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Exact text (`list`, `vote`)
    Literal(String),
    /// Named parameter (`:vid`), captures one segment
    Param(String),
    /// Catch-all (`*path` or bare `*`), captures the remaining path
    CatchAll(String),
}

impl Segment {
    /// Classify a raw pattern segment
    pub fn parse(raw: &str) -> Segment {
        if let Some(name) = raw.strip_prefix(':') {
            Segment::Param(name.to_string())
        } else if let Some(name) = raw.strip_prefix('*') {
            let name = if name.is_empty() { "*" } else { name };
            Segment::CatchAll(name.to_string())
        } else {
            Segment::Literal(raw.to_string())
        }
    }

    /// Matching priority among siblings (lower wins)
    pub fn rank(&self) -> u8 {
        match self {
            Segment::Literal(_) => 0,
            Segment::Param(_) => 1,
            Segment::CatchAll(_) => 2,
        }
    }

    /// Check a single path segment against this pattern segment
    pub fn matches(&self, input: &str, case_sensitive: bool) -> bool {
        match self {
            Segment::Literal(text) if case_sensitive => text == input,
            Segment::Literal(text) => text.eq_ignore_ascii_case(input),
            Segment::Param(_) | Segment::CatchAll(_) => !input.is_empty(),
        }
    }

    /// Name captured by this segment, if any
    pub fn param_name(&self) -> Option<&str> {
        match self {
            Segment::Literal(_) => None,
            Segment::Param(name) | Segment::CatchAll(name) => Some(name.as_str()),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(text) => f.write_str(text),
            Segment::Param(name) => write!(f, ":{}", name),
            Segment::CatchAll(name) if name == "*" => f.write_str("*"),
            Segment::CatchAll(name) => write!(f, "*{}", name),
        }
    }
}

/// Parsed route pattern
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    segments: Vec<Segment>,
    absolute: bool,
}

impl Pattern {
    /// Parse a pattern; empty segments (`//`, trailing `/`) are ignored
    ///
    /// # Example
    /// ```
    /// use tally_router::{Pattern, Segment};
    ///
    /// let p = Pattern::parse("/vote/:vid").unwrap();
    /// assert_eq!(
    ///     p.segments(),
    ///     &[Segment::Literal("vote".into()), Segment::Param("vid".into())]
    /// );
    /// ```
    pub fn parse(path: &str) -> Result<Pattern, TableError> {
        let mut pattern = Pattern {
            segments: Vec::new(),
            absolute: path.starts_with('/'),
        };
        for raw in path.split('/').filter(|s| !s.is_empty()) {
            pattern.push(Segment::parse(raw), path)?;
        }
        Ok(pattern)
    }

    fn push(&mut self, segment: Segment, source: &str) -> Result<(), TableError> {
        if let Segment::Param(name) = &segment {
            if name.is_empty() {
                return Err(TableError::EmptyParamName(source.to_string()));
            }
        }
        if matches!(self.segments.last(), Some(Segment::CatchAll(_))) {
            return Err(TableError::CatchAllNotLast(source.to_string()));
        }
        self.segments.push(segment);
        Ok(())
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the raw pattern started with `/`
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// Names captured by this pattern, in order
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(Segment::param_name)
    }

    /// Append a child pattern; absolute children stand on their own
    pub fn join(&self, child: &Pattern) -> Result<Pattern, TableError> {
        if child.absolute {
            return Ok(child.clone());
        }
        let mut joined = self.clone();
        let source = format!("{}/{}", self, child);
        for segment in &child.segments {
            joined.push(segment.clone(), &source)?;
        }
        joined.absolute = true;
        Ok(joined)
    }

    /// Whether `path` could continue past this pattern
    pub fn is_prefix_of(&self, path: &[&str], case_sensitive: bool) -> bool {
        self.segments.iter().enumerate().all(|(i, segment)| {
            path.get(i)
                .is_some_and(|input| segment.matches(input, case_sensitive))
        })
    }

    /// Match the whole path, returning captured `(name, value)` pairs
    pub fn capture(&self, path: &[&str], case_sensitive: bool) -> Option<Vec<(String, String)>> {
        let mut params = Vec::new();
        for (i, segment) in self.segments.iter().enumerate() {
            let input = path.get(i)?;
            if !segment.matches(input, case_sensitive) {
                return None;
            }
            match segment {
                Segment::Literal(_) => {}
                Segment::Param(name) => params.push((name.clone(), input.to_string())),
                Segment::CatchAll(name) => {
                    params.push((name.clone(), path[i..].join("/")));
                    return Some(params);
                }
            }
        }
        (path.len() == self.segments.len()).then_some(params)
    }

    /// Build a concrete path by substituting every captured segment
    ///
    /// Returns the name of the first parameter `lookup` cannot supply.
    ///
    /// # Example
    /// ```
    /// use tally_router::Pattern;
    ///
    /// let p = Pattern::parse("/vote/:vid").unwrap();
    /// let path = p.fill(|name| (name == "vid").then_some("42")).unwrap();
    /// assert_eq!(path, "/vote/42");
    /// assert_eq!(p.fill(|_| None::<&str>), Err("vid"));
    /// ```
    pub fn fill<S, F>(&self, mut lookup: F) -> Result<String, &str>
    where
        S: AsRef<str>,
        F: FnMut(&str) -> Option<S>,
    {
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Param(name) | Segment::CatchAll(name) => match lookup(name) {
                    Some(value) => path.push_str(value.as_ref()),
                    None => return Err(name.as_str()),
                },
            }
        }
        if path.is_empty() {
            path.push('/');
        }
        Ok(path)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(path: &str) -> Vec<&str> {
        path.split('/').filter(|s| !s.is_empty()).collect()
    }

    #[test]
    fn test_parse_segments() {
        let p = Pattern::parse("/files/:dir/*rest").unwrap();
        assert_eq!(
            p.segments(),
            &[
                Segment::Literal("files".to_string()),
                Segment::Param("dir".to_string()),
                Segment::CatchAll("rest".to_string()),
            ]
        );
        assert!(p.is_absolute());
        assert_eq!(p.params().collect::<Vec<_>>(), vec!["dir", "rest"]);
        assert_eq!(p.to_string(), "/files/:dir/*rest");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Pattern::parse("/vote/:"),
            Err(TableError::EmptyParamName("/vote/:".to_string()))
        );
        assert_eq!(
            Pattern::parse("/*rest/more"),
            Err(TableError::CatchAllNotLast("/*rest/more".to_string()))
        );
    }

    #[test]
    fn test_root_pattern() {
        let p = Pattern::parse("/").unwrap();
        assert!(p.segments().is_empty());
        assert_eq!(p.to_string(), "/");
        assert_eq!(p.capture(&[], true), Some(vec![]));
        assert_eq!(p.capture(&split("/list"), true), None);
    }

    #[test]
    fn test_join_relative_and_absolute() {
        let parent = Pattern::parse("/").unwrap();
        let child = Pattern::parse("vote/:vid").unwrap();
        assert!(!child.is_absolute());
        assert_eq!(parent.join(&child).unwrap().to_string(), "/vote/:vid");

        let parent = Pattern::parse("/admin").unwrap();
        let absolute = Pattern::parse("/login").unwrap();
        assert_eq!(parent.join(&absolute).unwrap().to_string(), "/login");

        let catch_all = Pattern::parse("/docs/*").unwrap();
        assert!(matches!(
            catch_all.join(&Pattern::parse("more").unwrap()),
            Err(TableError::CatchAllNotLast(_))
        ));
    }

    #[test]
    fn test_capture() {
        let p = Pattern::parse("/vote/:vid").unwrap();
        assert_eq!(
            p.capture(&split("/vote/42"), true),
            Some(vec![("vid".to_string(), "42".to_string())])
        );
        assert_eq!(p.capture(&split("/vote"), true), None);
        assert_eq!(p.capture(&split("/vote/42/extra"), true), None);
        assert_eq!(p.capture(&split("/list/42"), true), None);
    }

    #[test]
    fn test_capture_catch_all() {
        let p = Pattern::parse("/files/*path").unwrap();
        assert_eq!(
            p.capture(&split("/files/docs/readme.md"), true),
            Some(vec![("path".to_string(), "docs/readme.md".to_string())])
        );
        // A catch-all needs at least one segment
        assert_eq!(p.capture(&split("/files"), true), None);
    }

    #[test]
    fn test_case_sensitivity() {
        let p = Pattern::parse("/list").unwrap();
        assert!(p.capture(&split("/LIST"), false).is_some());
        assert!(p.capture(&split("/LIST"), true).is_none());
    }

    #[test]
    fn test_prefix() {
        let p = Pattern::parse("/vote").unwrap();
        assert!(p.is_prefix_of(&split("/vote/42"), true));
        assert!(p.is_prefix_of(&split("/vote"), true));
        assert!(!p.is_prefix_of(&split("/list"), true));
        assert!(!p.is_prefix_of(&[], true));
    }

    #[test]
    fn test_fill() {
        let p = Pattern::parse("/orgs/:org/*rest").unwrap();
        let path = p
            .fill(|name| match name {
                "org" => Some("acme"),
                "rest" => Some("a/b"),
                _ => None,
            })
            .unwrap();
        assert_eq!(path, "/orgs/acme/a/b");
        assert_eq!(Pattern::parse("/").unwrap().fill(|_| None::<String>), Ok("/".to_string()));
    }
}
