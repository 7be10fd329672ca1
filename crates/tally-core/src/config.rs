//! Router configuration

use crate::path::normalize_base;
use crate::{Error, Result};

/// Environment variable holding the deployment base path
pub const BASE_URL_ENV: &str = "BASE_URL";
/// Environment variable selecting the history mode
pub const MODE_ENV: &str = "TALLY_ROUTER_MODE";
/// Environment variable overriding the redirect hop limit
pub const MAX_REDIRECTS_ENV: &str = "TALLY_MAX_REDIRECTS";

/// Redirect hops allowed before a navigation is aborted
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// How locations map onto browser URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryMode {
    /// Real paths: `/app/vote/42`
    #[default]
    History,
    /// Fragment paths: `/app/#/vote/42`
    Hash,
    /// No browser URL at all
    Memory,
}

impl HistoryMode {
    /// Parse from string
    pub fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "history" => Ok(HistoryMode::History),
            "hash" => Ok(HistoryMode::Hash),
            "memory" | "abstract" => Ok(HistoryMode::Memory),
            _ => Err(Error::Config(format!("unknown history mode: {}", s))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryMode::History => "history",
            HistoryMode::Hash => "hash",
            HistoryMode::Memory => "memory",
        }
    }
}

impl std::fmt::Display for HistoryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Router configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// Base prefix stripped from every navigated path (`/` or `/app/`)
    pub base: String,
    /// URL style
    pub mode: HistoryMode,
    /// Redirect hop limit
    pub max_redirects: usize,
    /// Match literal segments with exact case
    pub case_sensitive: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            base: "/".to_string(),
            mode: HistoryMode::History,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            case_sensitive: false,
        }
    }
}

impl RouterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `BASE_URL`, `TALLY_ROUTER_MODE` and `TALLY_MAX_REDIRECTS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup, unset keys keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(base) = lookup(BASE_URL_ENV) {
            config = config.base(base);
        }
        if let Some(mode) = lookup(MODE_ENV) {
            config = config.mode(HistoryMode::from_str(&mode)?);
        }
        if let Some(max) = lookup(MAX_REDIRECTS_ENV) {
            let max = max
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{} must be a number, got {}", MAX_REDIRECTS_ENV, max)))?;
            config = config.max_redirects(max);
        }

        Ok(config)
    }

    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.base = normalize_base(&base.into());
        self
    }

    pub fn mode(mut self, mode: HistoryMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn max_redirects(mut self, hops: usize) -> Self {
        self.max_redirects = hops;
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = RouterConfig::new();
        assert_eq!(config.base, "/");
        assert_eq!(config.mode, HistoryMode::History);
        assert_eq!(config.max_redirects, 10);
        assert!(!config.case_sensitive);
    }

    #[test]
    fn test_builder_normalizes_base() {
        let config = RouterConfig::new()
            .base("tally")
            .mode(HistoryMode::Hash)
            .max_redirects(3)
            .case_sensitive(true);
        assert_eq!(config.base, "/tally/");
        assert_eq!(config.mode, HistoryMode::Hash);
        assert_eq!(config.max_redirects, 3);
        assert!(config.case_sensitive);
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("BASE_URL", "/dapp/"),
            ("TALLY_ROUTER_MODE", "Hash"),
            ("TALLY_MAX_REDIRECTS", " 4 "),
        ]
        .into_iter()
        .collect();

        let config = RouterConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.base, "/dapp/");
        assert_eq!(config.mode, HistoryMode::Hash);
        assert_eq!(config.max_redirects, 4);
    }

    #[test]
    fn test_from_lookup_empty() {
        let config = RouterConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, RouterConfig::default());
    }

    #[test]
    fn test_from_lookup_errors() {
        let err = RouterConfig::from_lookup(|k| (k == MODE_ENV).then(|| "tree".to_string())).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = RouterConfig::from_lookup(|k| (k == MAX_REDIRECTS_ENV).then(|| "many".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(HistoryMode::from_str("history").unwrap(), HistoryMode::History);
        assert_eq!(HistoryMode::from_str("abstract").unwrap(), HistoryMode::Memory);
        assert_eq!(HistoryMode::Hash.to_string(), "hash");
    }
}
