//! WASM bindings for JavaScript interop

use crate::outcome::{self, NavOutcome};
use std::cell::{Cell, RefCell};
use tally_core::{app, Error, HistoryMode, Navigator, RouterConfig, View};
use tracing::warn;
use wasm_bindgen::prelude::*;

// ============================================================================
// Navigation result
// ============================================================================

/// Navigation result for WASM
#[wasm_bindgen]
pub struct RouteResult {
    pub found: bool,
    pub not_found: bool,
    pub failed: bool,
    view: Option<String>,
    matched: Vec<String>,
    name: Option<String>,
    path: String,
    full_path: String,
    params: Vec<String>,
    error: Option<String>,
}

#[wasm_bindgen]
impl RouteResult {
    #[wasm_bindgen(getter)]
    pub fn view(&self) -> Option<String> {
        self.view.clone()
    }

    /// View names, shell first
    #[wasm_bindgen(getter)]
    pub fn matched(&self) -> Vec<String> {
        self.matched.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn name(&self) -> Option<String> {
        self.name.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn path(&self) -> String {
        self.path.clone()
    }

    #[wasm_bindgen(getter, js_name = fullPath)]
    pub fn full_path(&self) -> String {
        self.full_path.clone()
    }

    /// Flat `[name, value, ...]` list
    #[wasm_bindgen(getter)]
    pub fn params(&self) -> Vec<String> {
        self.params.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn error(&self) -> Option<String> {
        self.error.clone()
    }

    /// Get a single param
    pub fn param(&self, name: &str) -> Option<String> {
        self.params
            .chunks_exact(2)
            .find(|pair| pair[0] == name)
            .map(|pair| pair[1].clone())
    }
}

impl From<NavOutcome> for RouteResult {
    fn from(outcome: NavOutcome) -> Self {
        let matched = outcome.matched_names();
        RouteResult {
            found: outcome.found(),
            not_found: outcome.state == tally_core::NavState::NotFound,
            failed: outcome.state == tally_core::NavState::Failed,
            view: outcome.view.map(|v| v.as_str().to_string()),
            matched,
            name: outcome.name,
            path: outcome.path,
            full_path: outcome.full_path,
            params: outcome.params,
            error: outcome.error,
        }
    }
}

fn to_js(err: Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ============================================================================
// Navigator
// ============================================================================

/// WASM-exposed navigator over the application's route table
#[wasm_bindgen]
pub struct WasmNavigator {
    inner: Navigator<View>,
    listeners: RefCell<Vec<(u32, js_sys::Function)>>,
    next_listener: Cell<u32>,
}

#[wasm_bindgen]
impl WasmNavigator {
    /// `base` defaults to `/`, `mode` to `history`
    #[wasm_bindgen(constructor)]
    pub fn new(base: Option<String>, mode: Option<String>) -> Result<WasmNavigator, JsValue> {
        let mut config = RouterConfig::new();
        if let Some(base) = base {
            config = config.base(base);
        }
        if let Some(mode) = mode {
            config = config.mode(HistoryMode::from_str(&mode).map_err(to_js)?);
        }

        Ok(Self {
            inner: app::navigator(config).map_err(to_js)?,
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(1),
        })
    }

    /// Resolve the browser's current URL (initial load and `popstate`)
    ///
    /// Entries pushed by this navigator carry their history index as
    /// state, so browser back/forward moves the in-memory stack instead of
    /// overwriting it.
    pub fn start(&self) -> Result<RouteResult, JsValue> {
        if self.inner.resolver().config().mode != HistoryMode::Memory {
            let index = browser_history()?.state()?.as_f64();
            if let Some(index) = index.filter(|i| *i >= 0.0) {
                if self.inner.go_to(index as usize).is_some() {
                    return Ok(self.finish());
                }
            }
        }

        let raw = self.browser_path()?;
        let _ = self.inner.replace(&raw);
        if self.inner.recorded_current() {
            self.sync_browser(true)?;
        }
        Ok(self.finish())
    }

    /// Resolve without touching history
    pub fn navigate(&self, path: &str) -> RouteResult {
        let _ = self.inner.navigate(path);
        self.finish()
    }

    /// Navigate and add a browser history entry
    pub fn push(&self, path: &str) -> Result<RouteResult, JsValue> {
        let _ = self.inner.push(path);
        if self.inner.recorded_current() {
            self.sync_browser(false)?;
        }
        Ok(self.finish())
    }

    /// Navigate and overwrite the browser history entry
    pub fn replace(&self, path: &str) -> Result<RouteResult, JsValue> {
        let _ = self.inner.replace(path);
        if self.inner.recorded_current() {
            self.sync_browser(true)?;
        }
        Ok(self.finish())
    }

    /// Navigate to a named route; params as flat `[name, value, ...]`
    #[wasm_bindgen(js_name = pushNamed)]
    pub fn push_named(&self, name: &str, params: Vec<String>) -> Result<RouteResult, JsValue> {
        self.inner
            .push_named(name, &outcome::pairs(&params))
            .map_err(to_js)?;
        if self.inner.recorded_current() {
            self.sync_browser(false)?;
        }
        Ok(self.finish())
    }

    /// Go back; in history and hash modes the browser fires `popstate`
    /// and the page calls `start()`, which moves the in-memory stack
    pub fn back(&self) -> Result<Option<RouteResult>, JsValue> {
        self.go(-1)
    }

    pub fn forward(&self) -> Result<Option<RouteResult>, JsValue> {
        self.go(1)
    }

    pub fn go(&self, delta: i32) -> Result<Option<RouteResult>, JsValue> {
        if self.inner.resolver().config().mode != HistoryMode::Memory {
            browser_history()?.go_with_delta(delta)?;
            return Ok(None);
        }
        match self.inner.go(delta as isize) {
            Some(_) => Ok(Some(self.finish())),
            None => Ok(None),
        }
    }

    /// Latest committed navigation
    pub fn current(&self) -> Option<RouteResult> {
        self.inner
            .current()
            .map(|nav| NavOutcome::from_navigation(&nav).into())
    }

    /// State machine position (`idle`, `resolving`, `resolved`, ...)
    pub fn state(&self) -> String {
        self.inner.state().as_str().to_string()
    }

    /// Browser URL for an in-app path
    pub fn href(&self, path: &str) -> String {
        self.inner.resolver().href(path)
    }

    /// In-app path of a named route; params as flat `[name, value, ...]`
    #[wasm_bindgen(js_name = urlFor)]
    pub fn url_for(&self, name: &str, params: Vec<String>) -> Result<String, JsValue> {
        self.inner
            .resolver()
            .url_for(name, &outcome::pairs(&params))
            .map_err(to_js)
    }

    /// Call `callback(result)` after every committed navigation
    pub fn subscribe(&self, callback: js_sys::Function) -> u32 {
        let id = self.next_listener.get();
        self.next_listener.set(id.wrapping_add(1));
        self.listeners.borrow_mut().push((id, callback));
        id
    }

    pub fn unsubscribe(&self, id: u32) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}

impl WasmNavigator {
    /// Notify JS listeners about the committed navigation and return it
    fn finish(&self) -> RouteResult {
        let Some(navigation) = self.inner.current() else {
            return RouteResult::from(NavOutcome {
                state: self.inner.state(),
                view: None,
                matched: Vec::new(),
                name: None,
                path: String::new(),
                full_path: String::new(),
                params: Vec::new(),
                error: None,
            });
        };
        let outcome = NavOutcome::from_navigation(&navigation);

        // Listeners may navigate again; never hold the borrow while calling
        let listeners: Vec<js_sys::Function> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, f)| f.clone())
            .collect();
        outcome::notify_latest(
            &listeners,
            navigation.id,
            || self.inner.current().map(|nav| nav.id),
            |listener| {
                let arg = JsValue::from(RouteResult::from(outcome.clone()));
                if let Err(err) = listener.call1(&JsValue::NULL, &arg) {
                    warn!(error = ?err, "navigation listener threw");
                }
            },
        );

        // A listener's navigation already notified everyone with the newer outcome
        match self.inner.current() {
            Some(latest) if latest.id != navigation.id => NavOutcome::from_navigation(&latest).into(),
            _ => outcome.into(),
        }
    }

    /// Mirror the current history entry into the address bar
    fn sync_browser(&self, replace: bool) -> Result<(), JsValue> {
        let config = self.inner.resolver().config();
        if config.mode == HistoryMode::Memory {
            return Ok(());
        }
        let Some(entry) = self.inner.history().current().map(str::to_string) else {
            return Ok(());
        };

        let url = self.inner.resolver().href(&entry);
        let index = JsValue::from_f64(self.inner.history().position() as f64);
        let history = browser_history()?;
        if replace {
            history.replace_state_with_url(&index, "", Some(&url))
        } else {
            history.push_state_with_url(&index, "", Some(&url))
        }
    }

    /// Current browser URL as a base-prefixed path
    fn browser_path(&self) -> Result<String, JsValue> {
        let location = window()?.location();
        let config = self.inner.resolver().config();
        match config.mode {
            HistoryMode::History => Ok(format!(
                "{}{}{}",
                location.pathname()?,
                location.search()?,
                location.hash()?
            )),
            HistoryMode::Hash => {
                let hash = location.hash()?;
                let in_app = hash.strip_prefix('#').unwrap_or(&hash);
                Ok(format!("{}{}", config.base.trim_end_matches('/'), in_app))
            }
            HistoryMode::Memory => Ok(self
                .inner
                .history()
                .current()
                .map(|entry| self.inner.resolver().href(entry))
                .unwrap_or_else(|| config.base.clone())),
        }
    }
}

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

fn browser_history() -> Result<web_sys::History, JsValue> {
    window()?.history()
}
