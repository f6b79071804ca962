//! URL-parameter synchronization for shareable search state.
//!
//! A selection is encoded as `?bookId=<id>&search=<text>` so links can be
//! shared and back/forward restores work. Components talk to the browser
//! only through [`LocationSync`]; the real implementation rewrites the
//! location with `history.replaceState` (no navigation), while tests and
//! native builds use [`MemoryLocation`].

use url::form_urlencoded;

/// The shareable search/selection state carried in the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub book_id: u32,
    pub search: String,
}

impl SearchParams {
    /// Encodes as `bookId=<id>&search=<text>` (form-urlencoded).
    pub fn to_query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("bookId", &self.book_id.to_string())
            .append_pair("search", &self.search)
            .finish()
    }

    /// Decodes from a query string (leading `?` tolerated). Returns `None`
    /// unless a parseable `bookId` is present.
    pub fn from_query(query: &str) -> Option<Self> {
        let mut book_id = None;
        let mut search = String::new();
        for (name, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            match name.as_ref() {
                "bookId" => book_id = value.parse::<u32>().ok(),
                "search" => search = value.into_owned(),
                _ => {}
            }
        }
        Some(Self {
            book_id: book_id?,
            search,
        })
    }
}

/// Seam between search state and the browser location.
///
/// Injected rather than reached for as ambient global state, so the
/// coordinator logic stays testable and nothing outlives the component
/// that owns the handle.
pub trait LocationSync {
    /// Parses the current query string, if it encodes a selection.
    fn current(&self) -> Option<SearchParams>;

    /// Rewrites the query string in place (no navigation). `None` removes
    /// the search parameters entirely.
    fn replace(&self, params: Option<&SearchParams>);

    /// Current path (used as the return target for login redirects).
    fn path(&self) -> String;

    /// Pushes a new in-app URL (login redirects).
    fn push(&self, url: &str);
}

/// Browser-backed implementation using `history.replaceState`.
#[cfg(target_arch = "wasm32")]
pub struct BrowserLocation;

#[cfg(target_arch = "wasm32")]
impl LocationSync for BrowserLocation {
    fn current(&self) -> Option<SearchParams> {
        let search = web_sys::window()?.location().search().ok()?;
        SearchParams::from_query(&search)
    }

    fn replace(&self, params: Option<&SearchParams>) {
        use dioxus::logger::tracing::warn;

        let Some(window) = web_sys::window() else {
            return;
        };
        let location = window.location();
        let path = location.pathname().unwrap_or_else(|_| "/".to_string());
        let url = match params {
            Some(params) => format!("{path}?{}", params.to_query()),
            None => path,
        };
        match window.history() {
            Ok(history) => {
                if history
                    .replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&url))
                    .is_err()
                {
                    warn!("failed to rewrite location to {url}");
                }
            }
            Err(_) => warn!("history API unavailable"),
        }
    }

    fn path(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_else(|| "/".to_string())
    }

    fn push(&self, url: &str) {
        use dioxus::logger::tracing::warn;

        let Some(window) = web_sys::window() else {
            return;
        };
        match window.history() {
            Ok(history) => {
                if history
                    .push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(url))
                    .is_err()
                {
                    warn!("failed to push location {url}");
                }
            }
            Err(_) => warn!("history API unavailable"),
        }
    }
}

/// In-memory implementation for tests and native builds.
#[derive(Default)]
pub struct MemoryLocation {
    params: std::cell::RefCell<Option<SearchParams>>,
    path: std::cell::RefCell<String>,
    pushed: std::cell::RefCell<Vec<String>>,
}

impl MemoryLocation {
    pub fn new() -> Self {
        Self {
            params: std::cell::RefCell::new(None),
            path: std::cell::RefCell::new("/".to_string()),
            pushed: std::cell::RefCell::new(Vec::new()),
        }
    }

    pub fn with_params(params: SearchParams) -> Self {
        let location = Self::new();
        *location.params.borrow_mut() = Some(params);
        location
    }

    pub fn set_path(&self, path: &str) {
        *self.path.borrow_mut() = path.to_string();
    }

    /// URLs pushed so far (login redirects in tests).
    pub fn pushed(&self) -> Vec<String> {
        self.pushed.borrow().clone()
    }
}

impl LocationSync for MemoryLocation {
    fn current(&self) -> Option<SearchParams> {
        self.params.borrow().clone()
    }

    fn replace(&self, params: Option<&SearchParams>) {
        *self.params.borrow_mut() = params.cloned();
    }

    fn path(&self) -> String {
        self.path.borrow().clone()
    }

    fn push(&self, url: &str) {
        self.pushed.borrow_mut().push(url.to_string());
    }
}
