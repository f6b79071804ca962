//! UI components for the Bookwise application.
//!
//! - `app_shell`: AppBar, Footer, and the [`View`] enum that stands in for
//!   a router
//! - `search`: catalog search view with typeahead dropdown and similarity
//!   results
//! - `auth`: login and signup forms
//! - `favorites`: favorite button + saved-books view
//! - `dashboard`: admin status/alerts/logs panels with polling
//!
//! # Context providers
//!
//! [`App`] provides the shared handles once, at the top of the tree:
//!
//! ```ignore
//! let api = use_api();          // Rc<dyn ApiBackend> behind a handle
//! let cache = use_cache();      // process-wide RequestCache
//! let session = use_session();  // Signal<SessionState>
//! let view = use_view();        // Signal<View>
//! ```
//!
//! The cache and api are plain objects injected via context, not ambient
//! globals, so component logic stays testable and nothing leaks between
//! test runs.

mod app_shell;
pub mod auth;
pub mod dashboard;
pub mod favorites;
pub mod search;

pub use app_shell::{AppBar, Footer, View};
pub use search::SearchView;

use std::rc::Rc;

use dioxus::prelude::*;

use crate::api::{ApiBackend, HttpApi};
use crate::cache::RequestCache;
use crate::search::LocationSync;
use crate::session::{self, SessionState};

use auth::{LoginView, SignupView};
use dashboard::DashboardView;
use favorites::FavoritesView;

/// Backend origin. The dev backend serves on :8000 (the frontend dev
/// server proxies nothing; requests are credentialed cross-origin).
const API_BASE: &str = "http://localhost:8000";

/// One catalog page is enough for client-side typeahead over the whole
/// collection.
pub const CATALOG_PAGE_SIZE: u32 = 200;

/// Shared handle to the REST backend.
#[derive(Clone)]
pub struct ApiHandle(pub Rc<dyn ApiBackend>);

/// Shared handle to the URL seam.
#[derive(Clone)]
pub struct LocationHandle(pub Rc<dyn LocationSync>);

/// Monotonic stamp bumped whenever favorites mutate, so badge-style
/// consumers know to re-read the (freshly invalidated) cache.
#[derive(Clone, Copy)]
pub struct FavoritesVersion(pub Signal<u32>);

/// Catalog load state for the search view.
#[derive(Clone, PartialEq)]
pub enum CatalogStatus {
    Pending,
    Ready { total: usize },
    Failed(String),
}

pub fn use_api() -> ApiHandle {
    use_context::<ApiHandle>()
}

pub fn use_cache() -> RequestCache {
    use_context::<RequestCache>()
}

pub fn use_location() -> LocationHandle {
    use_context::<LocationHandle>()
}

pub fn use_session() -> Signal<SessionState> {
    use_context::<Signal<SessionState>>()
}

pub fn use_view() -> Signal<View> {
    use_context::<Signal<View>>()
}

pub fn use_favorites_version() -> FavoritesVersion {
    use_context::<FavoritesVersion>()
}

#[cfg(target_arch = "wasm32")]
fn platform_location() -> Rc<dyn LocationSync> {
    Rc::new(crate::search::BrowserLocation)
}

#[cfg(not(target_arch = "wasm32"))]
fn platform_location() -> Rc<dyn LocationSync> {
    Rc::new(crate::search::MemoryLocation::new())
}

/// Root component: provides contexts, resolves the session, routes views.
#[component]
pub fn App() -> Element {
    let api = use_context_provider(|| ApiHandle(Rc::new(HttpApi::new(API_BASE))));
    let cache = use_context_provider(RequestCache::new);
    use_context_provider(|| LocationHandle(platform_location()));

    let session = use_signal(|| session::initial_state(None));
    use_context_provider(|| session);

    let view = use_signal(|| View::Catalog);
    use_context_provider(|| view);

    let favorites_version = use_signal(|| 0u32);
    use_context_provider(|| FavoritesVersion(favorites_version));

    // Resolve "who is signed in" once on mount. Failures degrade to
    // Unauthenticated; there is no retry loop.
    let mut session_signal = session;
    use_effect(move || {
        if matches!(*session_signal.peek(), SessionState::Loading) {
            let api = api.clone();
            let cache = cache.clone();
            spawn(async move {
                let resolved = session::check_session(api.0.as_ref()).await;
                let current = session_signal.peek().clone();
                session_signal.set(session::reconcile(&current, resolved, &cache));
            });
        }
    });

    rsx! {
        div { class: "bw-app",
            AppBar {}

            main { class: "bw-main",
                {match view() {
                    View::Catalog => rsx! { SearchView {} },
                    View::Favorites => rsx! { FavoritesView {} },
                    View::Login { redirect } => rsx! { LoginView { redirect: redirect } },
                    View::Signup => rsx! { SignupView {} },
                    View::Dashboard => rsx! { DashboardView {} },
                }}
            }

            Footer {}
        }
    }
}
