use dioxus::logger::tracing::warn;
use dioxus::prelude::*;

use crate::cache::{CacheKey, CachePolicy};
use crate::session::{self, SessionState};

use super::super::{use_api, use_cache, use_favorites_version, use_location, use_session, use_view};

/// Which screen the main area shows. Stands in for a router: navigation
/// chrome is out of scope, so a view enum (with the login return target
/// riding along) is all the "routing" there is.
#[derive(Clone, PartialEq)]
pub enum View {
    Catalog,
    Favorites,
    Login { redirect: Option<String> },
    Signup,
    Dashboard,
}

/// Global app bar: brand, navigation, and the session pill.
#[component]
pub fn AppBar() -> Element {
    let api = use_api();
    let cache = use_cache();
    let location = use_location();
    let mut session = use_session();
    let mut view = use_view();
    let favorites_version = use_favorites_version();

    // Favorites badge: re-read whenever the session or a toggle changes.
    // The toggle invalidated the cache entry, so this get re-fetches.
    let mut favorites_count = use_signal(|| None::<usize>);
    use_effect({
        let api = api.clone();
        let cache = cache.clone();
        move || {
            let authenticated = session.read().is_authenticated();
            let _stamp = *favorites_version.0.read();
            if authenticated {
                let api = api.clone();
                let cache = cache.clone();
                spawn(async move {
                    let fetch = {
                        let api = api.clone();
                        move || {
                            let api = api.clone();
                            async move { api.0.favorites_count().await }
                        }
                    };
                    match cache
                        .get(CacheKey::favorites_count(), CachePolicy::FAVORITES, fetch)
                        .await
                    {
                        Ok(payload) => favorites_count.set(Some(payload.count)),
                        Err(err) => warn!("favorites count unavailable: {}", err),
                    }
                });
            } else {
                favorites_count.set(None);
            }
        }
    });

    let on_logout = {
        let api = api.clone();
        let cache = cache.clone();
        let location = location.clone();
        move |_: MouseEvent| {
            // Local-first: drop the session and purge caches immediately;
            // the server call only decides whether we land on the login
            // view.
            session.set(session::logout_locally(&cache));
            let api = api.clone();
            let location = location.clone();
            spawn(async move {
                match api.0.logout().await {
                    Ok(()) => {
                        location.0.push("/login");
                        view.set(View::Login { redirect: None });
                    }
                    Err(err) => warn!("logout call failed (already signed out locally): {}", err),
                }
            });
        }
    };

    let is_admin = session.read().is_admin();
    let nav_class = |active: bool| {
        if active {
            "bw-nav-link bw-nav-link--active"
        } else {
            "bw-nav-link"
        }
    };
    let current = view();

    rsx! {
        header { class: "bw-appbar",
            div { class: "bw-brand",
                span { class: "bw-brand-mark", "📚" }
                span { class: "bw-brand-name", "Bookwise" }
            }

            nav { class: "bw-nav",
                button {
                    class: nav_class(current == View::Catalog),
                    onclick: move |_| view.set(View::Catalog),
                    "Catalog"
                }
                button {
                    class: nav_class(current == View::Favorites),
                    onclick: move |_| view.set(View::Favorites),
                    "Favorites"
                    if let Some(count) = favorites_count() {
                        span { class: "bw-badge", "{count}" }
                    }
                }
                if is_admin {
                    button {
                        class: nav_class(current == View::Dashboard),
                        onclick: move |_| view.set(View::Dashboard),
                        "Dashboard"
                    }
                }
            }

            div { class: "bw-session",
                {match session.read().clone() {
                    SessionState::Loading => rsx! {
                        span { class: "bw-status-pill bw-status-pill--muted",
                            span { class: "bw-status-dot bw-status-dot--muted" }
                            "Checking session…"
                        }
                    },
                    SessionState::Authenticated(user) => rsx! {
                        span { class: "bw-status-pill bw-status-pill--ok",
                            span { class: "bw-status-dot bw-status-dot--ok" }
                            "{user.name}"
                        }
                        button {
                            class: "bw-btn bw-btn--ghost",
                            onclick: on_logout.clone(),
                            "Log out"
                        }
                    },
                    SessionState::Unauthenticated => rsx! {
                        button {
                            class: "bw-btn bw-btn--ghost",
                            onclick: move |_| view.set(View::Login { redirect: None }),
                            "Sign in"
                        }
                        button {
                            class: "bw-btn bw-btn--primary",
                            onclick: move |_| view.set(View::Signup),
                            "Sign up"
                        }
                    },
                }}
            }
        }
    }
}
