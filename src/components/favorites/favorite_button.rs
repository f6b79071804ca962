use dioxus::logger::tracing::error;
use dioxus::prelude::*;

use crate::cache::{CacheKey, CachePolicy};
use crate::favorites::FavoriteToggle;
use crate::session;

use super::super::{
    use_api, use_cache, use_favorites_version, use_location, use_session, use_view, View,
};

/// Heart toggle for one book.
///
/// Gated: clicking while signed out sends the user to the login view with
/// the current path as return target, and no mutation request is issued.
/// Toggles are optimistic: the heart flips immediately and rolls back if
/// the request fails. Concurrent clicks on the same book serialize
/// (a click during an in-flight toggle is ignored).
#[component]
pub fn FavoriteButton(book_id: u32) -> Element {
    let api = use_api();
    let cache = use_cache();
    let location = use_location();
    let session = use_session();
    let mut view = use_view();
    let favorites_version = use_favorites_version();

    let mut toggle = use_signal(|| FavoriteToggle::new(false));

    // Membership hint: resolved through the cache once a session exists.
    // A signed-out user's state is always "not favorited".
    use_effect({
        let api = api.clone();
        let cache = cache.clone();
        move || {
            if session.read().is_authenticated() {
                let api = api.clone();
                let cache = cache.clone();
                spawn(async move {
                    let fetch = {
                        let api = api.clone();
                        move || {
                            let api = api.clone();
                            async move { api.0.check_favorite(book_id).await }
                        }
                    };
                    if let Ok(check) = cache
                        .get(CacheKey::favorite_check(book_id), CachePolicy::FAVORITES, fetch)
                        .await
                    {
                        toggle.write().sync(check.is_favorite);
                    }
                });
            } else {
                toggle.set(FavoriteToggle::new(false));
            }
        }
    });

    let onclick = {
        let api = api.clone();
        let cache = cache.clone();
        let location = location.clone();
        move |evt: MouseEvent| {
            // The button usually sits inside a selectable card.
            evt.stop_propagation();

            if !session.peek().is_authenticated() {
                let path = location.0.path();
                location.0.push(&session::login_redirect(&path));
                view.set(View::Login {
                    redirect: Some(path),
                });
                return;
            }

            let Some(desired) = toggle.write().begin() else {
                // A toggle is already in flight; ignore the click.
                return;
            };

            let api = api.clone();
            let cache = cache.clone();
            let mut stamp = favorites_version.0;
            spawn(async move {
                let outcome = if desired {
                    api.0.add_favorite(book_id).await
                } else {
                    api.0.remove_favorite(book_id).await
                };
                match outcome {
                    Ok(()) => {
                        toggle.write().confirm();
                        // Listings and counts are now out of date.
                        cache.invalidate(CacheKey::is_favorites);
                        stamp += 1;
                    }
                    Err(err) => {
                        error!("favorite toggle for book {} failed: {}", book_id, err);
                        toggle.write().rollback();
                    }
                }
            });
        }
    };

    let shown = toggle.read().shown();
    let pending = toggle.read().is_pending();
    let class = match (shown, pending) {
        (true, _) => "bw-fav-btn bw-fav-btn--on",
        (false, true) => "bw-fav-btn bw-fav-btn--pending",
        (false, false) => "bw-fav-btn",
    };

    rsx! {
        button {
            class: class,
            aria_pressed: "{shown}",
            title: if shown { "Remove from favorites" } else { "Add to favorites" },
            onclick: onclick,
            if shown { "♥" } else { "♡" }
        }
    }
}
