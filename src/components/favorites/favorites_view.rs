use dioxus::logger::tracing::error;
use dioxus::prelude::*;

use crate::api::types::FavoriteBook;
use crate::cache::{CacheKey, CachePolicy};
use crate::utils::SignalExt;

use super::super::search::EmptyState;
use super::super::{use_api, use_cache, use_favorites_version, use_session, use_view, View};

#[derive(Clone, PartialEq)]
enum FavoritesStatus {
    Pending,
    Ready,
    Failed(String),
}

/// The signed-in user's saved books, newest first, with removal.
#[component]
pub fn FavoritesView() -> Element {
    let api = use_api();
    let cache = use_cache();
    let session = use_session();
    let mut view = use_view();
    let favorites_version = use_favorites_version();

    let mut favorites = use_signal(Vec::<FavoriteBook>::new);
    let mut status = use_signal(|| FavoritesStatus::Pending);

    // (Re)load whenever the session or the favorites stamp changes. A
    // toggle elsewhere invalidated the cache entry, so this get re-fetches.
    use_effect({
        let api = api.clone();
        let cache = cache.clone();
        move || {
            let authenticated = session.read().is_authenticated();
            let _stamp = *favorites_version.0.read();
            if !authenticated {
                favorites.set(Vec::new());
                return;
            }
            let api = api.clone();
            let cache = cache.clone();
            spawn(async move {
                let fetch = {
                    let api = api.clone();
                    move || {
                        let api = api.clone();
                        async move { api.0.favorites().await }
                    }
                };
                match cache
                    .get(CacheKey::favorites(), CachePolicy::FAVORITES, fetch)
                    .await
                {
                    Ok(list) => {
                        favorites.set(list);
                        status.set(FavoritesStatus::Ready);
                    }
                    Err(err) => status.set(FavoritesStatus::Failed(err.to_string())),
                }
            });
        }
    });

    let handle_remove = use_callback({
        let api = api.clone();
        let cache = cache.clone();
        move |book_id: u32| {
            let api = api.clone();
            let cache = cache.clone();
            let mut stamp = favorites_version.0;
            spawn(async move {
                match api.0.remove_favorite(book_id).await {
                    Ok(()) => {
                        favorites.mutate(|list| list.retain(|book| book.id != book_id));
                        cache.invalidate(CacheKey::is_favorites);
                        stamp += 1;
                    }
                    Err(err) => error!("failed to remove favorite {}: {}", book_id, err),
                }
            });
        }
    });

    if !session.read().is_authenticated() {
        return rsx! {
            section { class: "bw-view bw-view--favorites",
                div { class: "bw-empty-state",
                    h2 { class: "bw-empty-title", "Your favorites live here" }
                    p { class: "bw-empty-detail", "Sign in to save books and find them again later." }
                    button {
                        class: "bw-btn bw-btn--primary",
                        onclick: move |_| view.set(View::Login { redirect: None }),
                        "Sign in"
                    }
                }
            }
        };
    }

    let list = favorites.read().clone();

    rsx! {
        section { class: "bw-view bw-view--favorites",
            header { class: "bw-results-header",
                h2 { class: "bw-results-title", "Your favorites" }
                span { class: "bw-results-count", "{list.len()} saved" }
            }

            {match status.read().clone() {
                FavoritesStatus::Pending => rsx! {
                    EmptyState {
                        title: "Loading favorites…",
                        detail: "Fetching your saved books.",
                    }
                },
                FavoritesStatus::Failed(err) => rsx! {
                    EmptyState {
                        title: "Favorites unavailable",
                        detail: "{err}",
                    }
                },
                FavoritesStatus::Ready => rsx! {
                    if list.is_empty() {
                        EmptyState {
                            title: "Nothing saved yet",
                            detail: "Tap the heart on any book to keep it here.",
                        }
                    }
                    ul { class: "bw-fav-list",
                        for book in list.iter() {
                            li { key: "{book.id}", class: "bw-fav-row",
                                div { class: "bw-fav-cover",
                                    if book.cover_image_url.is_empty() {
                                        span { class: "bw-book-cover-fallback", "📖" }
                                    } else {
                                        img { src: "{book.cover_image_url}", alt: "Cover of {book.title}", loading: "lazy" }
                                    }
                                }
                                div { class: "bw-fav-main",
                                    h3 { class: "bw-book-title", "{book.title}" }
                                    p { class: "bw-book-author", "{book.author}" }
                                    span { class: "bw-fav-saved", "Saved {book.favorited_at}" }
                                }
                                button {
                                    class: "bw-btn bw-btn--ghost",
                                    onclick: {
                                        let id = book.id;
                                        move |_| handle_remove.call(id)
                                    },
                                    "Remove"
                                }
                            }
                        }
                    }
                },
            }}
        }
    }
}
