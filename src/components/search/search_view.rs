use dioxus::logger::tracing::{error, info};
use dioxus::prelude::*;
use futures_channel::mpsc::UnboundedReceiver;
use futures_util::StreamExt;

use crate::api::types::Book;
use crate::cache::{CacheKey, CachePolicy};
use crate::search::{FetchTicket, SearchCoordinator, SIMILAR_LIMIT};

use super::super::{use_api, use_cache, use_location, CatalogStatus, CATALOG_PAGE_SIZE};
use super::{BookCard, EmptyState, SearchCard, SimilarCard};

/// Main catalog view: search card, similarity results for a selection,
/// and the browsable catalog grid otherwise.
#[component]
pub fn SearchView() -> Element {
    let api = use_api();
    let cache = use_cache();
    let location = use_location();

    let mut books = use_signal(Vec::<Book>::new);
    let mut catalog_status = use_signal(|| CatalogStatus::Pending);
    let mut coordinator = use_signal(SearchCoordinator::new);

    // Similarity fetches run detached per ticket; the coordinator's
    // generation check decides whose response still matters when they
    // resolve out of order.
    let similar_task = use_coroutine({
        let api = api.clone();
        let cache = cache.clone();
        move |mut rx: UnboundedReceiver<FetchTicket>| {
            let api = api.clone();
            let cache = cache.clone();
            async move {
            while let Some(ticket) = rx.next().await {
                let api = api.clone();
                let cache = cache.clone();
                spawn(async move {
                    info!("🔍 fetching similar books for book {}", ticket.book_id);
                    let fetch = {
                        let api = api.clone();
                        move || {
                            let api = api.clone();
                            async move { api.0.similar_books(ticket.book_id, SIMILAR_LIMIT).await }
                        }
                    };
                    let outcome = cache
                        .get(
                            CacheKey::similar(ticket.book_id, SIMILAR_LIMIT),
                            CachePolicy::SIMILAR,
                            fetch,
                        )
                        .await;
                    match outcome {
                        Ok(results) => {
                            if coordinator.write().apply_results(ticket, results) {
                                info!("✅ similar books updated for book {}", ticket.book_id);
                            }
                        }
                        Err(err) => {
                            // The selection stays; it just shows zero
                            // recommendations.
                            error!("❌ similar books fetch failed: {}", err);
                            coordinator.write().apply_failure(ticket);
                        }
                    }
                });
            }
            }
        }
    });

    // Catalog load, then deep-link restore against the loaded collection
    // (restore never re-writes the URL).
    use_effect({
        let api = api.clone();
        let cache = cache.clone();
        let location = location.clone();
        move || {
            if *catalog_status.peek() != CatalogStatus::Pending {
                return;
            }
            let api = api.clone();
            let cache = cache.clone();
            let location = location.clone();
            spawn(async move {
                let fetch = {
                    let api = api.clone();
                    move || {
                        let api = api.clone();
                        async move { api.0.books(1, CATALOG_PAGE_SIZE).await }
                    }
                };
                match cache
                    .get(CacheKey::books(1, CATALOG_PAGE_SIZE), CachePolicy::CATALOG, fetch)
                    .await
                {
                    Ok(page) => {
                        books.set(page.books.clone());
                        catalog_status.set(CatalogStatus::Ready { total: page.total });
                        if let Some(params) = location.0.current() {
                            let ticket = coordinator.write().restore(&params, &page.books);
                            if let Some(ticket) = ticket {
                                similar_task.send(ticket);
                            }
                        }
                    }
                    Err(err) => {
                        error!("catalog load failed: {}", err);
                        catalog_status.set(CatalogStatus::Failed(err.to_string()));
                    }
                }
            });
        }
    });

    let handle_select = use_callback({
        let location = location.clone();
        move |book: Book| {
            let ticket = coordinator.write().select(&book);
            location.0.replace(coordinator.read().params().as_ref());
            similar_task.send(ticket);
        }
    });

    let handle_submit = use_callback({
        let location = location.clone();
        move |_: ()| {
            let ticket = coordinator.write().submit(&books.read());
            if let Some(ticket) = ticket {
                location.0.replace(coordinator.read().params().as_ref());
                similar_task.send(ticket);
            }
        }
    });

    let handle_reset = use_callback({
        let location = location.clone();
        move |_: ()| {
            coordinator.write().reset();
            location.0.replace(None);
        }
    });

    let selected = coordinator.read().selected().cloned();
    let results = coordinator.read().results().to_vec();
    let fetching = coordinator.read().is_fetching();
    let status = catalog_status.read().clone();

    rsx! {
        section { class: "bw-view bw-view--catalog",
            SearchCard {
                coordinator,
                books,
                on_select: move |book| handle_select.call(book),
                on_submit: move |_| handle_submit.call(()),
                on_reset: move |_| handle_reset.call(()),
            }

            {match status {
                CatalogStatus::Pending => rsx! {
                    EmptyState {
                        title: "Loading the catalog…",
                        detail: "Hold on while the book list arrives.",
                    }
                },
                CatalogStatus::Failed(err) => rsx! {
                    EmptyState {
                        title: "Catalog unavailable",
                        detail: "{err}",
                    }
                },
                CatalogStatus::Ready { total } => rsx! {
                    if let Some(book) = selected {
                        section { class: "bw-results-section",
                            header { class: "bw-results-header",
                                h2 { class: "bw-results-title", "Because you picked \"{book.title}\"" }
                                span { class: "bw-results-count",
                                    if fetching {
                                        "Finding similar books…"
                                    } else {
                                        "{results.len()} recommendation(s)"
                                    }
                                }
                            }
                            if !fetching && results.is_empty() {
                                EmptyState {
                                    title: "No recommendations",
                                    detail: "We could not find anything close to this one right now.",
                                }
                            }
                            div { class: "bw-card-grid",
                                for (idx, similar) in results.iter().enumerate() {
                                    SimilarCard {
                                        key: "{similar.id}",
                                        rank: idx + 1,
                                        similar: similar.clone(),
                                    }
                                }
                            }
                        }
                    } else {
                        section { class: "bw-results-section",
                            header { class: "bw-results-header",
                                h2 { class: "bw-results-title", "Browse the catalog" }
                                span { class: "bw-results-count", "{total} books" }
                            }
                            div { class: "bw-card-grid",
                                for book in books.read().iter() {
                                    BookCard {
                                        key: "{book.id}",
                                        book: book.clone(),
                                        on_select: move |book| handle_select.call(book),
                                    }
                                }
                            }
                        }
                    }
                },
            }}
        }
    }
}
