use dioxus::prelude::*;

use crate::api::types::Book;
use crate::search::{filter_candidates, SearchCoordinator};

/// Search input with typeahead dropdown.
///
/// Candidates are derived on every keystroke (case-insensitive substring
/// over title/author, capped at ten, collection order). Keyboard support:
/// arrows move the highlight, Enter picks the highlighted candidate (or
/// submits, falling back to the first candidate), Escape closes. The
/// dropdown closes on focus loss; option clicks use `mousedown`, which
/// fires before the input's `focusout`.
#[component]
pub fn SearchCard(
    coordinator: Signal<SearchCoordinator>,
    books: ReadOnlySignal<Vec<Book>>,
    on_select: EventHandler<Book>,
    on_submit: EventHandler<()>,
    on_reset: EventHandler<()>,
) -> Element {
    let mut coordinator = coordinator;
    let mut open = use_signal(|| false);
    let mut highlighted = use_signal(|| 0usize);

    let query = coordinator.read().query().to_string();
    let candidates: Vec<Book> = filter_candidates(&books.read(), &query)
        .into_iter()
        .cloned()
        .collect();
    let has_query = !query.trim().is_empty() || coordinator.read().selected().is_some();

    let handle_key = {
        let candidates = candidates.clone();
        move |evt: KeyboardEvent| match evt.key() {
            Key::Enter => {
                if open() && !candidates.is_empty() {
                    let idx = highlighted().min(candidates.len() - 1);
                    on_select.call(candidates[idx].clone());
                    open.set(false);
                } else {
                    on_submit.call(());
                    open.set(false);
                }
            }
            Key::Escape => open.set(false),
            Key::ArrowDown => {
                evt.prevent_default();
                if !candidates.is_empty() {
                    open.set(true);
                    highlighted.set((highlighted() + 1) % candidates.len());
                }
            }
            Key::ArrowUp => {
                evt.prevent_default();
                if !candidates.is_empty() {
                    let previous = highlighted()
                        .checked_sub(1)
                        .unwrap_or(candidates.len() - 1);
                    highlighted.set(previous);
                }
            }
            _ => {}
        }
    };

    rsx! {
        section { class: "bw-search-card",
            div { class: "bw-search-row",
                div { class: "bw-search-field",
                    input {
                        class: "bw-search-input",
                        r#type: "text",
                        placeholder: "Search by title or author…",
                        value: "{query}",
                        oninput: move |evt| {
                            coordinator.write().set_query(evt.value());
                            open.set(true);
                            highlighted.set(0);
                        },
                        onkeydown: handle_key,
                        onfocusin: move |_| open.set(true),
                        onfocusout: move |_| open.set(false),
                    }

                    if open() && !candidates.is_empty() {
                        ul { class: "bw-search-dropdown",
                            for (idx, candidate) in candidates.iter().enumerate() {
                                li {
                                    key: "{candidate.id}",
                                    class: if idx == highlighted() {
                                        "bw-search-option bw-search-option--active"
                                    } else {
                                        "bw-search-option"
                                    },
                                    // mousedown beats the input's focusout
                                    onmousedown: {
                                        let candidate = candidate.clone();
                                        move |_| {
                                            on_select.call(candidate.clone());
                                            open.set(false);
                                        }
                                    },
                                    span { class: "bw-search-option-title", "{candidate.title}" }
                                    span { class: "bw-search-option-author", "{candidate.author}" }
                                }
                            }
                        }
                    }
                }

                button {
                    class: "bw-btn bw-btn--primary",
                    onclick: move |_| on_submit.call(()),
                    "Search"
                }
                if has_query {
                    button {
                        class: "bw-btn bw-btn--ghost",
                        onclick: move |_| on_reset.call(()),
                        "Reset"
                    }
                }
            }
        }
    }
}
