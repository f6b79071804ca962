use dioxus::prelude::*;

use crate::api::types::Book;

use super::super::favorites::FavoriteButton;

/// Catalog grid card. Clicking anywhere selects the book (triggering a
/// similarity fetch); the favorite button stops propagation.
#[component]
pub fn BookCard(book: Book, on_select: EventHandler<Book>) -> Element {
    let rating = format!("{:.1}", book.rating);
    let year = book.pub_year;

    rsx! {
        article {
            class: "bw-book-card",
            onclick: {
                let book = book.clone();
                move |_| on_select.call(book.clone())
            },

            div { class: "bw-book-cover",
                if book.cover_image_url.is_empty() {
                    span { class: "bw-book-cover-fallback", "📖" }
                } else {
                    img {
                        src: "{book.cover_image_url}",
                        alt: "Cover of {book.title}",
                        loading: "lazy",
                    }
                }
            }

            div { class: "bw-book-main",
                h3 { class: "bw-book-title", "{book.title}" }
                p { class: "bw-book-author", "{book.author} · {year}" }
                div { class: "bw-book-meta",
                    span { class: "bw-tag", "{book.genre}" }
                    span { class: "bw-book-rating", "★ {rating}" }
                }
            }

            FavoriteButton { book_id: book.id }
        }
    }
}
