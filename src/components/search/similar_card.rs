use dioxus::prelude::*;

use crate::api::types::SimilarBook;

use super::super::favorites::FavoriteButton;

/// Recommendation card: rank, cover, and the similarity score as a
/// percentage bar.
#[component]
pub fn SimilarCard(rank: usize, similar: SimilarBook) -> Element {
    let score_pct = (similar.similarity_score.clamp(0.0, 1.0) * 100.0).round() as u32;
    let rating = format!("{:.1}", similar.rating);

    rsx! {
        article { class: "bw-book-card bw-book-card--similar",
            div { class: "bw-result-rank", "#{rank}" }

            div { class: "bw-book-cover",
                if similar.cover_image_url.is_empty() {
                    span { class: "bw-book-cover-fallback", "📖" }
                } else {
                    img {
                        src: "{similar.cover_image_url}",
                        alt: "Cover of {similar.title}",
                        loading: "lazy",
                    }
                }
            }

            div { class: "bw-book-main",
                h3 { class: "bw-book-title", "{similar.title}" }
                p { class: "bw-book-author", "{similar.author}" }
                div { class: "bw-book-meta",
                    span { class: "bw-tag", "{similar.genre}" }
                    span { class: "bw-book-rating", "★ {rating}" }
                }
            }

            div { class: "bw-similarity",
                div { class: "bw-similarity-label",
                    span { "match" }
                    span { class: "bw-similarity-score", "{score_pct}%" }
                }
                div { class: "bw-progress-bar",
                    span { style: "width: {score_pct}%;" }
                }
            }

            FavoriteButton { book_id: similar.id }
        }
    }
}
