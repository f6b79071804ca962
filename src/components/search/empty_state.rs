use dioxus::prelude::*;

/// Neutral empty/placeholder panel. Empty results are a state, not an
/// error.
#[component]
pub fn EmptyState(title: String, detail: String) -> Element {
    rsx! {
        div { class: "bw-empty-state",
            h2 { class: "bw-empty-title", "{title}" }
            p { class: "bw-empty-detail", "{detail}" }
        }
    }
}
