use dioxus::prelude::*;

/// Static footer strip.
#[component]
pub fn Footer() -> Element {
    rsx! {
        footer { class: "bw-footer",
            span { "Bookwise" }
            span { class: "bw-footer-dot", "•" }
            span { "Recommendations served fresh from the catalog" }
        }
    }
}
