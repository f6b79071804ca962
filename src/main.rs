use bookwise::components::App;
use dioxus::prelude::*;

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::launch(Shell);
}

#[component]
fn Shell() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        App {}
    }
}
