use dioxus::logger::tracing::Level;
use dioxus::prelude::*;

mod components;
mod config;
mod db;
mod keepalive;
mod live;
mod playback;
mod utils;

use components::RadioWidget;

const WIDGET_CSS: Asset = asset!("/assets/styling/widget.css");

fn main() {
    let level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };
    if let Err(err) = dioxus::logger::init(level) {
        eprintln!("failed to initialize logger: {err}");
    }
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Title { "qaa radio" }
        document::Meta { name: "theme-color", content: "#101014" }
        document::Stylesheet { href: WIDGET_CSS }

        RadioWidget {}
    }
}
