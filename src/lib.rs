use dioxus::prelude::*;

pub mod api;
pub mod chat;
pub mod config;
pub mod history;
pub mod markdown;
pub mod notify;
pub mod storage;
mod ui;
mod utils;

use ui::home::{Home, Stacked};
use ui::toaster::{ToastList, Toaster};

const FAVICON: Asset = asset!("/assets/favicon.svg");
const MAIN_CSS: Asset = asset!("/assets/main.css");

#[component]
pub fn App() -> Element {
    use_context_provider(|| Signal::new(ToastList::default()));
    rsx! {
        document::Link { rel: "icon", href: FAVICON }
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        Router::<Route> {}
    }
}

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Layout)]
    #[route("/")]
    Home {},
    #[route("/stacked")]
    Stacked {},
    #[route("/:..segments")]
    PageNotFound { segments: Vec<String> },
}

/// Shared layout component.
#[component]
fn Layout() -> Element {
    rsx! {
        Toaster {}
        nav { class: "layout-nav",
            Link { to: Route::Home {}, "Sidebar" }
            Link { to: Route::Stacked {}, "Stacked" }
        }
        Outlet::<Route> {}
    }
}

#[component]
fn PageNotFound(segments: Vec<String>) -> Element {
    rsx! {
        "Could not find the page you are looking for."
        Link { to: Route::Home {}, "Go To Home" }
    }
}
