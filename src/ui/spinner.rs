use dioxus::prelude::*;

#[component]
pub fn Spinner() -> Element {
    rsx! {
        span { class: "spinner", role: "status", aria_label: "Loading" }
    }
}
