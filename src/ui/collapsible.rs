use dioxus::prelude::*;

const EXPAND_ICON: Asset = asset!("/assets/expand.svg");
const COLLAPSE_ICON: Asset = asset!("/assets/collapse.svg");

/// Shows `children` only while `expanded`. The flag is owned by the caller.
#[component]
pub fn Collapsible(expanded: bool, on_toggle: Callback<(), ()>, children: Element) -> Element {
    rsx! {
        button {
            class: "collapse-toggle",
            onclick: move |_e| {
                on_toggle.call(());
            },
            if expanded {
                img { src: COLLAPSE_ICON }
            } else {
                img { src: EXPAND_ICON }
            }
        }
        if expanded {
            {children}
        }
    }
}
