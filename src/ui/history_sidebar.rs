use dioxus::prelude::*;

use crate::history::History;

const PREVIEW_CHARS: usize = 30;

/// Newest-first list of past questions. Clicking one re-opens it.
#[component]
pub fn HistorySidebar(
    history: History,
    selected: Option<usize>,
    on_select: Callback<usize, ()>,
    on_clear: Callback<(), ()>,
) -> Element {
    let items: Vec<(usize, String, &'static str)> = history
        .recent_first()
        .map(|(index, turn)| {
            let class = if selected == Some(index) {
                "history-item active"
            } else {
                "history-item"
            };
            (index, turn.preview(PREVIEW_CHARS), class)
        })
        .collect();

    rsx! {
        aside { class: "sidebar",
            div { class: "sidebar-header",
                h2 { "History" }
                button {
                    class: "clear-button",
                    onclick: move |_| on_clear.call(()),
                    "Clear"
                }
            }
            div { class: "sidebar-list",
                if items.is_empty() {
                    p { class: "muted", "No conversations yet." }
                } else {
                    ul {
                        for (index, label, class) in items {
                            li {
                                key: "{index}",
                                class,
                                onclick: move |_| on_select.call(index),
                                "{label}"
                            }
                        }
                    }
                }
            }
        }
    }
}
