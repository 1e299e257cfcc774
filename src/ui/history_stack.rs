use dioxus::prelude::*;

use crate::{
    history::History,
    ui::{answer::AnswerBody, collapsible::Collapsible},
};

/// Past turns under the main panel. All items share one expand flag.
#[component]
pub fn HistoryStack(
    history: History,
    expanded: bool,
    on_toggle: Callback<(), ()>,
    on_clear: Callback<(), ()>,
) -> Element {
    if history.is_empty() {
        return rsx! {};
    }
    let turns: Vec<(usize, String, String)> = history
        .iter()
        .enumerate()
        .map(|(i, t)| (i, t.question.clone(), t.answer.clone()))
        .collect();

    rsx! {
        section { class: "history-stack",
            div { class: "stack-header",
                h2 { "History" }
                button {
                    class: "clear-button",
                    onclick: move |_| on_clear.call(()),
                    "Clear"
                }
            }
            for (index, question, answer) in turns {
                div { key: "{index}", class: "stack-item",
                    p { class: "stack-question", "{question}" }
                    Collapsible { expanded, on_toggle,
                        AnswerBody { answer }
                    }
                }
            }
        }
    }
}
