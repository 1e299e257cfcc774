// Copyright © 2025 Nipun Kumar

use dioxus::prelude::*;

use crate::ui::spinner::Spinner;

/// Question textarea plus the "Ask" button. Ctrl+Enter submits as well.
/// Nothing can be submitted until `ready`.
#[component]
pub fn QuestionForm(
    question: String,
    loading: bool,
    ready: bool,
    on_input: Callback<String, ()>,
    on_submit: Callback<(), ()>,
) -> Element {
    let blank = question.trim().is_empty();
    let disabled = !ready || loading || blank;
    rsx! {
        form {
            class: "question-form",
            onsubmit: move |e: Event<FormData>| {
                e.prevent_default();
                if !disabled {
                    on_submit.call(());
                }
            },
            textarea {
                rows: "4",
                placeholder: "Ask your question...",
                required: true,
                value: "{question}",
                oninput: move |e: Event<FormData>| on_input.call(e.value()),
                onkeypress: move |e: Event<KeyboardData>| {
                    if e.code() == Code::Enter && e.modifiers().ctrl() && !disabled {
                        on_submit.call(());
                    }
                },
            }
            button {
                r#type: "submit",
                class: "ask-button",
                disabled,
                if loading {
                    Spinner {}
                } else {
                    "Ask"
                }
            }
        }
    }
}
