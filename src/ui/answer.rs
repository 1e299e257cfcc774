use dioxus::prelude::*;

use crate::markdown;

/// Markdown answer rendered to HTML.
#[component]
pub fn AnswerBody(answer: String) -> Element {
    let html = markdown::render(&answer).into_string();
    rsx! {
        div { class: "prose", dangerous_inner_html: "{html}" }
    }
}

#[component]
pub fn AnswerPanel(answer: String) -> Element {
    if answer.is_empty() {
        return rsx! {};
    }
    rsx! {
        div { class: "answer",
            h2 { "Answer:" }
            AnswerBody { answer }
        }
    }
}

#[component]
pub fn ErrorBox(error: String) -> Element {
    if error.is_empty() {
        return rsx! {};
    }
    rsx! {
        div { class: "error-box", "{error}" }
    }
}
