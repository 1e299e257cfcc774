//! The two chat page variants.
//!
//! Both drive a [`ChatController`] and redraw from the [`ChatState`] it
//! reports. History is loaded once when the page mounts.

use std::rc::Rc;

use dioxus::prelude::*;

use crate::{
    api::HttpAskClient,
    chat::{ChatController, ChatState, Layout},
    config::AppConfig,
    storage::{get_storage, AppStorage},
    ui::{
        answer::{AnswerPanel, ErrorBox},
        chat_input::QuestionForm,
        history_sidebar::HistorySidebar,
        history_stack::HistoryStack,
        toaster::{ToastList, ToastNotifier},
    },
};

pub type PageController = ChatController<AppStorage, HttpAskClient, ToastNotifier>;

const TITLE: &str = "Ask Assistant";

fn use_chat(layout: Layout) -> (Rc<PageController>, Signal<ChatState>) {
    let config = use_context::<AppConfig>();
    let toasts = use_context::<Signal<ToastList>>();
    let view = use_signal(|| ChatState::new(layout));
    let ctl = use_hook(move || {
        let client = HttpAskClient::new(config.ask_endpoint());
        let controller = ChatController::new(layout, get_storage(), client, ToastNotifier::new(toasts))
            .on_change(move |state| {
                let mut view = view;
                view.set(state.clone());
            });
        Rc::new(controller)
    });
    let loader = ctl.clone();
    use_hook(move || {
        spawn(async move {
            loader.load_history().await;
        })
    });
    (ctl, view)
}

fn question_callbacks(ctl: &Rc<PageController>) -> (Callback<String, ()>, Callback<(), ()>) {
    let input_ctl = ctl.clone();
    let on_input = use_callback(move |text: String| input_ctl.set_question(text));
    let submit_ctl = ctl.clone();
    let on_submit = use_callback(move |_: ()| {
        let ctl = submit_ctl.clone();
        spawn(async move {
            ctl.submit().await;
        });
    });
    (on_input, on_submit)
}

fn clear_callback(ctl: &Rc<PageController>) -> Callback<(), ()> {
    let ctl = ctl.clone();
    use_callback(move |_: ()| {
        let ctl = ctl.clone();
        spawn(async move {
            ctl.clear_history().await;
        });
    })
}

/// History in a side panel, answer in the main column.
#[component]
pub fn Home() -> Element {
    let (ctl, view) = use_chat(Layout::Sidebar);
    let (on_input, on_submit) = question_callbacks(&ctl);
    let on_clear = clear_callback(&ctl);
    let select_ctl = ctl.clone();
    let on_select = use_callback(move |index: usize| {
        select_ctl.select_past_turn(index);
    });
    let state = view();

    rsx! {
        div { class: "page sidebar-layout",
            HistorySidebar {
                history: state.history,
                selected: state.selected,
                on_select,
                on_clear,
            }
            main { class: "main",
                div { class: "card",
                    h1 { "{TITLE}" }
                    QuestionForm {
                        question: state.question,
                        loading: state.loading,
                        ready: state.loaded,
                        on_input,
                        on_submit,
                    }
                    AnswerPanel { answer: state.answer }
                    ErrorBox { error: state.error }
                }
            }
        }
    }
}

/// Single column: question, answer, then every past turn.
#[component]
pub fn Stacked() -> Element {
    let (ctl, view) = use_chat(Layout::Stacked);
    let (on_input, on_submit) = question_callbacks(&ctl);
    let on_clear = clear_callback(&ctl);
    let toggle_ctl = ctl.clone();
    let on_toggle = use_callback(move |_: ()| {
        toggle_ctl.toggle_expand();
    });
    let state = view();

    rsx! {
        div { class: "page stacked-layout",
            main { class: "main",
                div { class: "card",
                    h1 { "{TITLE}" }
                    QuestionForm {
                        question: state.question,
                        loading: state.loading,
                        ready: state.loaded,
                        on_input,
                        on_submit,
                    }
                    AnswerPanel { answer: state.answer }
                    ErrorBox { error: state.error }
                    HistoryStack {
                        history: state.history,
                        expanded: state.expanded,
                        on_toggle,
                        on_clear,
                    }
                }
            }
        }
    }
}
