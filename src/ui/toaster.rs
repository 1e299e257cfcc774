use std::time::Duration;

use dioxus::{dioxus_core::spawn_forever, prelude::*};

use crate::{notify::Notifier, utils::sleep};

const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
}

/// Visible toasts plus the id counter. One instance is shared by every page,
/// so ids stay unique across navigation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToastList {
    next_id: u64,
    toasts: Vec<Toast>,
}

impl ToastList {
    pub fn push(&mut self, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            message: message.into(),
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|t| t.id != id);
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }
}

/// Pushes toasts into the list shown by [`Toaster`] and drops each one after a
/// few seconds. The timer is not tied to the page that raised the toast.
pub struct ToastNotifier {
    list: Signal<ToastList>,
}

impl ToastNotifier {
    pub fn new(list: Signal<ToastList>) -> Self {
        Self { list }
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, message: &str) {
        let mut list = self.list;
        let id = list.write().push(message);
        spawn_forever(async move {
            sleep(TOAST_TTL).await;
            list.write().dismiss(id);
        });
    }
}

#[component]
pub fn Toaster() -> Element {
    let mut list = use_context::<Signal<ToastList>>();
    let toasts: Vec<(u64, String)> = list
        .read()
        .toasts()
        .iter()
        .map(|t| (t.id, t.message.clone()))
        .collect();
    rsx! {
        div { class: "toaster",
            for (id, message) in toasts {
                div {
                    key: "{id}",
                    class: "toast toast-error",
                    onclick: move |_| list.write().dismiss(id),
                    "{message}"
                }
            }
        }
    }
}
