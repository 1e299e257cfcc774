//! The chat page without its renderer.
//!
//! [`ChatState`] holds everything a page shows. [`ChatController`] drives it:
//! it talks to the endpoint, mirrors the history into a [`HistoryStore`] and
//! raises notifications. The UI layer only forwards events and redraws from
//! the state passed to the change observer.
//!
//! Submissions go `idle -> submitting -> (answered | failed) -> idle`. The
//! endpoint call is the only suspension point; while it is pending further
//! submissions are ignored rather than queued.
//!
//! Nothing touches the history until the persisted copy has been loaded, so a
//! slow load can never overwrite turns accepted or cleared in the meantime.

use std::cell::RefCell;

use dioxus::logger::tracing::{debug, info, warn};

use crate::{
    api::AskClient,
    history::{History, Turn},
    notify::Notifier,
    storage::HistoryStore,
};

/// Which of the two page layouts is being driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// History in a side panel; past turns can be re-opened.
    #[default]
    Sidebar,
    /// History stacked under the answer with expand/collapse.
    Stacked,
}

impl Layout {
    fn clears_question_on_success(self) -> bool {
        matches!(self, Layout::Sidebar)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatState {
    pub layout: Layout,
    pub question: String,
    pub answer: String,
    pub loading: bool,
    /// Empty when there is no error.
    pub error: String,
    pub history: History,
    /// Chronological index of the re-opened turn (sidebar).
    pub selected: Option<usize>,
    /// Shared by every history item (stacked).
    pub expanded: bool,
    /// Set once the persisted history has been read (or found unreadable).
    pub loaded: bool,
}

impl ChatState {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            ..Default::default()
        }
    }

    /// A whitespace-only draft counts as blank and cannot be submitted, even
    /// though a plain `required` textarea would accept it.
    pub fn can_submit(&self) -> bool {
        self.loaded && !self.loading && !self.question.trim().is_empty()
    }

    /// Moves to `submitting` and returns the question to send, or `None` when
    /// history is still loading, a submission is already pending or the draft
    /// is blank.
    fn begin_submit(&mut self) -> Option<String> {
        if !self.can_submit() {
            return None;
        }
        self.loading = true;
        self.error.clear();
        Some(self.question.clone())
    }

    fn finish_answered(&mut self, question: String, answer: String) {
        self.answer = answer.clone();
        self.history.push(Turn { question, answer });
        if self.layout.clears_question_on_success() {
            self.question.clear();
        }
        self.selected = None;
        self.loading = false;
    }

    fn finish_failed(&mut self, message: String) {
        self.error = message;
        self.loading = false;
    }
}

/// Result of one call to [`ChatController::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Blank draft, history not loaded yet, or another submission still
    /// pending. Nothing was sent.
    Ignored,
    Answered(Turn),
    Failed(String),
}

type Observer = Box<dyn Fn(&ChatState)>;

pub struct ChatController<S, C, N> {
    store: S,
    client: C,
    notifier: N,
    state: RefCell<ChatState>,
    observer: Option<Observer>,
}

impl<S, C, N> ChatController<S, C, N>
where
    S: HistoryStore,
    C: AskClient,
    N: Notifier,
{
    pub fn new(layout: Layout, store: S, client: C, notifier: N) -> Self {
        Self {
            store,
            client,
            notifier,
            state: RefCell::new(ChatState::new(layout)),
            observer: None,
        }
    }

    /// Called with the new state after every change.
    pub fn on_change(mut self, observer: impl Fn(&ChatState) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn snapshot(&self) -> ChatState {
        self.state.borrow().clone()
    }

    fn update<R>(&self, f: impl FnOnce(&mut ChatState) -> R) -> R {
        let (result, snapshot) = {
            let mut state = self.state.borrow_mut();
            let result = f(&mut state);
            (result, state.clone())
        };
        if let Some(observer) = &self.observer {
            observer(&snapshot);
        }
        result
    }

    async fn persist(&self) {
        let history = self.state.borrow().history.clone();
        if let Err(e) = self.store.save_history(&history).await {
            warn!("Could not save history: {e:?}");
        }
    }

    pub fn set_question(&self, text: impl Into<String>) {
        let text = text.into();
        self.update(|s| s.question = text);
    }

    /// Replaces the in-memory history with the persisted one, if any. Runs
    /// once; later calls return immediately.
    pub async fn load_history(&self) {
        if self.state.borrow().loaded {
            return;
        }
        let stored = match self.store.load_history().await {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Ignoring unreadable history: {e:?}");
                None
            }
        };
        if let Some(history) = &stored {
            info!("Loaded {} past turns", history.len());
        }
        self.update(|s| {
            if let Some(history) = stored {
                s.history = history;
            }
            s.loaded = true;
        });
    }

    pub async fn submit(&self) -> Submission {
        let Some(question) = self.update(ChatState::begin_submit) else {
            return Submission::Ignored;
        };
        debug!("Submitting question ({} chars)", question.len());

        match self.client.ask(&question).await {
            Ok(answer) => {
                let turn = Turn::new(question.clone(), answer.clone());
                self.update(|s| s.finish_answered(question, answer));
                self.persist().await;
                debug!("Question answered");
                Submission::Answered(turn)
            }
            Err(e) => {
                warn!("Ask failed: {e}");
                let message = e.user_message();
                self.update(|s| s.finish_failed(message.clone()));
                self.notifier.notify(&message);
                Submission::Failed(message)
            }
        }
    }

    /// Empties the history and its persisted copy. There is no undo. Ignored
    /// until the history has been loaded.
    pub async fn clear_history(&self) -> bool {
        if !self.state.borrow().loaded {
            return false;
        }
        self.update(|s| {
            s.history.clear();
            s.selected = None;
        });
        if let Err(e) = self.store.clear_history().await {
            warn!("Could not clear stored history: {e:?}");
        }
        info!("History cleared");
        true
    }

    /// Shows a stored turn again without asking the endpoint. Sidebar only.
    pub fn select_past_turn(&self, index: usize) -> bool {
        self.update(|s| {
            if s.layout != Layout::Sidebar {
                return false;
            }
            let Some(turn) = s.history.get(index).cloned() else {
                return false;
            };
            s.question = turn.question;
            s.answer = turn.answer;
            s.selected = Some(index);
            true
        })
    }

    /// Flips the expand flag shared by all history items. Stacked only.
    pub fn toggle_expand(&self) -> bool {
        self.update(|s| {
            if s.layout != Layout::Stacked {
                return false;
            }
            s.expanded = !s.expanded;
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AskError, REJECTED_FALLBACK, UNREACHABLE_MESSAGE};
    use crate::storage::FileStorage;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::time::Duration;

    /// Replays canned results and counts calls.
    #[derive(Default)]
    struct ScriptedClient {
        replies: RefCell<VecDeque<Result<String, AskError>>>,
        calls: Cell<usize>,
    }

    impl ScriptedClient {
        fn answering(answers: &[&str]) -> Self {
            Self {
                replies: RefCell::new(answers.iter().map(|a| Ok(a.to_string())).collect()),
                calls: Cell::new(0),
            }
        }

        fn failing(err: AskError) -> Self {
            Self {
                replies: RefCell::new(VecDeque::from([Err(err)])),
                calls: Cell::new(0),
            }
        }
    }

    #[async_trait(?Send)]
    impl AskClient for ScriptedClient {
        async fn ask(&self, _question: &str) -> Result<String, AskError> {
            self.calls.set(self.calls.get() + 1);
            tokio::task::yield_now().await;
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(AskError::Unreachable("script exhausted".into())))
        }
    }

    #[derive(Default, Clone)]
    struct RecordingNotifier(Rc<RefCell<Vec<String>>>);

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str) {
            self.0.borrow_mut().push(message.to_string());
        }
    }

    /// A controller whose history has been loaded, as after the page mounts.
    async fn controller(
        layout: Layout,
        dir: &tempfile::TempDir,
        client: ScriptedClient,
    ) -> (ChatController<FileStorage, ScriptedClient, RecordingNotifier>, RecordingNotifier) {
        let notifier = RecordingNotifier::default();
        let ctl = ChatController::new(layout, FileStorage::new(dir.path()), client, notifier.clone());
        ctl.load_history().await;
        (ctl, notifier)
    }

    /// File store whose reads finish only after a delay.
    struct SlowLoadStore {
        inner: FileStorage,
        delay: Duration,
    }

    #[async_trait(?Send)]
    impl HistoryStore for SlowLoadStore {
        async fn load_history(&self) -> anyhow::Result<Option<History>> {
            tokio::time::sleep(self.delay).await;
            self.inner.load_history().await
        }

        async fn save_history(&self, history: &History) -> anyhow::Result<()> {
            self.inner.save_history(history).await
        }

        async fn clear_history(&self) -> anyhow::Result<()> {
            self.inner.clear_history().await
        }
    }

    async fn slow_controller_over(
        dir: &tempfile::TempDir,
        stored: &[Turn],
        client: ScriptedClient,
    ) -> ChatController<SlowLoadStore, ScriptedClient, RecordingNotifier> {
        let inner = FileStorage::new(dir.path());
        inner.save_history(&History::from(stored.to_vec())).await.unwrap();
        let store = SlowLoadStore {
            inner,
            delay: Duration::from_millis(50),
        };
        ChatController::new(Layout::Sidebar, store, client, RecordingNotifier::default())
    }

    #[tokio::test]
    async fn answered_submission_appends_one_turn_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let (ctl, notifier) = controller(Layout::Sidebar, &dir, ScriptedClient::answering(&["4"])).await;

        ctl.set_question("What is 2+2?");
        let outcome = ctl.submit().await;

        let expected = Turn::new("What is 2+2?", "4");
        assert_eq!(outcome, Submission::Answered(expected.clone()));
        let state = ctl.snapshot();
        assert_eq!(state.history, History::from(vec![expected.clone()]));
        assert_eq!(state.answer, "4");
        assert_eq!(state.question, "");
        assert!(!state.loading);
        assert!(state.error.is_empty());
        assert!(notifier.0.borrow().is_empty());

        let stored = FileStorage::new(dir.path()).load_history().await.unwrap();
        assert_eq!(stored, Some(History::from(vec![expected])));
    }

    #[tokio::test]
    async fn stacked_layout_keeps_the_draft() {
        let dir = tempfile::tempdir().unwrap();
        let (ctl, _) = controller(Layout::Stacked, &dir, ScriptedClient::answering(&["yes"])).await;

        ctl.set_question("Still here?");
        ctl.submit().await;
        assert_eq!(ctl.snapshot().question, "Still here?");
    }

    #[tokio::test]
    async fn history_survives_reload_for_any_count() {
        for n in 0..4 {
            let dir = tempfile::tempdir().unwrap();
            let answers: Vec<String> = (0..n).map(|i| format!("answer {i}")).collect();
            let answers: Vec<&str> = answers.iter().map(String::as_str).collect();
            let (ctl, _) = controller(Layout::Sidebar, &dir, ScriptedClient::answering(&answers)).await;
            for i in 0..n {
                ctl.set_question(format!("question {i}"));
                ctl.submit().await;
            }
            let before = ctl.snapshot().history;
            assert_eq!(before.len(), n);

            let (reloaded, _) = controller(Layout::Sidebar, &dir, ScriptedClient::default()).await;
            reloaded.load_history().await;
            assert_eq!(reloaded.snapshot().history, before);
        }
    }

    #[tokio::test]
    async fn clearing_empties_memory_and_storage() {
        let dir = tempfile::tempdir().unwrap();
        let (ctl, _) = controller(Layout::Sidebar, &dir, ScriptedClient::answering(&["a", "b"])).await;
        for q in ["one", "two"] {
            ctl.set_question(q);
            ctl.submit().await;
        }
        assert!(ctl.select_past_turn(0));

        ctl.clear_history().await;
        assert!(ctl.snapshot().history.is_empty());
        assert_eq!(ctl.snapshot().selected, None);

        let (reloaded, _) = controller(Layout::Sidebar, &dir, ScriptedClient::default()).await;
        reloaded.load_history().await;
        assert!(reloaded.snapshot().history.is_empty());
    }

    #[tokio::test]
    async fn rejection_keeps_history_and_shows_detail() {
        let dir = tempfile::tempdir().unwrap();
        let err = AskError::Rejected {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: Some("model overloaded".into()),
        };
        let (ctl, notifier) = controller(Layout::Sidebar, &dir, ScriptedClient::failing(err)).await;

        ctl.set_question("Why?");
        let outcome = ctl.submit().await;

        assert_eq!(outcome, Submission::Failed("model overloaded".into()));
        let state = ctl.snapshot();
        assert!(state.history.is_empty());
        assert_eq!(state.error, "model overloaded");
        assert_eq!(state.question, "Why?");
        assert!(!state.loading);
        assert_eq!(*notifier.0.borrow(), vec!["model overloaded".to_string()]);
        assert_eq!(FileStorage::new(dir.path()).load_history().await.unwrap(), None);
    }

    #[tokio::test]
    async fn rejection_without_detail_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let err = AskError::Rejected {
            status: StatusCode::BAD_REQUEST,
            detail: None,
        };
        let (ctl, _) = controller(Layout::Sidebar, &dir, ScriptedClient::failing(err)).await;
        ctl.set_question("Why?");
        ctl.submit().await;
        assert_eq!(ctl.snapshot().error, REJECTED_FALLBACK);
    }

    #[tokio::test]
    async fn transport_failure_sets_fixed_message() {
        let dir = tempfile::tempdir().unwrap();
        let err = AskError::Unreachable("connection refused".into());
        let (ctl, notifier) = controller(Layout::Stacked, &dir, ScriptedClient::failing(err)).await;

        ctl.set_question("Anyone there?");
        ctl.submit().await;

        let state = ctl.snapshot();
        assert!(state.history.is_empty());
        assert_eq!(state.error, UNREACHABLE_MESSAGE);
        assert_eq!(*notifier.0.borrow(), vec![UNREACHABLE_MESSAGE.to_string()]);
    }

    #[tokio::test]
    async fn next_submission_clears_previous_error() {
        let dir = tempfile::tempdir().unwrap();
        let client = ScriptedClient {
            replies: RefCell::new(VecDeque::from([
                Err(AskError::Unreachable("down".into())),
                Ok("up again".to_string()),
            ])),
            calls: Cell::new(0),
        };
        let (ctl, _) = controller(Layout::Stacked, &dir, client).await;

        ctl.set_question("ping");
        ctl.submit().await;
        assert!(!ctl.snapshot().error.is_empty());
        ctl.submit().await;
        assert!(ctl.snapshot().error.is_empty());
        assert_eq!(ctl.snapshot().history.len(), 1);
    }

    #[tokio::test]
    async fn resubmitting_while_in_flight_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let (ctl, _) = controller(Layout::Sidebar, &dir, ScriptedClient::answering(&["once", "twice"])).await;
        ctl.set_question("only once");

        let (first, second) = futures::join!(ctl.submit(), ctl.submit());

        assert_eq!(first, Submission::Answered(Turn::new("only once", "once")));
        assert_eq!(second, Submission::Ignored);
        assert_eq!(ctl.client.calls.get(), 1);
        assert_eq!(ctl.snapshot().history.len(), 1);
    }

    #[tokio::test]
    async fn blank_question_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let (ctl, _) = controller(Layout::Sidebar, &dir, ScriptedClient::answering(&["never"])).await;
        ctl.set_question("   \n");
        assert_eq!(ctl.submit().await, Submission::Ignored);
        assert_eq!(ctl.client.calls.get(), 0);
    }

    #[tokio::test]
    async fn observer_sees_loading_then_result() {
        let dir = tempfile::tempdir().unwrap();
        let seen: Rc<RefCell<Vec<bool>>> = Rc::default();
        let log = seen.clone();
        let (ctl, _) = controller(Layout::Sidebar, &dir, ScriptedClient::answering(&["ok"])).await;
        let ctl = ctl.on_change(move |s| log.borrow_mut().push(s.loading));

        ctl.set_question("q");
        ctl.submit().await;

        assert_eq!(*seen.borrow(), vec![false, true, false]);
    }

    #[tokio::test]
    async fn malformed_stored_history_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        std::fs::write(storage.history_path(), "[{\"question\": 3}]").unwrap();

        let (ctl, _) = controller(Layout::Sidebar, &dir, ScriptedClient::answering(&["fresh"])).await;
        assert!(ctl.snapshot().loaded);
        assert!(ctl.snapshot().history.is_empty());

        ctl.set_question("q");
        ctl.submit().await;
        let stored = storage.load_history().await.unwrap();
        assert_eq!(stored, Some(History::from(vec![Turn::new("q", "fresh")])));
    }

    #[tokio::test]
    async fn selecting_a_past_turn_restores_it_without_asking() {
        let dir = tempfile::tempdir().unwrap();
        let (ctl, _) = controller(Layout::Sidebar, &dir, ScriptedClient::answering(&["A1", "A2"])).await;
        for q in ["Q1", "Q2"] {
            ctl.set_question(q);
            ctl.submit().await;
        }

        assert!(ctl.select_past_turn(0));
        let state = ctl.snapshot();
        assert_eq!((state.question.as_str(), state.answer.as_str()), ("Q1", "A1"));
        assert_eq!(state.selected, Some(0));
        assert_eq!(ctl.client.calls.get(), 2);

        assert!(!ctl.select_past_turn(7));
        assert_eq!(ctl.snapshot().selected, Some(0));
    }

    #[tokio::test]
    async fn layout_specific_operations_are_gated() {
        let dir = tempfile::tempdir().unwrap();
        let (sidebar, _) = controller(Layout::Sidebar, &dir, ScriptedClient::default()).await;
        assert!(!sidebar.toggle_expand());
        assert!(!sidebar.snapshot().expanded);

        let (stacked, _) = controller(Layout::Stacked, &dir, ScriptedClient::answering(&["a"])).await;
        stacked.set_question("q");
        stacked.submit().await;
        assert!(!stacked.select_past_turn(0));
        assert!(stacked.toggle_expand());
        assert!(stacked.snapshot().expanded);
        assert!(stacked.toggle_expand());
        assert!(!stacked.snapshot().expanded);
    }

    #[tokio::test]
    async fn submitting_before_history_loads_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let earlier = Turn::new("A", "a");
        let ctl = slow_controller_over(&dir, &[earlier.clone()], ScriptedClient::answering(&["b"])).await;
        ctl.set_question("B");

        let ((), outcome) = futures::join!(ctl.load_history(), ctl.submit());

        assert_eq!(outcome, Submission::Ignored);
        assert_eq!(ctl.client.calls.get(), 0);
        assert_eq!(ctl.snapshot().history, History::from(vec![earlier.clone()]));
        let stored = FileStorage::new(dir.path()).load_history().await.unwrap();
        assert_eq!(stored, Some(History::from(vec![earlier.clone()])));

        assert_eq!(ctl.submit().await, Submission::Answered(Turn::new("B", "b")));
        let stored = FileStorage::new(dir.path()).load_history().await.unwrap();
        assert_eq!(stored, Some(History::from(vec![earlier, Turn::new("B", "b")])));
    }

    #[tokio::test]
    async fn clearing_before_history_loads_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let earlier = Turn::new("A", "a");
        let ctl = slow_controller_over(&dir, &[earlier.clone()], ScriptedClient::default()).await;

        let ((), cleared) = futures::join!(ctl.load_history(), ctl.clear_history());

        assert!(!cleared);
        assert_eq!(ctl.snapshot().history, History::from(vec![earlier]));
        assert!(ctl.clear_history().await);
        assert!(ctl.snapshot().history.is_empty());
        assert_eq!(FileStorage::new(dir.path()).load_history().await.unwrap(), None);
    }

    #[tokio::test]
    async fn loading_happens_once() {
        let dir = tempfile::tempdir().unwrap();
        let (ctl, _) = controller(Layout::Sidebar, &dir, ScriptedClient::answering(&["a"])).await;
        assert!(ctl.snapshot().loaded);
        ctl.set_question("q");
        ctl.submit().await;

        FileStorage::new(dir.path()).clear_history().await.unwrap();
        ctl.load_history().await;
        assert_eq!(ctl.snapshot().history.len(), 1);
    }
}
