use async_trait::async_trait;

use crate::history::History;

#[cfg(target_arch = "wasm32")]
mod browser_storage;
#[cfg(not(target_arch = "wasm32"))]
mod file_storage;

#[cfg(target_arch = "wasm32")]
pub use browser_storage::IdbStorage;
#[cfg(not(target_arch = "wasm32"))]
pub use file_storage::FileStorage;

#[cfg(not(target_arch = "wasm32"))]
pub type AppStorage = file_storage::FileStorage;
#[cfg(target_arch = "wasm32")]
pub type AppStorage = browser_storage::IdbStorage;

/// Name of the single slot the history lives in.
pub const HISTORY_SLOT: &str = "chatHistory";

/// Persisted copy of the conversation history. Every save overwrites the
/// whole slot.
#[async_trait(?Send)]
pub trait HistoryStore {
    /// `Ok(None)` when nothing has been saved yet; `Err` when the slot holds
    /// something that is not a history.
    async fn load_history(&self) -> anyhow::Result<Option<History>>;
    async fn save_history(&self, history: &History) -> anyhow::Result<()>;
    async fn clear_history(&self) -> anyhow::Result<()>;
}

#[cfg(not(target_arch = "wasm32"))]
pub fn get_storage() -> AppStorage {
    use std::path::PathBuf;
    use directories_next::ProjectDirs;

    let base = if let Some(proj_dirs) = ProjectDirs::from("com", "N K", "ask-assistant") {
        proj_dirs.config_dir().to_path_buf()
    } else {
        PathBuf::from(".")
    };
    AppStorage::new(base)
}

#[cfg(target_arch = "wasm32")]
pub fn get_storage() -> AppStorage {
    AppStorage::new()
}
