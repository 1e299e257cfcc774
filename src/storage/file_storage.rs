use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::fs;

use crate::history::History;

use super::HISTORY_SLOT;

pub struct FileStorage {
    base: PathBuf,
}

impl FileStorage {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn history_path(&self) -> PathBuf {
        self.base.join(format!("{HISTORY_SLOT}.json"))
    }
}

#[async_trait::async_trait(?Send)]
impl super::HistoryStore for FileStorage {
    async fn load_history(&self) -> Result<Option<History>> {
        let path = self.history_path();
        match fs::read_to_string(&path).await {
            Ok(data) => {
                let history = serde_json::from_str(&data)
                    .with_context(|| format!("malformed history in {}", path.display()))?;
                Ok(Some(history))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    async fn save_history(&self, history: &History) -> Result<()> {
        let json = serde_json::to_string(history)?;
        fs::create_dir_all(&self.base).await?;
        fs::write(self.history_path(), json).await?;
        Ok(())
    }

    async fn clear_history(&self) -> Result<()> {
        match fs::remove_file(self.history_path()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
