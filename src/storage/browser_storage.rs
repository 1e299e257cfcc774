use anyhow::{anyhow, Context};
use async_trait::async_trait;
use idb::{Database, DatabaseEvent, Factory, ObjectStoreParams, TransactionMode};
use js_sys::wasm_bindgen::JsValue;

use crate::history::History;
use super::{HistoryStore, HISTORY_SLOT};

const DB_NAME: &str = "app_storage";
const STORE_NAME: &str = "history";

/// History kept as a JSON string under a fixed key in IndexedDB. The database
/// is opened per operation.
#[derive(Debug, Default)]
pub struct IdbStorage;

impl IdbStorage {
    pub fn new() -> Self {
        Self
    }

    async fn open_db() -> anyhow::Result<Database> {
        let factory = Factory::new().map_err(|e| anyhow!("{e:?}"))?;

        let mut open_request = factory
            .open(DB_NAME, Some(1))
            .map_err(|e| anyhow!("{e:?}"))?;

        open_request.on_upgrade_needed(|event| {
            let Ok(database) = event.database() else {
                return;
            };
            // Out-of-line keys: the slot name is passed on every put/get.
            let _ = database.create_object_store(STORE_NAME, ObjectStoreParams::new());
        });

        open_request.await.map_err(|e| anyhow!("{e:?}"))
    }
}

#[async_trait(?Send)]
impl HistoryStore for IdbStorage {
    async fn load_history(&self) -> anyhow::Result<Option<History>> {
        let db = Self::open_db().await?;
        let transaction = db
            .transaction(&[STORE_NAME], TransactionMode::ReadOnly)
            .map_err(|e| anyhow!("{e:?}"))?;
        let store = transaction
            .object_store(STORE_NAME)
            .map_err(|e| anyhow!("{e:?}"))?;
        let stored: Option<JsValue> = store
            .get(JsValue::from_str(HISTORY_SLOT))
            .map_err(|e| anyhow!("{e:?}"))?
            .await
            .map_err(|e| anyhow!("{e:?}"))?;
        transaction.await.map_err(|e| anyhow!("{e:?}"))?;

        let Some(stored) = stored else {
            return Ok(None);
        };
        let json = stored
            .as_string()
            .ok_or_else(|| anyhow!("history slot does not hold a string"))?;
        let history = serde_json::from_str(&json).context("malformed history in IndexedDB")?;
        Ok(Some(history))
    }

    async fn save_history(&self, history: &History) -> anyhow::Result<()> {
        let json = serde_json::to_string(history)?;
        let db = Self::open_db().await?;
        let transaction = db
            .transaction(&[STORE_NAME], TransactionMode::ReadWrite)
            .map_err(|e| anyhow!("{e:?}"))?;
        let store = transaction
            .object_store(STORE_NAME)
            .map_err(|e| anyhow!("{e:?}"))?;
        store
            .put(&JsValue::from_str(&json), Some(&JsValue::from_str(HISTORY_SLOT)))
            .map_err(|e| anyhow!("{e:?}"))?
            .await
            .map_err(|e| anyhow!("{e:?}"))?;
        transaction
            .commit()
            .map_err(|e| anyhow!("{e:?}"))?
            .await
            .map_err(|e| anyhow!("{e:?}"))?;
        Ok(())
    }

    async fn clear_history(&self) -> anyhow::Result<()> {
        let db = Self::open_db().await?;
        let transaction = db
            .transaction(&[STORE_NAME], TransactionMode::ReadWrite)
            .map_err(|e| anyhow!("{e:?}"))?;
        let store = transaction
            .object_store(STORE_NAME)
            .map_err(|e| anyhow!("{e:?}"))?;
        store
            .delete(JsValue::from_str(HISTORY_SLOT))
            .map_err(|e| anyhow!("{e:?}"))?
            .await
            .map_err(|e| anyhow!("{e:?}"))?;
        transaction.await.map_err(|e| anyhow!("{e:?}"))?;
        Ok(())
    }
}
