//! Local filesystem storage implementation.
//!
//! All keys live in one flat JSON object at `{root}/state.json`. Writes go
//! to a temp file first and are renamed into place.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::storage::KeyValueStore;

const STATE_FILE: &str = "state.json";

type State = BTreeMap<String, String>;

/// Local filesystem storage backend.
#[derive(Debug)]
pub struct LocalStore {
    root_dir: PathBuf,
    // Serialises read-modify-write cycles on the state file.
    write_lock: Mutex<()>,
}

impl LocalStore {
    /// Create a new LocalStore rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the state file.
    pub fn state_path(&self) -> PathBuf {
        self.root_dir.join(STATE_FILE)
    }

    /// Read the state file, empty if it does not exist yet.
    async fn read_state(&self) -> Result<State> {
        match tokio::fs::read(self.state_path()).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AppError::storage(format!("{} is corrupt: {}", self.state_path().display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(State::new()),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Write the state file atomically (write to temp, then rename).
    async fn write_state(&self, state: &State) -> Result<()> {
        tokio::fs::create_dir_all(&self.root_dir).await?;

        let path = self.state_path();
        let tmp = path.with_extension("tmp");
        let bytes = serde_json::to_vec_pretty(state)?;

        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for LocalStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_state().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut state = self.read_state().await?;
        state.insert(key.to_string(), value.to_string());
        self.write_state(&state).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut state = self.read_state().await?;
        if state.remove(key).is_some() {
            self.write_state(&state).await?;
        }
        Ok(())
    }
}
