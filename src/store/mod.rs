//! Saved scenario states.
//!
//! - **kv** — key → JSON blob stores (in-memory and directory-backed)
//! - **snapshot** — the saved state layout and its load-time validation

pub mod kv;
pub mod snapshot;

use crate::store::kv::KeyValueStore;
use crate::store::snapshot::AppState;
use log::debug;
use thiserror::Error;

/// Prefix that marks saved states among the keys of a store.
pub const KEY_PREFIX: &str = "state::";

/// Label of the saved-state picker's header entry ("saved list"). Never a
/// valid state name.
pub const LIST_PLACEHOLDER: &str = "保存済み一覧";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed state blob: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid state name {0:?}")]
    InvalidName(String),
    #[error("no saved state named {0:?}")]
    NotFound(String),
    #[error("state field {field} must be a finite number, got {value}")]
    InvalidField { field: &'static str, value: f64 },
}

/// Named saved states on top of any [`KeyValueStore`].
///
/// # Examples
///
/// ```
/// use pnl_grid::store::kv::MemoryStore;
/// use pnl_grid::store::snapshot::AppState;
/// use pnl_grid::store::SnapshotStore;
///
/// let mut store = SnapshotStore::new(MemoryStore::new());
/// store.save("default", &AppState::default()).unwrap();
/// assert_eq!(store.names().unwrap(), vec!["default"]);
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotStore<S> {
    backend: S,
}

impl<S: KeyValueStore> SnapshotStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    fn key(name: &str) -> Result<String, StoreError> {
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed == LIST_PLACEHOLDER {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(format!("{}{}", KEY_PREFIX, trimmed))
    }

    /// Validate and store `state` under `name`, replacing any previous one.
    pub fn save(&mut self, name: &str, state: &AppState) -> Result<(), StoreError> {
        let key = Self::key(name)?;
        state.validate()?;
        let blob = serde_json::to_string(state)?;
        self.backend.put(&key, &blob)?;
        debug!("saved state {:?} ({} bytes)", name, blob.len());
        Ok(())
    }

    /// Load and validate the state saved under `name`.
    pub fn restore(&self, name: &str) -> Result<AppState, StoreError> {
        let key = Self::key(name)?;
        let blob = self
            .backend
            .get(&key)?
            .ok_or_else(|| StoreError::NotFound(name.trim().to_string()))?;
        let state = AppState::from_json(&blob)?;
        debug!(
            "restored state {:?}: {} lots, {} pins",
            name,
            state.purchases.len(),
            state.pins.len()
        );
        Ok(state)
    }

    /// Remove the state saved under `name`. Returns whether it existed.
    pub fn delete(&mut self, name: &str) -> Result<bool, StoreError> {
        let key = Self::key(name)?;
        let existed = self.backend.remove(&key)?;
        debug!("deleted state {:?} (existed: {})", name, existed);
        Ok(existed)
    }

    /// Names of all saved states, sorted.
    pub fn names(&self) -> Result<Vec<String>, StoreError> {
        let mut names: Vec<String> = self
            .backend
            .keys()?
            .into_iter()
            .filter_map(|k| k.strip_prefix(KEY_PREFIX).map(str::to_string))
            .filter(|name| name != LIST_PLACEHOLDER)
            .collect();
        names.sort();
        Ok(names)
    }
}
