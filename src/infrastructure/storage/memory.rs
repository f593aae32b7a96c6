//! In-memory snapshot store
//!
//! Keeps the serialized snapshot in a shared buffer. Clones share the buffer, so a
//! test can hand one clone to a [`TemplateStore`](crate::core::store::TemplateStore)
//! and inspect what was persisted through another.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::core::error::{Error, Result};
use crate::core::repository::SnapshotStore;
use crate::core::template::Template;

#[derive(Debug, Default)]
struct Inner {
    snapshot: Option<String>,
    fail_writes: bool,
    saves: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing serialized snapshot.
    pub fn with_snapshot<S: Into<String>>(snapshot: S) -> Self {
        let store = Self::new();
        store.lock().snapshot = Some(snapshot.into());
        store
    }

    /// Make subsequent saves fail with an I/O error.
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// The serialized snapshot as last saved.
    pub fn raw_snapshot(&self) -> Option<String> {
        self.lock().snapshot.clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned buffer still holds the last complete snapshot.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<Vec<Template>>> {
        match &self.lock().snapshot {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, templates: &[Template]) -> Result<()> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(Error::Io(std::io::Error::other("memory store is read-only")));
        }
        inner.snapshot = Some(serde_json::to_string(templates)?);
        inner.saves += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
