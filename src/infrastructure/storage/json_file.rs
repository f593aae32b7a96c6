//! JSON file snapshot store
//!
//! The collection lives in a single JSON array on disk. Writes go to a temporary
//! file in the same directory which is then renamed over the target, so a crash
//! mid-write leaves the old file intact.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::core::error::{Error, Result};
use crate::core::repository::SnapshotStore;
use crate::core::template::Template;

/// Snapshot store backed by one JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<Vec<Template>>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No template snapshot yet");
                return Ok(None);
            }
            Err(e) => return Err(Error::Io(e)),
        };

        if raw.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, templates: &[Template]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut file = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer(&mut file, templates)?;
        file.flush()?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        debug!(path = %self.path.display(), count = templates.len(), "Saved template snapshot");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
