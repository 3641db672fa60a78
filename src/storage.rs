//! Local TOML store
//!
//! Holds the offline copy of the quest log. It is the only persistence when no
//! backend is configured, and the fallback once the backend has failed.

use crate::quest::QuestData;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct Storage {
    file_path: PathBuf,
}

impl Storage {
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Load the quest log; a missing or empty file is an empty log.
    pub fn load(&self) -> Result<QuestData> {
        if !self.file_path.exists() {
            return Ok(QuestData::new());
        }

        let content = fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read {}", self.file_path.display()))?;
        let data: QuestData = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.file_path.display()))?;
        debug!(
            path = %self.file_path.display(),
            tasks = data.tasks.len(),
            subjects = data.subjects.len(),
            "loaded quest log"
        );
        Ok(data)
    }

    pub fn save(&self, data: &QuestData) -> Result<()> {
        if let Some(parent) = self.file_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(data)?;
        fs::write(&self.file_path, content)
            .with_context(|| format!("Failed to write {}", self.file_path.display()))?;
        debug!(path = %self.file_path.display(), "saved quest log");
        Ok(())
    }
}
