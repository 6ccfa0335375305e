use crate::domain::backend::CommandRegistry;
use crate::domain::models::{CommandEntry, CommandList};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Command list stored as a JSON array of `{title, command}` objects.
pub struct JsonFileRegistry {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl JsonFileRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // Callers hold `write_lock`. `create_new` keeps another process's file intact.
    async fn ensure_exists(&self) -> Result<()> {
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .with_context(|| format!("checking {}", self.path.display()))?;
        if exists {
            return Ok(());
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .await
        {
            Ok(mut file) => {
                file.write_all(b"[]").await?;
                file.flush()
                    .await
                    .with_context(|| format!("creating {}", self.path.display()))
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(e).with_context(|| format!("creating {}", self.path.display())),
        }
    }
}

#[async_trait]
impl CommandRegistry for JsonFileRegistry {
    async fn load(&self) -> Result<CommandList> {
        // Held across the read so a refresh never sees a half-written file
        let _guard = self.write_lock.lock().await;
        self.ensure_exists().await?;
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading {}", self.path.display()))?;
        let commands = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(commands)
    }

    async fn append(&self, entry: CommandEntry) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.ensure_exists().await?;

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading {}", self.path.display()))?;
        let mut document: Value = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", self.path.display()))?;

        match document.as_array_mut() {
            Some(array) => array.push(serde_json::to_value(&entry)?),
            None => {
                tracing::warn!(path = %self.path.display(), "registry is not a JSON array, entry not added");
            }
        }

        tokio::fs::write(&self.path, document.to_string())
            .await
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}
