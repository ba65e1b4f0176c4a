use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use studyverse_domain::session::TokenStore;
use studyverse_domain::shared::DomainError;

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Token store backed by a small JSON file in the data directory
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn io_error(action: &str, path: &Path, e: std::io::Error) -> DomainError {
    DomainError::Infrastructure(format!("Failed to {} {}: {}", action, path.display(), e))
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<String>, DomainError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error("read", &self.path, e)),
        };

        // A corrupt file is treated as no session
        match serde_json::from_str::<StoredSession>(&content) {
            Ok(stored) if !stored.token.is_empty() => Ok(Some(stored.token)),
            Ok(_) => Ok(None),
            Err(e) => {
                warn!(
                    "[session] ignoring unreadable token file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    async fn save(&self, token: &str) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error("create", parent, e))?;
        }

        let stored = StoredSession {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        let content = serde_json::to_string_pretty(&stored)
            .map_err(|e| DomainError::Serialization(e.to_string()))?;

        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| io_error("write", &self.path, e))?;

        debug!("[session] token saved to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("[session] token file removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error("remove", &self.path, e)),
        }
    }
}
