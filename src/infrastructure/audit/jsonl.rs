use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::{AuditRecord, AuditSink, DomainError};

/// Appends one JSON document per line to a local file
#[derive(Debug)]
pub struct JsonlAuditSink {
    path: PathBuf,
    // Serializes appends so concurrent records never interleave
    write_lock: Mutex<()>,
}

impl JsonlAuditSink {
    /// Create the sink, creating missing parent directories
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::configuration(format!(
                    "Failed to create audit directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuditSink for JsonlAuditSink {
    async fn record(&self, record: AuditRecord) -> Result<(), DomainError> {
        let mut line = serde_json::to_string(&record)
            .map_err(|e| DomainError::internal(format!("Failed to serialize audit record: {}", e)))?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| DomainError::internal(format!("Failed to open audit log: {}", e)))?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| DomainError::internal(format!("Failed to write audit log: {}", e)))?;
        file.flush()
            .await
            .map_err(|e| DomainError::internal(format!("Failed to flush audit log: {}", e)))?;

        debug!(request_id = %record.request_id, path = %self.path.display(), "Audit record appended");

        Ok(())
    }
}
