//! Translation history records and the store contract.
//!
//! One record is appended per job at its terminal transition. Records are
//! immutable and looked up by session id.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::types::{SessionId, Timestamp};

/// Terminal outcome stored with each history record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultStatus {
    Success,
    Failed,
}

impl ResultStatus {
    /// Value persisted in the `result` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Failed => "Failed",
        }
    }

    /// Parse the persisted column value.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Success" => Some(Self::Success),
            "Failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// A stored history entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRecord {
    pub session_id: SessionId,
    /// File name as uploaded by the client.
    pub file_name: String,
    /// Storage key of the translated artifact; `None` for failed jobs.
    pub translated_file: Option<String>,
    pub language: String,
    pub result: ResultStatus,
    pub created_at: Timestamp,
}

/// Input for [`HistoryStore::append`].
#[derive(Debug, Clone)]
pub struct NewHistoryRecord {
    pub session_id: SessionId,
    pub file_name: String,
    pub translated_file: Option<String>,
    pub language: String,
    pub result: ResultStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("History store error: {0}")]
    Store(String),
}

/// Durable, append-only storage for history records.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append a record, returning it with its creation timestamp.
    async fn append(&self, record: NewHistoryRecord) -> Result<HistoryRecord, HistoryError>;

    /// All records for `session_id`, oldest first.
    async fn query_by_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<HistoryRecord>, HistoryError>;
}

/// Process-local history store, used when no database is configured.
///
/// Records are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    records: RwLock<Vec<HistoryRecord>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored records across all sessions.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn append(&self, record: NewHistoryRecord) -> Result<HistoryRecord, HistoryError> {
        let stored = HistoryRecord {
            session_id: record.session_id,
            file_name: record.file_name,
            translated_file: record.translated_file,
            language: record.language,
            result: record.result,
            created_at: chrono::Utc::now(),
        };
        self.records.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn query_by_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<HistoryRecord>, HistoryError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.session_id == session_id)
            .cloned()
            .collect())
    }
}
