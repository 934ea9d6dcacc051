//! File history entity model.

use polyglot_core::history::{HistoryError, HistoryRecord, ResultStatus};
use polyglot_core::types::{SessionId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `file_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FileHistoryRow {
    pub id: i64,
    pub session_id: SessionId,
    pub file_name: String,
    pub translated_file: Option<String>,
    pub language: String,
    pub result: String,
    pub created_at: Timestamp,
}

impl TryFrom<FileHistoryRow> for HistoryRecord {
    type Error = HistoryError;

    fn try_from(row: FileHistoryRow) -> Result<Self, Self::Error> {
        let result = ResultStatus::from_name(&row.result).ok_or_else(|| {
            HistoryError::Store(format!(
                "file_history row {} has unknown result '{}'",
                row.id, row.result
            ))
        })?;
        Ok(HistoryRecord {
            session_id: row.session_id,
            file_name: row.file_name,
            translated_file: row.translated_file,
            language: row.language,
            result,
            created_at: row.created_at,
        })
    }
}
