//! Repository for the `file_history` table.

use polyglot_core::history::NewHistoryRecord;
use polyglot_core::types::SessionId;
use sqlx::PgPool;

use crate::models::file_history::FileHistoryRow;

/// Column list for `file_history` queries.
const COLUMNS: &str = "\
    id, session_id, file_name, translated_file, language, result, created_at";

/// Append and lookup operations for history rows. Rows are never updated.
pub struct FileHistoryRepo;

impl FileHistoryRepo {
    /// Insert a history row, returning the full row.
    pub async fn create(
        pool: &PgPool,
        input: &NewHistoryRecord,
    ) -> Result<FileHistoryRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO file_history \
                (session_id, file_name, translated_file, language, result) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FileHistoryRow>(&query)
            .bind(input.session_id)
            .bind(&input.file_name)
            .bind(&input.translated_file)
            .bind(&input.language)
            .bind(input.result.as_str())
            .fetch_one(pool)
            .await
    }

    /// List all rows for a session, oldest first.
    pub async fn list_by_session(
        pool: &PgPool,
        session_id: SessionId,
    ) -> Result<Vec<FileHistoryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM file_history \
             WHERE session_id = $1 \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, FileHistoryRow>(&query)
            .bind(session_id)
            .fetch_all(pool)
            .await
    }
}
