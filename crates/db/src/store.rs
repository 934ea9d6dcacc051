use async_trait::async_trait;
use polyglot_core::history::{HistoryError, HistoryRecord, HistoryStore, NewHistoryRecord};
use polyglot_core::types::SessionId;

use crate::repositories::FileHistoryRepo;
use crate::DbPool;

/// [`HistoryStore`] backed by the `file_history` table.
#[derive(Debug, Clone)]
pub struct PgHistoryStore {
    pool: DbPool,
}

impl PgHistoryStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn store_error(err: sqlx::Error) -> HistoryError {
    tracing::error!(error = %err, "file_history query failed");
    HistoryError::Store(err.to_string())
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    async fn append(&self, record: NewHistoryRecord) -> Result<HistoryRecord, HistoryError> {
        let row = FileHistoryRepo::create(&self.pool, &record)
            .await
            .map_err(store_error)?;
        HistoryRecord::try_from(row)
    }

    async fn query_by_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<HistoryRecord>, HistoryError> {
        FileHistoryRepo::list_by_session(&self.pool, session_id)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(HistoryRecord::try_from)
            .collect()
    }
}
