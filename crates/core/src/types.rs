/// Session identifiers are random (v4) UUIDs, one per uploaded file.
pub type SessionId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
