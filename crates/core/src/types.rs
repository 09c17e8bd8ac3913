/// Board primary keys are server-generated UUID v7 values.
pub type BoardId = uuid::Uuid;

/// Owners are identified by the `sub` claim of the external identity provider.
pub type OwnerId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
