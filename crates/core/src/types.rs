/// Journal entries are keyed by UUIDv7 so ids sort by creation time.
pub type EntryId = uuid::Uuid;

/// User identities are opaque UUIDs issued by the external identity provider.
pub type UserId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
