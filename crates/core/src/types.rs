/// All database primary keys are SQLite INTEGER rowids.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (upload day, comment day) are UTC dates without a time.
pub type Date = chrono::NaiveDate;
