//! Key-value option storage.
//!
//! One named record per option; the settings tree is persisted whole under a
//! single name. Writes are last-write-wins: configuration changes are
//! low-frequency and human-driven, so there is no versioning or optimistic
//! concurrency on the record.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use serde_json::Value;

use crate::error::StoreResult;

/// Named JSON option records.
///
/// An absent record is an empty override layer, not an error.
pub trait OptionStore: Send + Sync {
    /// Read an option by name. `Ok(None)` when the record does not exist.
    fn read(&self, name: &str) -> StoreResult<Option<Value>>;

    /// Write an option, creating or replacing the record.
    ///
    /// Returns whether the stored value actually changed; writing a value
    /// identical to the stored one is a successful no-op reported as
    /// `Ok(false)`.
    fn write(&self, name: &str, value: &Value) -> StoreResult<bool>;

    /// Delete an option. Returns whether a record existed.
    fn delete(&self, name: &str) -> StoreResult<bool>;
}

/// Current timestamp in milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
