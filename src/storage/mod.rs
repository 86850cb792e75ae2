//! Persistent key-value state.
//!
//! The watcher keeps a few small values across restarts:
//!
//! ```text
//! {storage_dir}/
//! └── state.json     # { "employeeId": "...", "cachedDate": "...", "lastChecked": "..." }
//! ```

pub mod local;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;

// Re-export for convenience
pub use local::LocalStore;
pub use memory::MemoryStore;

/// Key holding the employee identifier used as the request credential.
pub const EMPLOYEE_ID_KEY: &str = "employeeId";

/// Key holding the last schedule date seen by the date-label detector.
pub const SCHEDULE_DATE_KEY: &str = "cachedDate";

/// Key holding the RFC 3339 time of the last successful background check.
pub const LAST_CHECKED_KEY: &str = "lastChecked";

/// Trait for key-value storage backends.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key was never set.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
