//! # IntervalCards Store
//! Persistence backends for user records and dictionaries.

pub mod memory;
pub mod sqlite;

use intervalcards_core::config::StoreConfig;
use intervalcards_core::error::{IntervalCardsError, Result};
use intervalcards_core::traits::Store;
use std::sync::Arc;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Create a store backend from configuration.
pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn Store>> {
    match config.backend.as_str() {
        "sqlite" => Ok(Arc::new(SqliteStore::open(&config.resolved_path())?)),
        "memory" => {
            tracing::warn!("⚠️ Using in-memory store — dictionaries are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        other => Err(IntervalCardsError::config(format!("Unknown store backend: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_store_backends() {
        let dir = tempfile::tempdir().unwrap();
        let sqlite = StoreConfig {
            backend: "sqlite".into(),
            path: dir.path().join("x.db").to_string_lossy().into_owned(),
        };
        assert_eq!(create_store(&sqlite).unwrap().name(), "sqlite");

        let memory = StoreConfig { backend: "memory".into(), path: String::new() };
        assert_eq!(create_store(&memory).unwrap().name(), "memory");

        let bogus = StoreConfig { backend: "dynamo".into(), path: String::new() };
        assert!(create_store(&bogus).is_err());
    }
}
