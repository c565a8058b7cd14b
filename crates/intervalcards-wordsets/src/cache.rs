//! In-memory TTL cache of generated word sets.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use crate::GeneratedWord;

/// Canonical key: sorted categories, language pair and requested count.
pub fn cache_key(categories: &[String], learning_language: &str, native_language: &str, count: usize) -> String {
    let mut sorted: Vec<&str> = categories.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    format!("{}:{learning_language}:{native_language}:{count}", sorted.join(","))
}

struct CachedWordSet {
    words: Vec<GeneratedWord>,
    created_at: Instant,
}

pub struct WordSetCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CachedWordSet>>,
}

impl WordSetCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: Mutex::new(HashMap::new()) }
    }

    /// Fresh entry for `key`. Expired entries are evicted and reported as a miss.
    pub fn get(&self, key: &str) -> Option<Vec<GeneratedWord>> {
        let mut entries = self.entries.lock().ok()?;
        let expired = entries.get(key)?.created_at.elapsed() > self.ttl;
        if expired {
            entries.remove(key);
            tracing::debug!(key, "Word set cache entry expired");
            return None;
        }
        entries.get(key).map(|e| e.words.clone())
    }

    pub fn insert(&self, key: impl Into<String>, words: Vec<GeneratedWord>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.into(), CachedWordSet { words, created_at: Instant::now() });
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of stored entries, expired ones included until they are read.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
        tracing::info!("🧹 Word set cache cleared");
    }
}
