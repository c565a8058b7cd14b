//! # IntervalCards Word Sets
//!
//! Produces sets of distinct (word, translation) pairs for a list of categories,
//! preferring a TTL cache and falling back to a completion provider.
//!
//! ```text
//! WordSetGenerator::generate(request)
//!   ├── no exclusions + fresh cache entry → cached words
//!   └── up to max_attempts completion calls
//!         ├── prompt asks for ceil(still_needed × factor) candidates
//!         ├── response parsed into typed candidates
//!         └── candidates already excluded are dropped
//! ```

pub mod cache;
pub mod engine;
pub mod parse;
pub mod prompt;

pub use cache::{WordSetCache, cache_key};
pub use engine::{WordSetGenerator, WordSetRequest, WordSetResult};

use serde::{Deserialize, Serialize};

/// One generated vocabulary pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedWord {
    pub word: String,
    pub translation: String,
}

impl GeneratedWord {
    pub fn new(word: impl Into<String>, translation: impl Into<String>) -> Self {
        Self { word: word.into(), translation: translation.into() }
    }

    /// Lower-cased headword used for de-duplication.
    pub fn key(&self) -> String {
        normalize(&self.word)
    }
}

/// Normalized form used by exclusion checks.
pub fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}
