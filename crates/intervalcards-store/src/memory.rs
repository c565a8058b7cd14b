//! In-memory store backend. Nothing survives the process.

use async_trait::async_trait;
use intervalcards_core::error::{IntervalCardsError, Result};
use intervalcards_core::traits::Store;
use intervalcards_core::types::{NewWord, UserId, UserRecord, UserStatus, WordEntry};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, UserRecord>,
    words: HashMap<UserId, Vec<WordEntry>>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|e| IntervalCardsError::Store(e.to_string()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn name(&self) -> &str { "memory" }

    async fn get_user(&self, id: UserId) -> Result<Option<UserRecord>> {
        Ok(self.lock()?.users.get(&id).cloned())
    }

    async fn upsert_user(&self, record: &UserRecord) -> Result<()> {
        self.lock()?.users.insert(record.id, record.clone());
        Ok(())
    }

    async fn list_users_by_status(&self, status: UserStatus) -> Result<Vec<UserRecord>> {
        let tables = self.lock()?;
        let mut users: Vec<UserRecord> = tables
            .users
            .values()
            .filter(|u| u.status == status)
            .cloned()
            .collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn add_word(&self, user_id: UserId, item: NewWord) -> Result<WordEntry> {
        let entry = WordEntry {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            word: item.word,
            translation: item.translation,
            example: item.example,
            comment: item.comment,
        };
        self.lock()?.words.entry(user_id).or_default().push(entry.clone());
        Ok(entry)
    }

    async fn remove_word(&self, user_id: UserId, word_id: &str) -> Result<bool> {
        let mut tables = self.lock()?;
        let Some(words) = tables.words.get_mut(&user_id) else {
            return Ok(false);
        };
        let before = words.len();
        words.retain(|w| w.id != word_id);
        Ok(words.len() < before)
    }

    async fn list_words(&self, user_id: UserId) -> Result<Vec<WordEntry>> {
        Ok(self.lock()?.words.get(&user_id).cloned().unwrap_or_default())
    }
}
