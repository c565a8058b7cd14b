//! SQLite store backend.

use async_trait::async_trait;
use intervalcards_core::error::{IntervalCardsError, Result};
use intervalcards_core::traits::Store;
use intervalcards_core::types::{Language, NewWord, UserId, UserRecord, UserStatus, WordEntry};
use rusqlite::{Connection, OptionalExtension, Row};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Mutex;

fn db_err(e: impl std::fmt::Display) -> IntervalCardsError {
    IntervalCardsError::Store(e.to_string())
}

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY,
        chat_id INTEGER NOT NULL,
        status TEXT NOT NULL DEFAULT 'default',
        interval_hours INTEGER NOT NULL DEFAULT 1,
        language TEXT NOT NULL DEFAULT 'en',
        learning_language TEXT NOT NULL DEFAULT 'en',
        favorite_categories TEXT NOT NULL DEFAULT '[]',
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS words (
        id TEXT PRIMARY KEY,
        user_id INTEGER NOT NULL,
        word TEXT NOT NULL,
        translation TEXT,
        example TEXT,
        comment TEXT,
        created_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_words_user ON words(user_id);
    CREATE INDEX IF NOT EXISTS idx_users_status ON users(status);
";

const USER_COLUMNS: &str =
    "id, chat_id, status, interval_hours, language, learning_language, favorite_categories";

/// A user row before its status has been checked.
struct UserRow {
    record: UserRecord,
    raw_status: String,
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path).map_err(db_err)?;
        conn.execute_batch(SCHEMA).map_err(db_err)?;
        tracing::debug!("🗄️ SQLite store opened: {}", path.display());
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Private in-memory database, mostly for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        conn.execute_batch(SCHEMA).map_err(db_err)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(db_err)
    }

    fn read_user(row: &Row<'_>) -> rusqlite::Result<UserRow> {
        let raw_status: String = row.get(2)?;
        let interval: i64 = row.get(3)?;
        let language: String = row.get(4)?;
        let learning: String = row.get(5)?;
        let categories: String = row.get(6)?;

        let favorite_categories: BTreeSet<String> =
            serde_json::from_str(&categories).unwrap_or_default();

        Ok(UserRow {
            record: UserRecord {
                id: row.get(0)?,
                chat_id: row.get(1)?,
                status: raw_status.parse().unwrap_or_default(),
                interval_hours: u8::try_from(interval).unwrap_or(intervalcards_core::types::DEFAULT_INTERVAL_HOURS),
                language: Language::from_code(&language)
                    .filter(Language::is_interface)
                    .unwrap_or(Language::En),
                learning_language: Language::from_code(&learning).unwrap_or(Language::En),
                favorite_categories,
            },
            raw_status,
        })
    }

    fn read_word(row: &Row<'_>) -> rusqlite::Result<WordEntry> {
        Ok(WordEntry {
            id: row.get(0)?,
            user_id: row.get(1)?,
            word: row.get(2)?,
            translation: row.get(3)?,
            example: row.get(4)?,
            comment: row.get(5)?,
        })
    }
}

#[async_trait]
impl Store for SqliteStore {
    fn name(&self) -> &str { "sqlite" }

    async fn get_user(&self, id: UserId) -> Result<Option<UserRecord>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                rusqlite::params![id],
                Self::read_user,
            )
            .optional()
            .map_err(db_err)?;

        let Some(row) = row else {
            return Ok(None);
        };

        if row.raw_status.parse::<UserStatus>().is_err() {
            tracing::warn!(user_id = id, status = %row.raw_status, "Unreadable user status, resetting to default");
            conn.execute(
                "UPDATE users SET status = ?1, updated_at = ?2 WHERE id = ?3",
                rusqlite::params![UserStatus::Default.as_str(), chrono::Utc::now().to_rfc3339(), id],
            )
            .map_err(db_err)?;
        }
        Ok(Some(row.record))
    }

    async fn upsert_user(&self, record: &UserRecord) -> Result<()> {
        let categories = serde_json::to_string(&record.favorite_categories)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO users
                (id, chat_id, status, interval_hours, language, learning_language, favorite_categories, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                record.id,
                record.chat_id,
                record.status.as_str(),
                record.interval_hours,
                record.language.code(),
                record.learning_language.code(),
                categories,
                chrono::Utc::now().to_rfc3339(),
            ],
        )
        .map_err(db_err)?;
        Ok(())
    }

    async fn list_users_by_status(&self, status: UserStatus) -> Result<Vec<UserRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE status = ?1 ORDER BY id"))
            .map_err(db_err)?;
        let rows = stmt
            .query_map(rusqlite::params![status.as_str()], Self::read_user)
            .map_err(db_err)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row.map_err(db_err)?.record);
        }
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
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO words (id, user_id, word, translation, example, comment, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                entry.id,
                entry.user_id,
                entry.word,
                entry.translation,
                entry.example,
                entry.comment,
                chrono::Utc::now().to_rfc3339(),
            ],
        )
        .map_err(db_err)?;
        Ok(entry)
    }

    async fn remove_word(&self, user_id: UserId, word_id: &str) -> Result<bool> {
        let conn = self.lock()?;
        let deleted = conn
            .execute(
                "DELETE FROM words WHERE id = ?1 AND user_id = ?2",
                rusqlite::params![word_id, user_id],
            )
            .map_err(db_err)?;
        Ok(deleted > 0)
    }

    async fn list_words(&self, user_id: UserId) -> Result<Vec<WordEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, word, translation, example, comment
                 FROM words WHERE user_id = ?1 ORDER BY rowid",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map(rusqlite::params![user_id], Self::read_word)
            .map_err(db_err)?;

        let mut words = Vec::new();
        for row in rows {
            words.push(row.map_err(db_err)?);
        }
        Ok(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("nested").join("cards.db")).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_user_roundtrip() {
        let (_dir, store) = temp_store();
        assert!(store.get_user(1).await.unwrap().is_none());

        let mut user = UserRecord::new(1, 100, Language::Uk);
        user.status = UserStatus::StartLearn;
        user.interval_hours = 3;
        user.learning_language = Language::De;
        user.toggle_category("Animals");
        store.upsert_user(&user).await.unwrap();

        let loaded = store.get_user(1).await.unwrap().unwrap();
        assert_eq!(loaded, user);
    }

    #[tokio::test]
    async fn test_list_users_by_status() {
        let (_dir, store) = temp_store();
        for (id, status) in [(1, UserStatus::StartLearn), (2, UserStatus::Default), (3, UserStatus::StartLearn)] {
            let mut user = UserRecord::new(id, id * 10, Language::En);
            user.status = status;
            store.upsert_user(&user).await.unwrap();
        }

        let learning = store.list_users_by_status(UserStatus::StartLearn).await.unwrap();
        let ids: Vec<_> = learning.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_words_add_list_remove() {
        let (_dir, store) = temp_store();
        let cat = store.add_word(1, NewWord::new("cat", Some("кіт".into()))).await.unwrap();
        store.add_word(1, NewWord::new("dog", None)).await.unwrap();
        store.add_word(2, NewWord::new("owl", None)).await.unwrap();

        let words = store.list_words(1).await.unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].word, "cat");
        assert_eq!(words[0].translation.as_deref(), Some("кіт"));
        assert_eq!(words[1].word, "dog");

        // Another user's id can't delete this user's word
        assert!(!store.remove_word(2, &cat.id).await.unwrap());
        assert!(store.remove_word(1, &cat.id).await.unwrap());
        assert!(!store.remove_word(1, &cat.id).await.unwrap());
        assert_eq!(store.list_words(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_status_is_repaired() {
        let (_dir, store) = temp_store();
        store.upsert_user(&UserRecord::new(5, 50, Language::En)).await.unwrap();
        {
            let conn = store.lock().unwrap();
            conn.execute("UPDATE users SET status = 'stop_learn' WHERE id = 5", []).unwrap();
        }

        let user = store.get_user(5).await.unwrap().unwrap();
        assert_eq!(user.status, UserStatus::Default);

        let conn = store.lock().unwrap();
        let raw: String = conn
            .query_row("SELECT status FROM users WHERE id = 5", [], |r| r.get(0))
            .unwrap();
        assert_eq!(raw, "default");
    }

    #[tokio::test]
    async fn test_data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            store.upsert_user(&UserRecord::new(9, 90, Language::En)).await.unwrap();
            store.add_word(9, NewWord::new("tree", None)).await.unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert!(store.get_user(9).await.unwrap().is_some());
        assert_eq!(store.list_words(9).await.unwrap().len(), 1);
    }
}
