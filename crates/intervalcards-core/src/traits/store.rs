//! Store trait: CRUD contract over user records and dictionary entries.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{NewWord, UserId, UserRecord, UserStatus, WordEntry};

/// Persistence backend. Every call is a suspension point and may fail with an upstream error.
#[async_trait]
pub trait Store: Send + Sync {
    /// Backend name.
    fn name(&self) -> &str;

    /// Fetch a user record. Backends repair rows whose status they cannot read by
    /// resetting them to `UserStatus::Default`.
    async fn get_user(&self, id: UserId) -> Result<Option<UserRecord>>;

    /// Insert or replace a user record.
    async fn upsert_user(&self, record: &UserRecord) -> Result<()>;

    /// All users currently in `status`.
    async fn list_users_by_status(&self, status: UserStatus) -> Result<Vec<UserRecord>>;

    /// Store a new entry for `user_id` and return it with its generated id.
    async fn add_word(&self, user_id: UserId, item: NewWord) -> Result<WordEntry>;

    /// Delete an entry. Returns `false` if no such entry belongs to the user.
    async fn remove_word(&self, user_id: UserId, word_id: &str) -> Result<bool>;

    /// The user's whole dictionary, in insertion order.
    async fn list_words(&self, user_id: UserId) -> Result<Vec<WordEntry>>;
}
