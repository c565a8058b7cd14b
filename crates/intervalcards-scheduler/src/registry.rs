//! Registry of per-user delivery jobs.

use chrono::{DateTime, Utc};
use intervalcards_core::config::SchedulerConfig;
use intervalcards_core::error::{IntervalCardsError, Result};
use intervalcards_core::traits::{Outbound, Store};
use intervalcards_core::types::{ChatId, OutgoingMessage, UserId, UserStatus};
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

use crate::format::format_word;
use crate::policy::FiringPolicy;

/// Snapshot of a registered job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobInfo {
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub interval_hours: u8,
    pub policy: FiringPolicy,
    pub started_at: DateTime<Utc>,
}

struct ScheduledJob {
    info: JobInfo,
    handle: JoinHandle<()>,
}

impl Drop for ScheduledJob {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub struct SchedulerRegistry {
    store: Arc<dyn Store>,
    outbound: Arc<dyn Outbound>,
    config: SchedulerConfig,
    jobs: Mutex<HashMap<UserId, ScheduledJob>>,
}

impl SchedulerRegistry {
    pub fn new(store: Arc<dyn Store>, outbound: Arc<dyn Outbound>, config: SchedulerConfig) -> Self {
        Self {
            store,
            outbound,
            config,
            jobs: Mutex::new(HashMap::new()),
        }
    }

    /// Start delivering to `chat_id` every `interval_hours`, replacing any
    /// existing job for the user. Must be called inside a Tokio runtime.
    pub fn start_session(&self, user_id: UserId, chat_id: ChatId, interval_hours: u8) -> Result<()> {
        let policy = FiringPolicy::from_config(interval_hours, &self.config)?;

        let handle = tokio::spawn(run_job(
            self.store.clone(),
            self.outbound.clone(),
            user_id,
            chat_id,
            policy.clone(),
        ));
        let job = ScheduledJob {
            info: JobInfo {
                user_id,
                chat_id,
                interval_hours,
                policy,
                started_at: Utc::now(),
            },
            handle,
        };

        tracing::info!(user_id, "⏰ Learning session started: {}", job.info.policy);
        let previous = self
            .jobs
            .lock()
            .map_err(|e| IntervalCardsError::Other(format!("Scheduler registry poisoned: {e}")))?
            .insert(user_id, job);
        if previous.is_some() {
            tracing::debug!(user_id, "Replaced existing learning session");
        }
        Ok(())
    }

    /// Cancel the user's job. Returns whether one existed.
    pub fn stop_session(&self, user_id: UserId) -> bool {
        let removed = self.jobs.lock().ok().and_then(|mut jobs| jobs.remove(&user_id));
        match removed {
            Some(_) => {
                tracing::info!(user_id, "⏹️ Learning session stopped");
                true
            }
            None => false,
        }
    }

    /// Rebuild jobs for every persisted `start_learn` user with a non-empty dictionary.
    pub async fn resume_all(&self) -> Result<usize> {
        let users = self.store.list_users_by_status(UserStatus::StartLearn).await?;
        let mut resumed = 0;

        for user in &users {
            let words = match self.store.list_words(user.id).await {
                Ok(words) => words,
                Err(e) => {
                    tracing::warn!(user_id = user.id, "⚠️ Cannot resume session: {e}");
                    continue;
                }
            };
            if words.is_empty() {
                tracing::debug!(user_id = user.id, "Skipping resume, dictionary is empty");
                continue;
            }
            match self.start_session(user.id, user.chat_id, user.interval_hours) {
                Ok(()) => resumed += 1,
                Err(e) => tracing::warn!(user_id = user.id, "⚠️ Cannot resume session: {e}"),
            }
        }

        tracing::info!("🔁 Resumed {resumed}/{} learning session(s)", users.len());
        Ok(resumed)
    }

    pub fn has_job(&self, user_id: UserId) -> bool {
        self.jobs.lock().map(|jobs| jobs.contains_key(&user_id)).unwrap_or(false)
    }

    pub fn job_info(&self, user_id: UserId) -> Option<JobInfo> {
        self.jobs.lock().ok()?.get(&user_id).map(|job| job.info.clone())
    }

    pub fn job_count(&self) -> usize {
        self.jobs.lock().map(|jobs| jobs.len()).unwrap_or(0)
    }

    /// Cancel every job, e.g. on shutdown.
    pub fn stop_all(&self) {
        if let Ok(mut jobs) = self.jobs.lock() {
            let count = jobs.len();
            jobs.clear();
            tracing::info!("⏹️ Stopped {count} learning session(s)");
        }
    }
}

async fn run_job(
    store: Arc<dyn Store>,
    outbound: Arc<dyn Outbound>,
    user_id: UserId,
    chat_id: ChatId,
    policy: FiringPolicy,
) {
    loop {
        tokio::time::sleep(policy.delay_until_next(Utc::now())).await;
        if let Err(e) = deliver_tick(store.as_ref(), outbound.as_ref(), user_id, chat_id).await {
            tracing::warn!(user_id, "⚠️ Tick delivery failed: {e}");
        }
    }
}

/// Send one random entry of the user's current dictionary.
/// Returns `false` when the dictionary is empty and nothing was sent.
pub async fn deliver_tick(
    store: &dyn Store,
    outbound: &dyn Outbound,
    user_id: UserId,
    chat_id: ChatId,
) -> Result<bool> {
    let words = store.list_words(user_id).await?;
    if words.is_empty() {
        tracing::debug!(user_id, "Tick skipped, dictionary is empty");
        return Ok(false);
    }
    let index = rand::thread_rng().gen_range(0..words.len());
    let message = OutgoingMessage::markdown(chat_id, format_word(&words[index]));
    outbound.send(message).await?;
    Ok(true)
}
