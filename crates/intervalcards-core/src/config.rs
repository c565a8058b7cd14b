//! Configuration: `~/.intervalcards/config.toml` plus environment overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{IntervalCardsError, Result};

/// Environment value that switches the scheduler into fast/diagnostic cadence.
pub const DEVELOPMENT_ENV: &str = "development";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct IntervalCardsConfig {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub api_base: String,
    /// Long-polling timeout for `getUpdates`.
    pub poll_timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            api_base: "https://api.telegram.org".into(),
            poll_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    /// `openrouter` or `ollama`.
    pub provider: String,
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openrouter".into(),
            api_url: "https://openrouter.ai/api/v1/chat/completions".into(),
            api_key: String::new(),
            model: "openai/gpt-4o-mini".into(),
            temperature: 0.7,
            max_tokens: 2000,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Fire every `fast_period_secs` seconds instead of the daytime hourly policy.
    pub fast_mode: bool,
    pub fast_period_secs: u64,
    /// First hour of the delivery window (inclusive).
    pub window_start_hour: u32,
    /// End of the delivery window (exclusive).
    pub window_end_hour: u32,
    /// Fixed offset of the delivery timezone from UTC.
    pub utc_offset_hours: i32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            fast_mode: false,
            fast_period_secs: 5,
            window_start_hour: 9,
            window_end_hour: 22,
            utc_offset_hours: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub cache_ttl_secs: u64,
    pub max_attempts: u32,
    pub words_per_set: usize,
    /// Candidates requested per attempt = ceil(still_needed * factor).
    pub over_request_factor: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 24 * 60 * 60,
            max_attempts: 3,
            words_per_set: 10,
            over_request_factor: 1.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// `sqlite` or `memory`.
    pub backend: String,
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".into(),
            path: "~/.intervalcards/intervalcards.db".into(),
        }
    }
}

impl StoreConfig {
    /// Database path with `~` expanded.
    pub fn resolved_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.path).to_string())
    }
}

impl IntervalCardsConfig {
    /// `~/.intervalcards`
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".intervalcards")
    }

    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Load the default config file (if present) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        let mut config = if path.exists() {
            Self::read_file(&path)?
        } else {
            Self::default()
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load an explicit config file and apply environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::read_file(path)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| IntervalCardsError::config(format!("{}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| IntervalCardsError::config(format!("Invalid config {}: {e}", path.display())))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| IntervalCardsError::config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup (environment, tests).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty("TELEGRAM_BOT_TOKEN") {
            self.telegram.bot_token = token;
        }
        if let Some(key) = non_empty("OPENROUTER_API_KEY") {
            self.llm.api_key = key;
        }
        if let Some(model) = non_empty("OPENROUTER_MODEL") {
            self.llm.model = model;
        }
        if let Some(path) = non_empty("INTERVALCARDS_DB_PATH") {
            self.store.path = path;
        }
        if let Some(env) = non_empty("INTERVALCARDS_ENV") {
            self.scheduler.fast_mode = env.eq_ignore_ascii_case(DEVELOPMENT_ENV);
        }
    }

    pub fn validate(&self) -> Result<()> {
        let s = &self.scheduler;
        if s.window_start_hour >= s.window_end_hour || s.window_end_hour > 24 {
            return Err(IntervalCardsError::config(format!(
                "Invalid delivery window {}..{}",
                s.window_start_hour, s.window_end_hour
            )));
        }
        if !(-12..=14).contains(&s.utc_offset_hours) {
            return Err(IntervalCardsError::config(format!(
                "Invalid UTC offset: {}",
                s.utc_offset_hours
            )));
        }
        if s.fast_period_secs == 0 {
            return Err(IntervalCardsError::config("fast_period_secs must be > 0"));
        }
        let g = &self.generator;
        if g.max_attempts == 0 {
            return Err(IntervalCardsError::config("max_attempts must be > 0"));
        }
        if g.words_per_set == 0 {
            return Err(IntervalCardsError::config("words_per_set must be > 0"));
        }
        if g.over_request_factor < 1.0 {
            return Err(IntervalCardsError::config("over_request_factor must be >= 1.0"));
        }
        if self.llm.timeout_secs == 0 {
            return Err(IntervalCardsError::config("llm.timeout_secs must be > 0"));
        }
        Ok(())
    }
}
