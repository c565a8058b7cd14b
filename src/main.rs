//! # IntervalCards CLI
//!
//! Vocabulary bot that sends learners a random word from their own
//! dictionary at a chosen interval.
//!
//! Usage:
//!   intervalcards run                                  # Start the Telegram bot
//!   intervalcards generate --categories Animals -n 5   # One-shot word set
//!   intervalcards onboard                              # First-time setup
//!   intervalcards config show                          # Show configuration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use intervalcards_bot::{Command, Conversation, ConversationSettings};
use intervalcards_channels::{BotCommand, TelegramChannel};
use intervalcards_core::IntervalCardsConfig;
use intervalcards_core::traits::{Channel, CompletionParams, CompletionProvider};
use intervalcards_scheduler::SchedulerRegistry;
use intervalcards_wordsets::{WordSetGenerator, WordSetRequest};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "intervalcards",
    version,
    about = "📚 IntervalCards — interval vocabulary bot",
    long_about = "Telegram bot that keeps a personal dictionary per user and sends\none random word at a chosen interval during the day."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot: resume learning sessions and listen for updates
    Run,

    /// Generate a word set once and print it
    Generate {
        /// Comma-separated categories
        #[arg(long, value_delimiter = ',', required = true)]
        categories: Vec<String>,

        /// Language being learned
        #[arg(short, long, default_value = "English")]
        learn: String,

        /// Language of the translations
        #[arg(long, default_value = "Ukrainian")]
        native: String,

        /// Number of words
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,

        /// Comma-separated words to exclude
        #[arg(short, long, value_delimiter = ',')]
        exclude: Vec<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// First-time setup
    Onboard,

    /// Show system info
    Info,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Reset to defaults
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // .env is optional
    dotenvy::dotenv().ok();

    let filter = if cli.verbose {
        "intervalcards=debug,intervalcards_core=debug,intervalcards_bot=debug,intervalcards_scheduler=debug,intervalcards_wordsets=debug,intervalcards_channels=debug,intervalcards_providers=debug,intervalcards_store=debug"
    } else {
        "intervalcards=info,intervalcards_bot=info,intervalcards_scheduler=info,intervalcards_wordsets=info,intervalcards_channels=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let config = if let Some(path) = &cli.config {
        let path = shellexpand::tilde(path).to_string();
        IntervalCardsConfig::load_from(std::path::Path::new(&path))?
    } else {
        IntervalCardsConfig::load()?
    };

    match cli.command {
        Commands::Run => run(config).await?,

        Commands::Generate { categories, learn, native, count, exclude } => {
            let provider = intervalcards_providers::create_provider(&config.llm)?;
            let generator = word_set_generator(&config, provider);
            let request = WordSetRequest {
                categories,
                learning_language: learn,
                native_language: native,
                count,
                excluded_words: exclude,
            };
            let result = generator.generate(&request).await?;
            for (i, word) in result.words.iter().enumerate() {
                println!("{:>3}. {} — {}", i + 1, word.word, word.translation);
            }
            if result.words.len() < count {
                println!("\n⚠️ Only {} of {count} words generated", result.words.len());
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let content = toml::to_string_pretty(&config)?;
                println!("{content}");
            }
            ConfigAction::Reset => {
                IntervalCardsConfig::default().save()?;
                println!("✅ Configuration reset to defaults.");
            }
        },

        Commands::Onboard => {
            println!("📚 IntervalCards — First-time Setup\n");
            let path = IntervalCardsConfig::default_path();
            if path.exists() {
                println!("✅ Config already exists: {}", path.display());
            } else {
                IntervalCardsConfig::default().save()?;
                println!("✅ Config saved to: {}", path.display());
            }
            std::fs::create_dir_all(IntervalCardsConfig::home_dir())?;

            println!("\n📋 Next steps:");
            println!("  1. Set TELEGRAM_BOT_TOKEN (environment or .env)");
            println!("  2. Set OPENROUTER_API_KEY, or use [llm] provider = \"ollama\"");
            println!("  3. Start the bot: intervalcards run");
        }

        Commands::Info => {
            println!("📚 IntervalCards v{}", env!("CARGO_PKG_VERSION"));
            println!("   Platform: {} / {}", std::env::consts::OS, std::env::consts::ARCH);
            println!("   Config: {}", IntervalCardsConfig::default_path().display());
            println!("   Store: {} ({})", config.store.backend, config.store.resolved_path().display());
            println!("   Provider: {} | Model: {}", config.llm.provider, config.llm.model);
            println!(
                "   Telegram: {}",
                if config.telegram.bot_token.is_empty() { "not configured" } else { "configured" }
            );
            let s = &config.scheduler;
            if s.fast_mode {
                println!("   Schedule: every {}s (fast mode)", s.fast_period_secs);
            } else {
                println!(
                    "   Schedule: {:02}:00–{:02}:00 UTC{:+}",
                    s.window_start_hour, s.window_end_hour, s.utc_offset_hours
                );
            }
        }
    }

    Ok(())
}

fn word_set_generator(config: &IntervalCardsConfig, provider: Arc<dyn CompletionProvider>) -> WordSetGenerator {
    let params = CompletionParams {
        model: config.llm.model.clone(),
        temperature: config.llm.temperature,
        max_tokens: config.llm.max_tokens,
    };
    WordSetGenerator::new(provider, &config.generator, params)
}

async fn run(config: IntervalCardsConfig) -> Result<()> {
    let store = intervalcards_store::create_store(&config.store)?;
    let provider = intervalcards_providers::create_provider(&config.llm)?;
    match provider.health_check().await {
        Ok(true) => tracing::info!("🤖 Completion provider ready: {}", provider.name()),
        Ok(false) => tracing::warn!("⚠️ Completion provider {} reports unhealthy", provider.name()),
        Err(e) => tracing::warn!("⚠️ Completion provider {} unreachable: {e}", provider.name()),
    }
    let generator = Arc::new(word_set_generator(&config, provider));

    let commands = Command::ALL
        .iter()
        .map(|c| BotCommand::new(c.name(), c.description()))
        .collect();
    let channel = Arc::new(TelegramChannel::new(config.telegram.clone()).with_commands(commands));
    channel.connect().await.context("Telegram connection failed")?;

    let scheduler = Arc::new(SchedulerRegistry::new(
        store.clone(),
        channel.clone(),
        config.scheduler.clone(),
    ));
    let resumed = scheduler.resume_all().await?;
    tracing::info!("🔁 Resumed {resumed} learning session(s)");

    let conversation = Arc::new(Conversation::new(
        store,
        channel.clone(),
        scheduler.clone(),
        generator,
        ConversationSettings::from(&config),
    ));

    let mut events = channel.listen().await?;
    println!("📚 IntervalCards is running. Press Ctrl+C to stop.");

    loop {
        tokio::select! {
            event = events.next() => {
                let Some(event) = event else {
                    tracing::warn!("Event stream closed");
                    break;
                };
                let conversation = conversation.clone();
                tokio::spawn(async move {
                    let outcome = conversation.handle(event).await;
                    tracing::debug!(status = ?outcome.status, next = %outcome.next_status, "Event handled");
                });
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("🛑 Shutting down");
                break;
            }
        }
    }

    scheduler.stop_all();
    println!("\n👋 IntervalCards stopped.");
    Ok(())
}
