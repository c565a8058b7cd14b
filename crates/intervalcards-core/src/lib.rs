//! # IntervalCards Core
//! Shared error taxonomy, data model, collaborator traits and configuration.

pub mod config;
pub mod error;
pub mod text;
pub mod traits;
pub mod types;

pub use config::IntervalCardsConfig;
pub use error::{ErrorKind, IntervalCardsError, Result};
