//! Collaborator traits: persistence, transport and text completion.

pub mod channel;
pub mod provider;
pub mod store;

pub use channel::{Channel, Outbound};
pub use provider::{CompletionParams, CompletionProvider};
pub use store::Store;
