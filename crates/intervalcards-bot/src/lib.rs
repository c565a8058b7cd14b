//! # IntervalCards Bot
//!
//! Conversation state machine: decodes inbound events, dispatches them by
//! command or persisted user status, and drives the scheduler and the
//! word-set generator.
//!
//! ```text
//! IncomingEvent → Action::decode
//!   ├── Command / Menu / prefixed token → fixed handler
//!   └── Text / Selection               → handler for user.status
//! → commit (persist, stop session when leaving start_learn)
//! → exactly one reply
//! ```

pub mod action;
pub mod categories;
pub mod conversation;
mod handlers;
pub mod i18n;
pub mod keyboards;
pub mod outcome;

pub use action::{Action, ActionKey, Command};
pub use categories::CATEGORIES;
pub use conversation::{Conversation, ConversationSettings};
pub use outcome::{HandlerOutcome, ResponseStatus};
