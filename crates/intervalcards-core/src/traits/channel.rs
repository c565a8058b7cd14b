//! Channel traits: outbound delivery and inbound event streams.

use async_trait::async_trait;
use futures::stream::Stream;

use crate::error::Result;
use crate::types::{Delivery, IncomingEvent, OutgoingMessage};

/// Anything that can deliver a message to a chat.
#[async_trait]
pub trait Outbound: Send + Sync {
    async fn send(&self, message: OutgoingMessage) -> Result<Delivery>;
}

/// A messaging transport: outbound delivery plus a stream of inbound events.
#[async_trait]
pub trait Channel: Outbound {
    fn name(&self) -> &str;

    /// Verify credentials and register transport-side metadata.
    async fn connect(&self) -> Result<()>;

    /// Start receiving events.
    async fn listen(&self) -> Result<Box<dyn Stream<Item = IncomingEvent> + Send + Unpin>>;
}
