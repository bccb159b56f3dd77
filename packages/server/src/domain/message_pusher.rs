//! Outbound delivery abstraction.
//!
//! The transport implements this trait; the use-case layer only names targets.

use async_trait::async_trait;

use super::{error::PushError, event::OutboundEvent, value_object::ConnectionId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Deliver an event to a single connection
    async fn push_to(&self, target: &ConnectionId, event: OutboundEvent) -> Result<(), PushError>;

    /// Deliver an event to every target without waiting for acknowledgment.
    ///
    /// A failed send to one target never prevents delivery to the others.
    ///
    /// # Returns
    ///
    /// The number of targets the event was handed to
    async fn broadcast(&self, targets: &[ConnectionId], event: OutboundEvent) -> usize;
}
