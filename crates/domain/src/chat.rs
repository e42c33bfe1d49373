//! Message-delivery collaborator contract.
//!
//! The core shows prompts and cleans up UI through this trait but
//! treats deliveries as fire-and-forget side effects: a failed delete
//! of an already-gone message is tolerated by callers, never escalated.

use async_trait::async_trait;

use crate::error::Result;
use crate::ids::{CustomerId, MessageId};

/// Outbound chat operations the flows need.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a new message to the customer, returning the platform's id
    /// for it (continuations use this id to clean the prompt up later).
    async fn send_message(&self, customer: CustomerId, text: &str) -> Result<MessageId>;

    /// Replace the text of an existing message.
    async fn edit_message(
        &self,
        customer: CustomerId,
        message: MessageId,
        text: &str,
    ) -> Result<()>;

    /// Delete a message. May fail if the message is already gone.
    async fn delete_message(&self, customer: CustomerId, message: MessageId) -> Result<()>;

    /// Acknowledge a button press so the client stops its spinner.
    async fn answer_callback(&self, callback_id: &str) -> Result<()>;
}
