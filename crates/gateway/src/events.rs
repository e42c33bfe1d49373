//! Normalized inbound events.

use sf_domain::{CustomerId, MessageId};

/// One inbound chat event, already normalized by the connector.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    /// The customer typed a message (a command or free text).
    Message {
        customer: CustomerId,
        message: MessageId,
        text: String,
    },
    /// The customer pressed an inline button.
    Callback {
        customer: CustomerId,
        message: MessageId,
        data: String,
        callback_id: String,
    },
}

impl InboundEvent {
    pub fn customer(&self) -> CustomerId {
        match self {
            Self::Message { customer, .. } | Self::Callback { customer, .. } => *customer,
        }
    }
}
