//! Slot lifecycle over the session store.
//!
//! One slot per customer, last-write-wins. There is no locking and no
//! optimistic-concurrency check: two near-simultaneous events may both
//! read the same slot, and whichever deletes second no-ops. Flows are
//! written so the loser surfaces an idempotent "nothing to resume"
//! reprompt, never corruption.

use std::sync::Arc;
use std::time::Duration;

use sf_domain::{CustomerId, MessageId, Result};
use sf_sessions::{pending_input_key, SessionStore};

use crate::codec::{decode, PendingInteraction, Slot};
use crate::opcode::FlowOpcode;

/// Owns the create/read/consume/invalidate lifecycle of the
/// free-input slot. Store errors propagate; nothing is swallowed here.
#[derive(Clone)]
pub struct SlotManager {
    store: Arc<dyn SessionStore>,
    ttl: Duration,
}

impl SlotManager {
    pub fn new(store: Arc<dyn SessionStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Encode and write a slot, unconditionally replacing any existing
    /// one for this customer.
    pub async fn arm(
        &self,
        customer: CustomerId,
        opcode: FlowOpcode,
        origin_message: MessageId,
        payload: Option<String>,
    ) -> Result<()> {
        let slot = PendingInteraction {
            opcode,
            origin_message,
            payload,
        };
        tracing::debug!(%customer, ?opcode, %origin_message, "arming slot");
        self.store
            .set(&pending_input_key(customer), &slot.encode(), self.ttl)
            .await
    }

    /// Read the raw slot without touching it.
    pub async fn peek(&self, customer: CustomerId) -> Result<Option<String>> {
        self.store.get(&pending_input_key(customer)).await
    }

    /// Read then unconditionally delete, returning what was read.
    /// Continuations use this so the slot never outlives the request
    /// that resolved it, regardless of how that request ends.
    pub async fn consume(&self, customer: CustomerId) -> Result<Option<String>> {
        let key = pending_input_key(customer);
        let raw = self.store.get(&key).await?;
        self.store.delete(&key).await?;
        if raw.is_some() {
            tracing::debug!(%customer, "slot consumed");
        }
        Ok(raw)
    }

    /// Consume and decode in one step against the flow's expected
    /// opcode.
    pub async fn consume_decoded(
        &self,
        customer: CustomerId,
        expected: FlowOpcode,
    ) -> Result<Slot> {
        let raw = self.consume(customer).await?;
        Ok(decode(raw.as_deref(), expected))
    }

    /// Delete unconditionally. Idempotent.
    pub async fn invalidate(&self, customer: CustomerId) -> Result<()> {
        self.store.delete(&pending_input_key(customer)).await
    }
}
