//! Shared failure path for broken, stale, or rejected interactions.
//!
//! Flows funnel every "this reply can't be used" case through
//! [`reprompt`]: drop the slot, best-effort delete the stale prompt
//! UI, tell the customer to try again, and (for recoverable failures)
//! re-arm a fresh slot pointing at the message just sent.

use sf_domain::{CustomerId, MessageId, Messenger, Result};

use crate::manager::SlotManager;
use crate::opcode::FlowOpcode;

/// What to arm after the retry prompt goes out.
pub struct Rearm {
    pub opcode: FlowOpcode,
    pub payload: Option<String>,
}

/// Invalidate, clean up, prompt, optionally re-arm.
///
/// Safe to call when no slot exists and when the stale messages were
/// already deleted — message cleanup failures are logged and ignored,
/// never escalated. Returns the id of the retry prompt.
pub async fn reprompt(
    slots: &SlotManager,
    messenger: &dyn Messenger,
    customer: CustomerId,
    stale_messages: &[MessageId],
    prompt_text: &str,
    rearm: Option<Rearm>,
) -> Result<MessageId> {
    slots.invalidate(customer).await?;

    for &message in stale_messages {
        if let Err(e) = messenger.delete_message(customer, message).await {
            tracing::debug!(%customer, %message, error = %e, "stale prompt already gone");
        }
    }

    let prompt = messenger.send_message(customer, prompt_text).await?;

    if let Some(Rearm { opcode, payload }) = rearm {
        slots.arm(customer, opcode, prompt, payload).await?;
    }

    Ok(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use sf_domain::Error;
    use sf_sessions::MemorySessionStore;

    use crate::codec::{decode, Slot};

    const ALICE: CustomerId = CustomerId(1);

    /// Test double: records sends, optionally fails deletes.
    struct FakeMessenger {
        next_id: AtomicI64,
        sent: Mutex<Vec<(MessageId, String)>>,
        deleted: Mutex<Vec<MessageId>>,
        fail_deletes: bool,
    }

    impl FakeMessenger {
        fn new(fail_deletes: bool) -> Self {
            Self {
                next_id: AtomicI64::new(1000),
                sent: Mutex::new(Vec::new()),
                deleted: Mutex::new(Vec::new()),
                fail_deletes,
            }
        }
    }

    #[async_trait]
    impl Messenger for FakeMessenger {
        async fn send_message(&self, _customer: CustomerId, text: &str) -> Result<MessageId> {
            let id = MessageId(self.next_id.fetch_add(1, Ordering::SeqCst));
            self.sent.lock().push((id, text.to_owned()));
            Ok(id)
        }

        async fn edit_message(
            &self,
            _customer: CustomerId,
            _message: MessageId,
            _text: &str,
        ) -> Result<()> {
            Ok(())
        }

        async fn delete_message(&self, _customer: CustomerId, message: MessageId) -> Result<()> {
            if self.fail_deletes {
                return Err(Error::Transport("message to delete not found".into()));
            }
            self.deleted.lock().push(message);
            Ok(())
        }

        async fn answer_callback(&self, _callback_id: &str) -> Result<()> {
            Ok(())
        }
    }

    fn slots() -> SlotManager {
        SlotManager::new(Arc::new(MemorySessionStore::new()), Duration::from_secs(60))
    }

    #[tokio::test]
    async fn rearms_pointing_at_the_new_prompt() {
        let slots = slots();
        let messenger = FakeMessenger::new(false);
        slots
            .arm(ALICE, FlowOpcode::PhoneUpdate, MessageId(501), Some(String::new()))
            .await
            .unwrap();

        let prompt = reprompt(
            &slots,
            &messenger,
            ALICE,
            &[MessageId(501)],
            "try again",
            Some(Rearm {
                opcode: FlowOpcode::PhoneUpdate,
                payload: Some(String::new()),
            }),
        )
        .await
        .unwrap();

        let raw = slots.peek(ALICE).await.unwrap();
        match decode(raw.as_deref(), FlowOpcode::PhoneUpdate) {
            Slot::Pending(p) => {
                assert_eq!(p.origin_message, prompt);
                assert_ne!(p.origin_message, MessageId(501));
            }
            other => panic!("expected pending slot, got {other:?}"),
        }
        assert_eq!(messenger.deleted.lock().as_slice(), &[MessageId(501)]);
    }

    #[tokio::test]
    async fn without_rearm_the_slot_stays_gone() {
        let slots = slots();
        let messenger = FakeMessenger::new(false);
        slots
            .arm(ALICE, FlowOpcode::OrderComment, MessageId(9), Some("pickup".into()))
            .await
            .unwrap();

        reprompt(&slots, &messenger, ALICE, &[], "aborted", None)
            .await
            .unwrap();

        assert!(slots.peek(ALICE).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn tolerates_already_deleted_messages() {
        let slots = slots();
        let messenger = FakeMessenger::new(true);

        let prompt = reprompt(&slots, &messenger, ALICE, &[MessageId(42)], "try again", None)
            .await
            .unwrap();

        assert_eq!(messenger.sent.lock().len(), 1);
        assert_eq!(messenger.sent.lock()[0].0, prompt);
    }

    #[tokio::test]
    async fn idempotent_with_no_slot_present() {
        let slots = slots();
        let messenger = FakeMessenger::new(false);

        reprompt(&slots, &messenger, ALICE, &[], "try again", None)
            .await
            .unwrap();
        reprompt(&slots, &messenger, ALICE, &[], "try again", None)
            .await
            .unwrap();

        assert_eq!(messenger.sent.lock().len(), 2);
    }
}
