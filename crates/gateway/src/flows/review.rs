//! Store review authoring flow.
//!
//! Two-step continuation: the `Review` slot starts with no payload
//! ("store not chosen yet"); the store-picker callback re-arms it with
//! the store id on the *same* origin message, and only then does free
//! text resolve it. The review body is HTML-escaped and truncated
//! before persistence.

use uuid::Uuid;

use sf_domain::text::{escape_html, truncate_chars};
use sf_domain::{CustomerId, Error, Messenger, Result};
use sf_interaction::{reprompt, FlowOpcode, Rearm, Slot};

use crate::flows::fault_error;
use crate::state::AppState;

const CHOOSE_STORE: &str = "Which store would you like to review? Pick one below.";
const WRITE_REVIEW: &str = "Now type your review.";
const PICK_FIRST_RETRY: &str = "Please pick a store first, then write your review.";
const LOST_STORE_RETRY: &str = "We lost track of which store you meant. Please pick it again.";
const EMPTY_RETRY: &str = "Your review is empty. Please type a few words.";
const SAVE_RETRY: &str = "We couldn't save your review. Please try again.";
const THANKS: &str = "Thanks for your review!";

/// Persisted review cap, in characters after escaping.
const MAX_REVIEW_CHARS: usize = 256;

pub async fn start(
    state: &AppState,
    messenger: &dyn Messenger,
    customer: CustomerId,
) -> Result<()> {
    let prompt = messenger.send_message(customer, CHOOSE_STORE).await?;
    state
        .slots
        .arm(customer, FlowOpcode::Review, prompt, None)
        .await
}

/// Continuation for the store-picker button: supplies the payload the
/// free-text continuation needs, keeping the original prompt message.
pub async fn choose_store(
    state: &AppState,
    messenger: &dyn Messenger,
    customer: CustomerId,
    store_token: &str,
) -> Result<()> {
    let pending = match state
        .slots
        .consume_decoded(customer, FlowOpcode::Review)
        .await?
    {
        Slot::Vacant => return Err(Error::NothingToResume),
        Slot::Malformed(fault) => return Err(fault_error(fault)),
        Slot::Pending(pending) => pending,
    };

    state
        .slots
        .arm(
            customer,
            FlowOpcode::Review,
            pending.origin_message,
            Some(store_token.to_owned()),
        )
        .await?;
    messenger
        .edit_message(customer, pending.origin_message, WRITE_REVIEW)
        .await?;
    Ok(())
}

pub async fn resume(
    state: &AppState,
    messenger: &dyn Messenger,
    customer: CustomerId,
    text: &str,
) -> Result<()> {
    let pending = match state
        .slots
        .consume_decoded(customer, FlowOpcode::Review)
        .await?
    {
        Slot::Vacant => return Err(Error::NothingToResume),
        Slot::Malformed(fault) => return Err(fault_error(fault)),
        Slot::Pending(pending) => pending,
    };

    // Free text before a store was chosen: start the choice over.
    let Some(store_token) = pending.payload.clone() else {
        reprompt(
            &state.slots,
            messenger,
            customer,
            &[pending.origin_message],
            PICK_FIRST_RETRY,
            Some(Rearm {
                opcode: FlowOpcode::Review,
                payload: None,
            }),
        )
        .await?;
        return Ok(());
    };

    let Ok(store) = Uuid::parse_str(store_token.trim()) else {
        reprompt(
            &state.slots,
            messenger,
            customer,
            &[pending.origin_message],
            LOST_STORE_RETRY,
            Some(Rearm {
                opcode: FlowOpcode::Review,
                payload: None,
            }),
        )
        .await?;
        return Ok(());
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        reprompt(
            &state.slots,
            messenger,
            customer,
            &[pending.origin_message],
            EMPTY_RETRY,
            Some(Rearm {
                opcode: FlowOpcode::Review,
                payload: Some(store_token),
            }),
        )
        .await?;
        return Ok(());
    }

    let escaped = escape_html(trimmed);
    let body = truncate_chars(&escaped, MAX_REVIEW_CHARS);

    if let Err(e) = state.reviews.add_review(store, customer, body).await {
        tracing::warn!(%customer, %store, error = %e, "review save failed, reprompting");
        reprompt(
            &state.slots,
            messenger,
            customer,
            &[pending.origin_message],
            SAVE_RETRY,
            Some(Rearm {
                opcode: FlowOpcode::Review,
                payload: Some(store_token),
            }),
        )
        .await?;
        return Ok(());
    }

    if let Err(e) = messenger.delete_message(customer, pending.origin_message).await {
        tracing::debug!(%customer, error = %e, "review prompt already gone");
    }
    messenger.send_message(customer, THANKS).await?;
    Ok(())
}
