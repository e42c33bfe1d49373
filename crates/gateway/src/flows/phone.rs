//! Phone-number update flow.
//!
//! Initiator arms a `PhoneUpdate` slot with an empty payload and asks
//! for the number. The continuation normalizes the reply (separators
//! stripped, `+` prefixed) and pattern-checks it; rejects re-arm a
//! fresh slot pointing at the retry prompt.

use std::sync::LazyLock;

use regex::Regex;

use sf_domain::{CustomerId, Error, MessageId, Messenger, Result};
use sf_interaction::{reprompt, FlowOpcode, Rearm, Slot};

use crate::flows::fault_error;
use crate::state::AppState;

const PROMPT: &str = "Please type your new phone number.";
const RETRY: &str = "That doesn't look like a phone number. Please try again, e.g. +12345678901.";
const SAVED: &str = "Phone number updated.";

/// Hard cap on the normalized number, wire-format limit of the
/// customer directory.
const MAX_PHONE_CHARS: usize = 32;

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[0-9]{7,31}$").expect("phone pattern"));

pub async fn start(
    state: &AppState,
    messenger: &dyn Messenger,
    customer: CustomerId,
) -> Result<()> {
    let prompt = messenger.send_message(customer, PROMPT).await?;
    state
        .slots
        .arm(customer, FlowOpcode::PhoneUpdate, prompt, Some(String::new()))
        .await
}

pub async fn resume(
    state: &AppState,
    messenger: &dyn Messenger,
    customer: CustomerId,
    text: &str,
) -> Result<()> {
    let pending = match state
        .slots
        .consume_decoded(customer, FlowOpcode::PhoneUpdate)
        .await?
    {
        Slot::Vacant => return Err(Error::NothingToResume),
        Slot::Malformed(fault) => return Err(fault_error(fault)),
        Slot::Pending(pending) => pending,
    };

    let Some(phone) = normalize(text) else {
        rearm_retry(state, messenger, customer, pending.origin_message).await?;
        return Ok(());
    };

    if let Err(e) = state.customers.save_phone(customer, &phone).await {
        tracing::warn!(%customer, error = %e, "phone save failed, reprompting");
        rearm_retry(state, messenger, customer, pending.origin_message).await?;
        return Ok(());
    }

    if let Err(e) = messenger.delete_message(customer, pending.origin_message).await {
        tracing::debug!(%customer, error = %e, "phone prompt already gone");
    }
    messenger.send_message(customer, SAVED).await?;
    Ok(())
}

async fn rearm_retry(
    state: &AppState,
    messenger: &dyn Messenger,
    customer: CustomerId,
    stale_prompt: MessageId,
) -> Result<()> {
    reprompt(
        &state.slots,
        messenger,
        customer,
        &[stale_prompt],
        RETRY,
        Some(Rearm {
            opcode: FlowOpcode::PhoneUpdate,
            payload: Some(String::new()),
        }),
    )
    .await?;
    Ok(())
}

/// Strip separators, ensure a leading `+`, and pattern-check.
fn normalize(input: &str) -> Option<String> {
    let stripped: String = input
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    let candidate = if stripped.starts_with('+') {
        stripped
    } else {
        format!("+{stripped}")
    };

    (candidate.chars().count() <= MAX_PHONE_CHARS && PHONE_PATTERN.is_match(&candidate))
        .then_some(candidate)
}
