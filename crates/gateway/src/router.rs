//! Event routing.
//!
//! Commands and callback tokens map to handlers through an explicit
//! match — the whole dispatch surface is visible (and checkable) here.
//! Free text has no token, so it routes by the customer's armed slot:
//! the router sniffs the opcode prefix to pick the owning flow, and
//! that flow's decode still enforces the full format contract.
//!
//! [`handle_event`] is the recovery boundary: no error from the core
//! ever reaches the customer as anything but the generic retry text.

use sf_domain::{CustomerId, Error, Messenger, Result};
use sf_interaction::FlowOpcode;

use crate::events::InboundEvent;
use crate::flows::{order, phone, review, search};
use crate::menu;
use crate::state::AppState;

pub const GENERIC_RETRY: &str = "Something went wrong. Please try again.";

/// Dispatch one inbound event, converting any failure into the generic
/// retry message.
pub async fn handle_event(state: &AppState, messenger: &dyn Messenger, event: InboundEvent) {
    let customer = event.customer();
    if let Err(e) = dispatch(state, messenger, event).await {
        tracing::warn!(%customer, error = %e, "event handling failed");
        if let Err(e) = messenger.send_message(customer, GENERIC_RETRY).await {
            tracing::error!(%customer, error = %e, "failed to deliver the retry message");
        }
    }
}

pub async fn dispatch(
    state: &AppState,
    messenger: &dyn Messenger,
    event: InboundEvent,
) -> Result<()> {
    match event {
        InboundEvent::Message { customer, text, .. } => match text.trim() {
            "/start" | "/menu" => menu::send_main_menu(messenger, customer).await,
            "/phone" => phone::start(state, messenger, customer).await,
            "/search" => menu::send_search_types(messenger, customer).await,
            "/review" => review::start(state, messenger, customer).await,
            other if other.starts_with('/') => {
                menu::send_unknown_command(messenger, customer).await
            }
            other => resume_free_text(state, messenger, customer, other).await,
        },

        InboundEvent::Callback {
            customer,
            data,
            callback_id,
            ..
        } => {
            if let Err(e) = messenger.answer_callback(&callback_id).await {
                tracing::debug!(%customer, error = %e, "callback answer failed");
            }
            dispatch_callback(state, messenger, customer, &data).await
        }
    }
}

/// Callback-token routing table.
async fn dispatch_callback(
    state: &AppState,
    messenger: &dyn Messenger,
    customer: CustomerId,
    data: &str,
) -> Result<()> {
    if let Some((kind, arg)) = data.split_once(':') {
        return match kind {
            "search_type" => search::start(state, messenger, customer, arg).await,
            "review_store" => review::choose_store(state, messenger, customer, arg).await,
            "delivery" => order::start(state, messenger, customer, arg).await,
            _ => {
                tracing::warn!(%customer, data = %data, "unknown callback token");
                Ok(())
            }
        };
    }

    match data {
        "menu" => menu::send_main_menu(messenger, customer).await,
        "search" => menu::send_search_types(messenger, customer).await,
        "review" => review::start(state, messenger, customer).await,
        _ => {
            tracing::warn!(%customer, data = %data, "unknown callback token");
            Ok(())
        }
    }
}

/// Route free text to whichever flow armed the customer's slot.
async fn resume_free_text(
    state: &AppState,
    messenger: &dyn Messenger,
    customer: CustomerId,
    text: &str,
) -> Result<()> {
    let Some(raw) = state.slots.peek(customer).await? else {
        return Err(Error::NothingToResume);
    };

    match FlowOpcode::sniff(&raw) {
        Some(FlowOpcode::PhoneUpdate) => phone::resume(state, messenger, customer, text).await,
        Some(FlowOpcode::NameSearch) => search::resume(state, messenger, customer, text).await,
        Some(FlowOpcode::Review) => review::resume(state, messenger, customer, text).await,
        Some(FlowOpcode::OrderComment) => order::resume(state, messenger, customer, text).await,
        None => {
            // Unroutable garbage: never partially trusted.
            state.slots.invalidate(customer).await?;
            Err(Error::MalformedSlot("unroutable slot prefix".into()))
        }
    }
}
