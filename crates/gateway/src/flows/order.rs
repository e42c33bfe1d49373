//! Order comment / delivery flow.
//!
//! The delivery-method button arms an `OrderComment` slot whose payload
//! carries the chosen delivery token. The comment continuation is the
//! strict one: a missing comment (or an order-creation failure) aborts
//! the whole attempt — cart cleared, back to the main menu, no re-arm.
//! Creating an order touches money and logistics; it never silently
//! retries against possibly-stale cart contents.

use sf_domain::text::{escape_html, truncate_chars};
use sf_domain::{CustomerId, Error, Messenger, MessageId, Result};
use sf_interaction::{FlowOpcode, Slot};

use crate::flows::fault_error;
use crate::menu;
use crate::state::AppState;

const PROMPT: &str = "Add a comment for your order (address details, door code, ...).";
const CANCELLED_EMPTY: &str =
    "An order needs a comment. The order was cancelled and your cart cleared.";
const CANCELLED_FAILED: &str =
    "We couldn't place your order. It was cancelled and your cart cleared.";

/// Persisted comment cap, in characters after escaping.
const MAX_COMMENT_CHARS: usize = 120;

/// Initiator: the customer picked a delivery method at checkout.
pub async fn start(
    state: &AppState,
    messenger: &dyn Messenger,
    customer: CustomerId,
    delivery_token: &str,
) -> Result<()> {
    let prompt = messenger.send_message(customer, PROMPT).await?;
    state
        .slots
        .arm(
            customer,
            FlowOpcode::OrderComment,
            prompt,
            Some(delivery_token.to_owned()),
        )
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
        .consume_decoded(customer, FlowOpcode::OrderComment)
        .await?
    {
        Slot::Vacant => return Err(Error::NothingToResume),
        Slot::Malformed(fault) => return Err(fault_error(fault)),
        Slot::Pending(pending) => pending,
    };

    // An order slot without its delivery token is a format violation,
    // not a user mistake.
    let delivery_token = match pending.payload.as_deref() {
        Some(token) if !token.is_empty() => token.to_owned(),
        _ => return Err(Error::MalformedSlot("order slot without delivery token".into())),
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return abort(state, messenger, customer, pending.origin_message, CANCELLED_EMPTY).await;
    }

    let escaped = escape_html(trimmed);
    let comment = truncate_chars(&escaped, MAX_COMMENT_CHARS);

    match state
        .orders
        .create_order(customer, &delivery_token, comment)
        .await
    {
        Ok(order_id) => {
            if let Err(e) = messenger.delete_message(customer, pending.origin_message).await {
                tracing::debug!(%customer, error = %e, "order prompt already gone");
            }
            messenger
                .send_message(customer, &format!("Order placed! Reference: {order_id}."))
                .await?;
            Ok(())
        }
        Err(e) => {
            tracing::warn!(%customer, error = %e, "order creation failed, aborting");
            abort(state, messenger, customer, pending.origin_message, CANCELLED_FAILED).await
        }
    }
}

/// Abort the attempt: clear the cart, drop the prompt, explain, and
/// land the customer back on the main menu. The slot is already gone.
async fn abort(
    state: &AppState,
    messenger: &dyn Messenger,
    customer: CustomerId,
    prompt: MessageId,
    text: &str,
) -> Result<()> {
    if let Err(e) = state.orders.clear_cart(customer).await {
        tracing::warn!(%customer, error = %e, "cart clear failed during abort");
    }
    if let Err(e) = messenger.delete_message(customer, prompt).await {
        tracing::debug!(%customer, error = %e, "order prompt already gone");
    }
    messenger.send_message(customer, text).await?;
    menu::send_main_menu(messenger, customer).await
}
