//! Name-search flow.
//!
//! The search-type chooser (a button) is the initiator: it remembers
//! the chosen type in the search-choice slot, arms a `NameSearch` slot
//! seeded with that type, and asks for a name. The continuation runs
//! the lookup. An empty result set is not a failure of the slot: the
//! flow re-arms with the *same* payload so the customer keeps their
//! search context and just tries another name.

use sf_domain::repo::ProductHit;
use sf_domain::{CustomerId, Error, Messenger, Result};
use sf_interaction::{reprompt, FlowOpcode, Rearm, Slot};

use crate::flows::fault_error;
use crate::state::AppState;

const PROMPT: &str = "Type a product name to search for.";
const EMPTY_QUERY_RETRY: &str = "Please type a non-empty product name.";
const LOOKUP_RETRY: &str = "Search is unavailable right now. Please try again.";

/// Fallback search type when neither the slot payload nor the choice
/// slot carries one.
const DEFAULT_SEARCH_TYPE: &str = "name";

/// Initiator: the customer picked a search type.
pub async fn start(
    state: &AppState,
    messenger: &dyn Messenger,
    customer: CustomerId,
    search_type: &str,
) -> Result<()> {
    state.choices.remember(customer, search_type).await?;
    let prompt = messenger.send_message(customer, PROMPT).await?;
    state
        .slots
        .arm(
            customer,
            FlowOpcode::NameSearch,
            prompt,
            Some(search_type.to_owned()),
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
        .consume_decoded(customer, FlowOpcode::NameSearch)
        .await?
    {
        Slot::Vacant => return Err(Error::NothingToResume),
        Slot::Malformed(fault) => return Err(fault_error(fault)),
        Slot::Pending(pending) => pending,
    };

    let query = text.trim();
    if query.is_empty() {
        reprompt(
            &state.slots,
            messenger,
            customer,
            &[pending.origin_message],
            EMPTY_QUERY_RETRY,
            Some(Rearm {
                opcode: FlowOpcode::NameSearch,
                payload: pending.payload.clone(),
            }),
        )
        .await?;
        return Ok(());
    }

    let search_type = match pending.payload.as_deref() {
        Some(t) if !t.is_empty() => t.to_owned(),
        _ => state
            .choices
            .recall(customer)
            .await?
            .unwrap_or_else(|| DEFAULT_SEARCH_TYPE.to_owned()),
    };

    let hits = match state.catalog.search_by_name(&search_type, query).await {
        Ok(hits) => hits,
        Err(e) => {
            tracing::warn!(%customer, error = %e, "catalog lookup failed, reprompting");
            reprompt(
                &state.slots,
                messenger,
                customer,
                &[pending.origin_message],
                LOOKUP_RETRY,
                Some(Rearm {
                    opcode: FlowOpcode::NameSearch,
                    payload: pending.payload.clone(),
                }),
            )
            .await?;
            return Ok(());
        }
    };

    if hits.is_empty() {
        // Same flow, same payload: the customer keeps their context and
        // just types another name.
        reprompt(
            &state.slots,
            messenger,
            customer,
            &[pending.origin_message],
            &format!("Nothing found for \"{query}\". Try another name."),
            Some(Rearm {
                opcode: FlowOpcode::NameSearch,
                payload: pending.payload.clone(),
            }),
        )
        .await?;
        return Ok(());
    }

    if let Err(e) = messenger.delete_message(customer, pending.origin_message).await {
        tracing::debug!(%customer, error = %e, "search prompt already gone");
    }
    state.choices.forget(customer).await?;
    messenger.send_message(customer, &render_hits(&hits)).await?;
    Ok(())
}

fn render_hits(hits: &[ProductHit]) -> String {
    let mut out = format!("Found {}:\n", hits.len());
    for hit in hits {
        let whole = hit.price_minor / 100;
        let cents = hit.price_minor % 100;
        out.push_str(&format!("• {} — {whole}.{cents:02}\n", hit.name));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn renders_prices_in_major_units() {
        let hits = vec![ProductHit {
            id: Uuid::new_v4(),
            name: "Green tea".into(),
            price_minor: 450,
        }];
        let rendered = render_hits(&hits);
        assert!(rendered.contains("Green tea — 4.50"));
        assert!(rendered.starts_with("Found 1:"));
    }
}
