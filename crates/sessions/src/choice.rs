//! Search-type choice slot.
//!
//! Independent of the free-input pending-interaction slot: it only
//! remembers which search mode the customer last picked, so a reprompt
//! can fall back to it when the free-input slot carries no seed.

use std::sync::Arc;
use std::time::Duration;

use sf_domain::{CustomerId, Result};

use crate::keys::search_choice_key;
use crate::store::SessionStore;

/// TTL'd per-customer record of the chosen search type.
#[derive(Clone)]
pub struct SearchChoiceStore {
    store: Arc<dyn SessionStore>,
    ttl: Duration,
}

impl SearchChoiceStore {
    pub fn new(store: Arc<dyn SessionStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub async fn remember(&self, customer: CustomerId, search_type: &str) -> Result<()> {
        self.store
            .set(&search_choice_key(customer), search_type, self.ttl)
            .await
    }

    pub async fn recall(&self, customer: CustomerId) -> Result<Option<String>> {
        self.store.get(&search_choice_key(customer)).await
    }

    pub async fn forget(&self, customer: CustomerId) -> Result<()> {
        self.store.delete(&search_choice_key(customer)).await
    }
}
