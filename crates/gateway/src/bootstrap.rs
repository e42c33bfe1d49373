//! Shared-state assembly.

use std::sync::atomic::AtomicI64;
use std::sync::Arc;
use std::time::Duration;

use sf_domain::config::Config;
use sf_interaction::SlotManager;
use sf_sessions::{MemorySessionStore, SearchChoiceStore, SessionStore};

use crate::memory::{
    MemoryCustomerDirectory, MemoryOrderDesk, MemoryProductCatalog, MemoryReviewBook,
};
use crate::state::AppState;

/// Build the application state with the in-memory collaborators.
/// Production deployments swap the store and repositories behind the
/// same traits.
pub fn build_app_state(config: Arc<Config>) -> AppState {
    let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());

    let slots = SlotManager::new(
        store.clone(),
        Duration::from_secs(config.slots.pending_input_ttl_secs),
    );
    let choices = SearchChoiceStore::new(
        store,
        Duration::from_secs(config.slots.search_choice_ttl_secs),
    );

    AppState {
        config,
        slots,
        choices,
        customers: Arc::new(MemoryCustomerDirectory::new()),
        catalog: Arc::new(MemoryProductCatalog::seeded()),
        reviews: Arc::new(MemoryReviewBook::new()),
        orders: Arc::new(MemoryOrderDesk::new()),
        message_ids: Arc::new(AtomicI64::new(1)),
    }
}
