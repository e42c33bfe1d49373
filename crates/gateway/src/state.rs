use std::sync::atomic::AtomicI64;
use std::sync::Arc;

use sf_domain::config::Config;
use sf_domain::repo::{CustomerDirectory, OrderDesk, ProductCatalog, ReviewBook};
use sf_interaction::SlotManager;
use sf_sessions::SearchChoiceStore;

/// Shared application state passed to all handlers.
///
/// Fields are grouped by concern:
/// - **Slots** — the pending-interaction lifecycle and the
///   search-choice slot (independent key families in the same store)
/// - **Repositories** — the external persistence collaborators
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    // ── Slots ─────────────────────────────────────────────────────────
    pub slots: SlotManager,
    pub choices: SearchChoiceStore,

    // ── Repositories ──────────────────────────────────────────────────
    pub customers: Arc<dyn CustomerDirectory>,
    pub catalog: Arc<dyn ProductCatalog>,
    pub reviews: Arc<dyn ReviewBook>,
    pub orders: Arc<dyn OrderDesk>,

    /// Source of outbound message ids, shared across requests so every
    /// prompt a flow sends gets a unique id.
    pub message_ids: Arc<AtomicI64>,
}
