//! In-memory collaborators.
//!
//! The real deployments put a chat connector and persistent
//! repositories behind these traits; the in-memory versions here back
//! the standalone binary and the integration tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use uuid::Uuid;

use sf_domain::repo::{CustomerDirectory, OrderDesk, ProductCatalog, ProductHit, ReviewBook};
use sf_domain::{CustomerId, Error, MessageId, Messenger, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Recording messenger
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One outbound side effect, as returned to the connector.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundAction {
    SendText { message_id: i64, text: String },
    EditText { message_id: i64, text: String },
    DeleteMessage { message_id: i64 },
    AnswerCallback { callback_id: String },
}

/// Per-request [`Messenger`] that records every delivery so the webhook
/// response can hand the actions back to the connector. Message ids
/// come from a counter shared across requests.
pub struct RecordingMessenger {
    ids: Arc<AtomicI64>,
    actions: Mutex<Vec<OutboundAction>>,
}

impl RecordingMessenger {
    pub fn new(ids: Arc<AtomicI64>) -> Self {
        Self {
            ids,
            actions: Mutex::new(Vec::new()),
        }
    }

    /// Drain the recorded actions in delivery order.
    pub fn take_actions(&self) -> Vec<OutboundAction> {
        std::mem::take(&mut *self.actions.lock())
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_message(&self, _customer: CustomerId, text: &str) -> Result<MessageId> {
        let id = self.ids.fetch_add(1, Ordering::SeqCst);
        self.actions.lock().push(OutboundAction::SendText {
            message_id: id,
            text: text.to_owned(),
        });
        Ok(MessageId(id))
    }

    async fn edit_message(
        &self,
        _customer: CustomerId,
        message: MessageId,
        text: &str,
    ) -> Result<()> {
        self.actions.lock().push(OutboundAction::EditText {
            message_id: message.0,
            text: text.to_owned(),
        });
        Ok(())
    }

    async fn delete_message(&self, _customer: CustomerId, message: MessageId) -> Result<()> {
        self.actions
            .lock()
            .push(OutboundAction::DeleteMessage { message_id: message.0 });
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<()> {
        self.actions.lock().push(OutboundAction::AnswerCallback {
            callback_id: callback_id.to_owned(),
        });
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Repositories
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Default)]
pub struct MemoryCustomerDirectory {
    phones: RwLock<HashMap<CustomerId, String>>,
}

impl MemoryCustomerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phone_of(&self, customer: CustomerId) -> Option<String> {
        self.phones.read().get(&customer).cloned()
    }
}

#[async_trait]
impl CustomerDirectory for MemoryCustomerDirectory {
    async fn save_phone(&self, customer: CustomerId, phone: &str) -> Result<()> {
        self.phones.write().insert(customer, phone.to_owned());
        Ok(())
    }
}

pub struct MemoryProductCatalog {
    products: Vec<ProductHit>,
}

impl MemoryProductCatalog {
    pub fn new(products: Vec<ProductHit>) -> Self {
        Self { products }
    }

    /// A small demo catalog so the binary answers searches out of the
    /// box.
    pub fn seeded() -> Self {
        let product = |name: &str, price_minor: i64| ProductHit {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            price_minor,
        };
        Self::new(vec![
            product("Green tea", 450),
            product("Black tea", 420),
            product("Coffee beans 1kg", 1890),
            product("Honey jar", 760),
        ])
    }
}

#[async_trait]
impl ProductCatalog for MemoryProductCatalog {
    async fn search_by_name(&self, _search_type: &str, query: &str) -> Result<Vec<ProductHit>> {
        let needle = query.to_lowercase();
        Ok(self
            .products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredReview {
    pub store: Uuid,
    pub customer: CustomerId,
    pub text: String,
}

#[derive(Default)]
pub struct MemoryReviewBook {
    reviews: RwLock<Vec<StoredReview>>,
}

impl MemoryReviewBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reviews_for(&self, store: Uuid) -> Vec<StoredReview> {
        self.reviews
            .read()
            .iter()
            .filter(|r| r.store == store)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ReviewBook for MemoryReviewBook {
    async fn add_review(&self, store: Uuid, customer: CustomerId, text: &str) -> Result<()> {
        self.reviews.write().push(StoredReview {
            store,
            customer,
            text: text.to_owned(),
        });
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    pub id: Uuid,
    pub customer: CustomerId,
    pub delivery_token: String,
    pub comment: String,
    pub items: Vec<Uuid>,
}

#[derive(Default)]
pub struct MemoryOrderDesk {
    carts: RwLock<HashMap<CustomerId, Vec<Uuid>>>,
    orders: RwLock<Vec<PlacedOrder>>,
}

impl MemoryOrderDesk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_cart(&self, customer: CustomerId, items: Vec<Uuid>) {
        self.carts.write().insert(customer, items);
    }

    pub fn cart_of(&self, customer: CustomerId) -> Option<Vec<Uuid>> {
        self.carts.read().get(&customer).cloned()
    }

    pub fn orders(&self) -> Vec<PlacedOrder> {
        self.orders.read().clone()
    }
}

#[async_trait]
impl OrderDesk for MemoryOrderDesk {
    async fn create_order(
        &self,
        customer: CustomerId,
        delivery_token: &str,
        comment: &str,
    ) -> Result<Uuid> {
        let items = self
            .carts
            .write()
            .remove(&customer)
            .filter(|items| !items.is_empty())
            .ok_or_else(|| Error::Repository("cart is empty".into()))?;

        let order = PlacedOrder {
            id: Uuid::new_v4(),
            customer,
            delivery_token: delivery_token.to_owned(),
            comment: comment.to_owned(),
            items,
        };
        let id = order.id;
        self.orders.write().push(order);
        Ok(id)
    }

    async fn clear_cart(&self, customer: CustomerId) -> Result<()> {
        self.carts.write().remove(&customer);
        Ok(())
    }
}
