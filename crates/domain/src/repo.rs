//! Repository collaborator contracts.
//!
//! Persistent storage of customers, catalog, reviews, and orders is
//! out of scope for this service; the flows consume these narrow
//! traits and fold success/failure into their own transitions.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::ids::CustomerId;

/// A single catalog hit returned from a name search.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductHit {
    pub id: Uuid,
    pub name: String,
    /// Price in minor units (cents).
    pub price_minor: i64,
}

/// Customer master data (currently just the contact phone).
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn save_phone(&self, customer: CustomerId, phone: &str) -> Result<()>;
}

/// Product lookup. Search is a read, never validated by the flows.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn search_by_name(&self, search_type: &str, query: &str) -> Result<Vec<ProductHit>>;
}

/// Store review persistence.
#[async_trait]
pub trait ReviewBook: Send + Sync {
    async fn add_review(&self, store: Uuid, customer: CustomerId, text: &str) -> Result<()>;
}

/// Order creation and the cart it consumes.
#[async_trait]
pub trait OrderDesk: Send + Sync {
    /// Create an order from the customer's current cart. Returns the
    /// new order's id.
    async fn create_order(
        &self,
        customer: CustomerId,
        delivery_token: &str,
        comment: &str,
    ) -> Result<Uuid>;

    /// Drop the customer's cart (used when an order attempt aborts).
    async fn clear_cart(&self, customer: CustomerId) -> Result<()>;
}
