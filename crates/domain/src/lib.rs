//! Shared domain types for Shopfront.
//!
//! Holds the crate-wide error type, the customer/message id newtypes,
//! the collaborator traits (chat transport + repositories), text
//! utilities, and the configuration structs. Everything here is
//! dependency-light so the core crates can build on it without pulling
//! the gateway's web stack.

pub mod chat;
pub mod config;
pub mod error;
pub mod ids;
pub mod repo;
pub mod text;

pub use chat::Messenger;
pub use error::{Error, Result};
pub use ids::{CustomerId, MessageId};
