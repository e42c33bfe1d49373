//! Session-state storage for Shopfront.
//!
//! The chat transport is stateless, so every piece of "what is this
//! customer doing right now" lives in a shared key-value store with
//! per-entry TTLs. This crate defines the store contract, the key
//! families the service uses, and an in-memory implementation for the
//! binary and tests.

pub mod choice;
pub mod keys;
pub mod store;

pub use choice::SearchChoiceStore;
pub use keys::{pending_input_key, search_choice_key};
pub use store::{MemorySessionStore, SessionStore};
