//! Shopfront gateway — the chat-facing storefront service.
//!
//! Every user interaction arrives as an independent, stateless inbound
//! event over `POST /v1/inbound`. Commands and button presses route
//! through an explicit dispatch table; free text routes by the
//! customer's pending-interaction slot. The four conversational flows
//! (phone update, name search, review authoring, order comment) live
//! in [`flows`], built on the slot core in `sf-interaction`.

pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod events;
pub mod flows;
pub mod memory;
pub mod menu;
pub mod router;
pub mod state;
