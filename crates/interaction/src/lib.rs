//! Pending free-input interaction core.
//!
//! The chat transport delivers every message and button press as an
//! isolated request, so multi-step conversations ("type your new phone
//! number") need a durable record of what the service expects next.
//! That record is the *slot*: at most one per customer, held in the
//! TTL'd session store.
//!
//! - [`opcode`] — the closed set of flows that may own a slot, mapped
//!   to integer wire values only at the codec boundary.
//! - [`codec`] — the `"/{opcode}_{message_id}={payload}"` wire format
//!   and its three-valued decode (`Vacant | Malformed | Pending`).
//! - [`manager`] — the arm/peek/consume/invalidate lifecycle.
//! - [`recovery`] — the shared invalidate → cleanup → reprompt →
//!   optional re-arm failure path.

pub mod codec;
pub mod manager;
pub mod opcode;
pub mod recovery;

pub use codec::{decode, PendingInteraction, Slot, SlotFault};
pub use manager::SlotManager;
pub use opcode::FlowOpcode;
pub use recovery::{reprompt, Rearm};
