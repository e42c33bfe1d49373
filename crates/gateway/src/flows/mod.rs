//! The four conversational flows.
//!
//! Each flow is the same 2-state machine: an initiator arms the
//! customer's slot and shows a prompt; a continuation consumes the
//! slot on the customer's next event and either applies its effect or
//! funnels the failure through the recovery reprompt. A continuation
//! always resolves the slot (consume or invalidate) before its final
//! reply, so a slot never outlives the request that handled it.

pub mod order;
pub mod phone;
pub mod review;
pub mod search;

use sf_domain::Error;
use sf_interaction::codec::SlotFault;

/// A malformed or mismatched slot is fatal for the request; the slot
/// itself is already deleted by the time this error surfaces.
pub(crate) fn fault_error(fault: SlotFault) -> Error {
    Error::MalformedSlot(fault.describe().to_owned())
}
