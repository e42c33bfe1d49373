//! Key composition for the per-customer slot families.
//!
//! Each logical key family gets a fixed namespace prefix; the variable
//! component is always the customer id. The families are independent
//! slots — a pending free-input interaction and a remembered search
//! choice can coexist for the same customer.

use sf_domain::CustomerId;

/// Namespace for the single free-input pending-interaction slot.
pub const PENDING_INPUT_PREFIX: &str = "pending-input:";

/// Namespace for the remembered search-type choice.
pub const SEARCH_CHOICE_PREFIX: &str = "search-choice:";

/// Store key for a customer's free-input slot.
pub fn pending_input_key(customer: CustomerId) -> String {
    format!("{PENDING_INPUT_PREFIX}{customer}")
}

/// Store key for a customer's search-type choice.
pub fn search_choice_key(customer: CustomerId) -> String {
    format!("{SEARCH_CHOICE_PREFIX}{customer}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn families_do_not_collide() {
        let customer = CustomerId(42);
        assert_eq!(pending_input_key(customer), "pending-input:42");
        assert_eq!(search_choice_key(customer), "search-choice:42");
        assert_ne!(pending_input_key(customer), search_choice_key(customer));
    }
}
