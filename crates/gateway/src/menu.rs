//! Main menu and other stateless one-shot replies.
//!
//! These commands carry no state machine — each is a thin formatter
//! over a single send. Keyboard construction belongs to the connector;
//! the gateway only names the callback tokens the buttons should carry.

use sf_domain::{CustomerId, Messenger, Result};

pub const MAIN_MENU: &str = "Welcome to the shop!\n\
    /search — find products\n\
    /phone — update your phone number\n\
    /review — leave a store review";

const SEARCH_TYPES: &str = "How would you like to search? Pick an option below.";

pub async fn send_main_menu(messenger: &dyn Messenger, customer: CustomerId) -> Result<()> {
    messenger.send_message(customer, MAIN_MENU).await?;
    Ok(())
}

pub async fn send_search_types(messenger: &dyn Messenger, customer: CustomerId) -> Result<()> {
    messenger.send_message(customer, SEARCH_TYPES).await?;
    Ok(())
}

pub async fn send_unknown_command(messenger: &dyn Messenger, customer: CustomerId) -> Result<()> {
    messenger
        .send_message(customer, "Unknown command. Send /start for the menu.")
        .await?;
    Ok(())
}
