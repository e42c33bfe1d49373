//! End-to-end flow scenarios driven through the router with in-memory
//! collaborators: one event per call, exactly as the webhook delivers
//! them.

use std::sync::atomic::AtomicI64;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use sf_domain::config::Config;
use sf_domain::{CustomerId, MessageId};
use sf_gateway::events::InboundEvent;
use sf_gateway::memory::{
    MemoryCustomerDirectory, MemoryOrderDesk, MemoryProductCatalog, MemoryReviewBook,
    OutboundAction, RecordingMessenger,
};
use sf_gateway::router::{self, GENERIC_RETRY};
use sf_gateway::state::AppState;
use sf_interaction::{decode, FlowOpcode, Slot, SlotManager};
use sf_sessions::{MemorySessionStore, SearchChoiceStore, SessionStore};

const ALICE: CustomerId = CustomerId(1);

struct World {
    state: AppState,
    customers: Arc<MemoryCustomerDirectory>,
    reviews: Arc<MemoryReviewBook>,
    orders: Arc<MemoryOrderDesk>,
}

fn world() -> World {
    let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let customers = Arc::new(MemoryCustomerDirectory::new());
    let reviews = Arc::new(MemoryReviewBook::new());
    let orders = Arc::new(MemoryOrderDesk::new());

    let state = AppState {
        config: Arc::new(Config::default()),
        slots: SlotManager::new(store.clone(), Duration::from_secs(900)),
        choices: SearchChoiceStore::new(store, Duration::from_secs(900)),
        customers: customers.clone(),
        catalog: Arc::new(MemoryProductCatalog::seeded()),
        reviews: reviews.clone(),
        orders: orders.clone(),
        message_ids: Arc::new(AtomicI64::new(100)),
    };

    World {
        state,
        customers,
        reviews,
        orders,
    }
}

async fn run(world: &World, event: InboundEvent) -> Vec<OutboundAction> {
    let messenger = RecordingMessenger::new(world.state.message_ids.clone());
    router::handle_event(&world.state, &messenger, event).await;
    messenger.take_actions()
}

fn message(id: i64, text: &str) -> InboundEvent {
    InboundEvent::Message {
        customer: ALICE,
        message: MessageId(id),
        text: text.to_owned(),
    }
}

fn callback(id: i64, data: &str) -> InboundEvent {
    InboundEvent::Callback {
        customer: ALICE,
        message: MessageId(id),
        data: data.to_owned(),
        callback_id: format!("cb-{id}"),
    }
}

fn sent_texts(actions: &[OutboundAction]) -> Vec<(i64, String)> {
    actions
        .iter()
        .filter_map(|a| match a {
            OutboundAction::SendText { message_id, text } => Some((*message_id, text.clone())),
            _ => None,
        })
        .collect()
}

async fn armed_slot(world: &World, expected: FlowOpcode) -> Slot {
    let raw = world.state.slots.peek(ALICE).await.unwrap();
    decode(raw.as_deref(), expected)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Phone update
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn phone_happy_path_saves_and_consumes_the_slot() {
    let world = world();

    let actions = run(&world, message(1, "/phone")).await;
    let (prompt_id, _) = sent_texts(&actions)[0].clone();

    let actions = run(&world, message(2, "+1 (234) 567-8901")).await;

    assert_eq!(
        world.customers.phone_of(ALICE).as_deref(),
        Some("+12345678901")
    );
    assert!(world.state.slots.peek(ALICE).await.unwrap().is_none());
    assert!(actions.contains(&OutboundAction::DeleteMessage { message_id: prompt_id }));
    assert!(sent_texts(&actions)
        .iter()
        .any(|(_, text)| text == "Phone number updated."));
}

#[tokio::test]
async fn phone_invalid_input_rearms_at_the_retry_prompt() {
    let world = world();

    let actions = run(&world, message(1, "/phone")).await;
    let (old_prompt, _) = sent_texts(&actions)[0].clone();

    let actions = run(&world, message(2, "abc")).await;
    let (retry_prompt, _) = sent_texts(&actions)[0].clone();

    // Old prompt was cleaned up; the fresh slot points at the retry
    // message, so the old slot instance is unreachable.
    assert!(actions.contains(&OutboundAction::DeleteMessage { message_id: old_prompt }));
    match armed_slot(&world, FlowOpcode::PhoneUpdate).await {
        Slot::Pending(p) => {
            assert_eq!(p.origin_message, MessageId(retry_prompt));
            assert_ne!(p.origin_message, MessageId(old_prompt));
        }
        other => panic!("expected a fresh pending slot, got {other:?}"),
    }
    assert_eq!(world.customers.phone_of(ALICE), None);
}

#[tokio::test]
async fn redelivered_reply_reprompts_instead_of_double_saving() {
    let world = world();

    run(&world, message(1, "/phone")).await;
    run(&world, message(2, "+12345678901")).await;

    // The platform redelivers the same reply; the slot is gone, so the
    // duplicate resolves to the generic retry, not a second save.
    let actions = run(&world, message(2, "+12345678901")).await;

    let texts = sent_texts(&actions);
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].1, GENERIC_RETRY);
    assert_eq!(
        world.customers.phone_of(ALICE).as_deref(),
        Some("+12345678901")
    );
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Free text with nothing to resume
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn free_text_without_a_slot_gets_the_generic_error() {
    let world = world();

    let actions = run(&world, message(1, "hello there")).await;

    let texts = sent_texts(&actions);
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].1, GENERIC_RETRY);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Review authoring
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn review_two_step_payload_then_truncated_persistence() {
    let world = world();
    let store_id = Uuid::new_v4();

    run(&world, message(1, "/review")).await;

    // Armed with no payload: store not chosen yet.
    let prompt = match armed_slot(&world, FlowOpcode::Review).await {
        Slot::Pending(p) => {
            assert_eq!(p.payload, None);
            p.origin_message
        }
        other => panic!("expected pending review slot, got {other:?}"),
    };

    run(&world, callback(2, &format!("review_store:{store_id}"))).await;

    // Re-armed on the same origin message, now carrying the store id.
    match armed_slot(&world, FlowOpcode::Review).await {
        Slot::Pending(p) => {
            assert_eq!(p.origin_message, prompt);
            assert_eq!(p.payload.as_deref(), Some(store_id.to_string().as_str()));
        }
        other => panic!("expected re-armed review slot, got {other:?}"),
    }

    run(&world, message(3, &"x".repeat(300))).await;

    let stored = world.reviews.reviews_for(store_id);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].text.chars().count(), 256);
    assert!(world.state.slots.peek(ALICE).await.unwrap().is_none());
}

#[tokio::test]
async fn review_text_before_choosing_a_store_reprompts() {
    let world = world();

    run(&world, message(1, "/review")).await;
    run(&world, message(2, "great shop!")).await;

    // Still awaiting a store choice; nothing persisted.
    match armed_slot(&world, FlowOpcode::Review).await {
        Slot::Pending(p) => assert_eq!(p.payload, None),
        other => panic!("expected pending review slot, got {other:?}"),
    }
    assert!(world.reviews.reviews_for(Uuid::nil()).is_empty());
}

#[tokio::test]
async fn review_escapes_html_before_persisting() {
    let world = world();
    let store_id = Uuid::new_v4();

    run(&world, message(1, "/review")).await;
    run(&world, callback(2, &format!("review_store:{store_id}"))).await;
    run(&world, message(3, "nice <b>shop</b> & staff")).await;

    let stored = world.reviews.reviews_for(store_id);
    assert_eq!(stored[0].text, "nice &lt;b&gt;shop&lt;/b&gt; &amp; staff");
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Order comment
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn order_empty_comment_aborts_with_cart_clearance() {
    let world = world();
    world.orders.set_cart(ALICE, vec![Uuid::new_v4()]);

    run(&world, callback(1, "delivery:courier")).await;
    let actions = run(&world, message(2, "   ")).await;

    assert_eq!(world.orders.cart_of(ALICE), None);
    assert!(world.orders.orders().is_empty());
    // Aborted, not reprompted: no slot was re-armed.
    assert!(world.state.slots.peek(ALICE).await.unwrap().is_none());
    assert!(sent_texts(&actions)
        .iter()
        .any(|(_, text)| text.contains("cancelled")));
    assert!(sent_texts(&actions)
        .iter()
        .any(|(_, text)| text.starts_with("Welcome to the shop!")));
}

#[tokio::test]
async fn order_happy_path_places_the_order_with_escaped_comment() {
    let world = world();
    let item = Uuid::new_v4();
    world.orders.set_cart(ALICE, vec![item]);

    run(&world, callback(1, "delivery:courier")).await;
    let actions = run(&world, message(2, "Ring <twice>")).await;

    let orders = world.orders.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].delivery_token, "courier");
    assert_eq!(orders[0].comment, "Ring &lt;twice&gt;");
    assert_eq!(orders[0].items, vec![item]);
    assert!(world.state.slots.peek(ALICE).await.unwrap().is_none());
    assert!(sent_texts(&actions)
        .iter()
        .any(|(_, text)| text.starts_with("Order placed!")));
}

#[tokio::test]
async fn order_creation_failure_aborts_too() {
    let world = world();
    // No cart: the order desk refuses to create the order.

    run(&world, callback(1, "delivery:pickup")).await;
    let actions = run(&world, message(2, "leave at the door")).await;

    assert!(world.orders.orders().is_empty());
    assert!(world.state.slots.peek(ALICE).await.unwrap().is_none());
    assert!(sent_texts(&actions)
        .iter()
        .any(|(_, text)| text.contains("couldn't place your order")));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Name search
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn search_happy_path_lists_hits_and_clears_state() {
    let world = world();

    run(&world, callback(1, "search_type:name")).await;
    let actions = run(&world, message(2, "tea")).await;

    let texts = sent_texts(&actions);
    assert!(texts.iter().any(|(_, t)| t.contains("Green tea")));
    assert!(texts.iter().any(|(_, t)| t.contains("Black tea")));
    assert!(world.state.slots.peek(ALICE).await.unwrap().is_none());
    assert_eq!(world.state.choices.recall(ALICE).await.unwrap(), None);
}

#[tokio::test]
async fn search_empty_results_rearm_with_the_same_payload() {
    let world = world();

    run(&world, callback(1, "search_type:name")).await;
    let actions = run(&world, message(2, "zzz")).await;
    let (retry_prompt, retry_text) = sent_texts(&actions)[0].clone();

    assert!(retry_text.contains("Nothing found"));
    match armed_slot(&world, FlowOpcode::NameSearch).await {
        Slot::Pending(p) => {
            assert_eq!(p.payload.as_deref(), Some("name"));
            assert_eq!(p.origin_message, MessageId(retry_prompt));
        }
        other => panic!("expected re-armed search slot, got {other:?}"),
    }

    // The preserved context lets the next attempt succeed directly.
    let actions = run(&world, message(3, "honey")).await;
    assert!(sent_texts(&actions)
        .iter()
        .any(|(_, t)| t.contains("Honey jar")));
}

#[tokio::test]
async fn search_blank_query_reprompts_without_losing_context() {
    let world = world();

    run(&world, callback(1, "search_type:name")).await;
    run(&world, message(2, "   ")).await;

    match armed_slot(&world, FlowOpcode::NameSearch).await {
        Slot::Pending(p) => assert_eq!(p.payload.as_deref(), Some("name")),
        other => panic!("expected re-armed search slot, got {other:?}"),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Opcode mismatch
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn garbage_slot_is_invalidated_and_fatal() {
    let world = world();

    // A phone slot read by the review continuation: opcode mismatch.
    world
        .state
        .slots
        .arm(ALICE, FlowOpcode::PhoneUpdate, MessageId(1), None)
        .await
        .unwrap();
    let actions = run(&world, callback(2, "review_store:abc")).await;

    // The review continuation read a phone slot: fatal, slot gone.
    assert!(world.state.slots.peek(ALICE).await.unwrap().is_none());
    assert!(sent_texts(&actions)
        .iter()
        .any(|(_, text)| text == GENERIC_RETRY));
}
