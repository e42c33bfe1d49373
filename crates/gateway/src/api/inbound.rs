//! Inbound webhook — the normalized envelope that connectors post.
//!
//! `POST /v1/inbound` accepts one chat event (a typed message or a
//! button press) and returns the outbound actions the connector should
//! perform. Each request is an independent unit of work; the platform
//! may redeliver an event, and the flows are written to make that an
//! idempotent reprompt at worst.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::{Deserialize, Serialize};

use sf_domain::{CustomerId, MessageId};

use crate::events::InboundEvent;
use crate::memory::{OutboundAction, RecordingMessenger};
use crate::router;
use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request / Response shapes
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct InboundEnvelope {
    /// The platform's id for the customer.
    pub customer_id: i64,
    /// The platform's id for the triggering message.
    pub message_id: i64,
    /// Typed message text. Absent for button presses.
    #[serde(default)]
    pub text: Option<String>,
    /// Button-press details. Takes precedence over `text` when both
    /// are present.
    #[serde(default)]
    pub callback: Option<CallbackPart>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackPart {
    pub id: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct InboundResponse {
    pub actions: Vec<OutboundAction>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /v1/inbound
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn inbound(
    State(state): State<AppState>,
    Json(body): Json<InboundEnvelope>,
) -> impl IntoResponse {
    let customer = CustomerId(body.customer_id);
    let message = MessageId(body.message_id);

    let event = match (body.callback, body.text) {
        (Some(callback), _) => InboundEvent::Callback {
            customer,
            message,
            data: callback.data,
            callback_id: callback.id,
        },
        (None, Some(text)) => InboundEvent::Message {
            customer,
            message,
            text,
        },
        (None, None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "envelope carries neither text nor callback",
                })),
            )
                .into_response();
        }
    };

    let messenger = RecordingMessenger::new(state.message_ids.clone());
    router::handle_event(&state, &messenger, event).await;

    Json(InboundResponse {
        actions: messenger.take_actions(),
    })
    .into_response()
}
