use axum::{Json, extract::State, http::HeaderMap};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::domain::types::VERIFY_CALLBACK_DATA;
use crate::error::BotServiceError;
use crate::state::AppState;
use crate::usecase::dispatch::InboundEvent;

/// Header Telegram echoes back when `setWebhook` was given a secret token.
const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

// ── Inbound wire types ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdatePayload {
    pub message: Option<IncomingMessage>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    pub chat: ChatRef,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRef {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct UserRef {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: UserRef,
    pub message: Option<IncomingMessage>,
    pub data: Option<String>,
}

/// `@username` when set, first name otherwise.
fn display_name(user: &UserRef) -> Option<String> {
    user.username
        .as_ref()
        .map(|u| format!("@{u}"))
        .or_else(|| user.first_name.clone())
}

/// Map a raw update to the event the dispatcher understands.
///
/// Callback queries take precedence. A callback with unexpected data, a
/// callback without its originating message, and any payload carrying
/// neither shape all classify as `Unrecognized`.
fn classify(update: UpdatePayload) -> InboundEvent {
    if let Some(cq) = update.callback_query {
        if cq.data.as_deref() == Some(VERIFY_CALLBACK_DATA) {
            if let Some(message) = cq.message {
                return InboundEvent::VerifyPressed {
                    callback_id: cq.id,
                    chat_id: message.chat.id,
                    user_id: cq.from.id,
                    username: display_name(&cq.from),
                };
            }
        }
        return InboundEvent::Unrecognized;
    }

    if let Some(message) = update.message {
        return InboundEvent::Message {
            chat_id: message.chat.id,
        };
    }

    InboundEvent::Unrecognized
}

/// Handler for `POST /webhook` — one Telegram update per request.
///
/// Always answers `{"ok": true}` once dispatched; Telegram retries on
/// anything else, and a resend of the prompt is the worst a duplicate can do.
pub async fn receive_update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(update): Json<UpdatePayload>,
) -> Result<Json<Value>, BotServiceError> {
    if let Some(expected) = &state.webhook_secret {
        let presented = headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());
        if presented != Some(expected.as_str()) {
            return Err(BotServiceError::InvalidWebhookSecret);
        }
    }

    state.dispatcher().execute(classify(update)).await?;
    Ok(Json(json!({ "ok": true })))
}
