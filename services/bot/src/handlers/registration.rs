use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::error::BotServiceError;
use crate::state::AppState;

/// Handler for `POST /webhook/registration` — point Telegram at the
/// configured public URL, dropping any updates queued while unregistered.
pub async fn register_webhook(
    State(state): State<AppState>,
) -> Result<Json<Value>, BotServiceError> {
    let url = state
        .webhook_url
        .as_deref()
        .ok_or(BotServiceError::MissingWebhookUrl)?;
    state
        .telegram
        .set_webhook(url, state.webhook_secret.as_deref())
        .await?;
    Ok(Json(json!({ "ok": true })))
}

/// Handler for `DELETE /webhook/registration`.
pub async fn unregister_webhook(
    State(state): State<AppState>,
) -> Result<Json<Value>, BotServiceError> {
    state.telegram.delete_webhook().await?;
    Ok(Json(json!({ "ok": true })))
}
