use axum::Json;
use serde_json::{Value, json};

/// Handler for `GET /` — the status blob the bot has always served.
pub async fn status() -> Json<Value> {
    Json(json!({ "ok": true, "msg": "Bot is running" }))
}
