use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Bot service error variants.
#[derive(Debug, thiserror::Error)]
pub enum BotServiceError {
    #[error("invalid webhook secret")]
    InvalidWebhookSecret,
    #[error("webhook url not configured")]
    MissingWebhookUrl,
    #[error("telegram api failure")]
    Telegram(#[source] anyhow::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl BotServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidWebhookSecret => "INVALID_WEBHOOK_SECRET",
            Self::MissingWebhookUrl => "MISSING_WEBHOOK_URL",
            Self::Telegram(_) => "TELEGRAM",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for BotServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidWebhookSecret => StatusCode::UNAUTHORIZED,
            Self::MissingWebhookUrl => StatusCode::BAD_REQUEST,
            Self::Telegram(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 5xx only — tower-http TraceLayer already records method/uri/status for
        // all requests. 4xx are expected client errors; logging them here would be
        // noise. Upstream and internal errors need the anyhow chain for the root
        // cause.
        match &self {
            Self::Telegram(e) => {
                tracing::error!(error = %e, kind = "TELEGRAM", "telegram api failure");
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, kind = "INTERNAL", "internal error");
            }
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
