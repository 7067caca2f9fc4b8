use axum::http::StatusCode;

/// Handler for `GET /healthz` — liveness probe.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Handler for `GET /readyz` — readiness probe. The bot keeps its ledger in
/// memory once loaded, so ready is the same as alive.
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}
