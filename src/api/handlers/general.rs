//! General endpoints that don't touch the ledger.

use axum::Json;
use serde::Serialize;

/// Response of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct Health {
    /// Always `"ok"`
    pub status: &'static str,
}

/// Liveness check.
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}
