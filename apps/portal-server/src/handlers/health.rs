//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    /// Whether the ERP backend answered its health probe.
    pub backend_reachable: bool,
}

/// Health check endpoint - returns server status.
///
/// GET /api/health
///
/// Always 200 while the server runs; an unreachable backend only marks the
/// status as `degraded`.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let backend_reachable = state.backend.check_connectivity().await;
    if !backend_reachable {
        tracing::warn!("Backend health probe failed");
    }

    let response = HealthResponse {
        status: if backend_reachable { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
        backend_reachable,
    };

    HttpResponse::Ok().json(response)
}
