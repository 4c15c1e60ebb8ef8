use actix_web::{web, HttpResponse};
use kb_core::services::TokenService;
use kb_shared::types::{HealthResponse, HealthStatus};

/// Handler for GET /health
///
/// Reports keyring counts. With no active signing key the service cannot
/// issue tokens, so it answers 503 with status `degraded`.
pub async fn health_check(token_service: web::Data<TokenService>) -> HttpResponse {
    let stats = token_service.keyring().stats();
    let status = if stats.active > 0 {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    };

    let response = HealthResponse::new(status, "knockbox-auth", env!("CARGO_PKG_VERSION"))
        .with_detail("total_keys", serde_json::json!(stats.total))
        .with_detail("active_keys", serde_json::json!(stats.active))
        .with_detail("expiring_keys", serde_json::json!(stats.expiring));

    if response.is_healthy() {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
