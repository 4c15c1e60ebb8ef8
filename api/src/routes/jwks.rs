use actix_web::{web, HttpResponse};
use kb_core::services::TokenService;

/// Handler for GET /api/jwks
///
/// Publishes the public half of every key that can still verify a token,
/// active and expiring alike. Unauthenticated.
pub async fn jwks(token_service: web::Data<TokenService>) -> HttpResponse {
    HttpResponse::Ok().json(token_service.keyring().public_snapshot())
}
