use actix_web::{web, HttpResponse};
use kb_core::repositories::UserRepository;
use tracing::warn;
use validator::Validate;

use crate::app::AppState;
use crate::dto::RegisterRequest;
use crate::handlers::error::{handle_domain_error, validation_error_response};

/// Handler for POST /api/register
///
/// # Request Body
///
/// ```json
/// { "username": "alice", "password": "correct-horse-battery", "email": "alice@example.com" }
/// ```
///
/// # Response
///
/// - 201 Created with the new account (including email)
/// - 400 Bad Request when a field is invalid or the username/email is taken
pub async fn register<U: UserRepository + 'static>(
    state: web::Data<AppState<U>>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse {
    let request = request.into_inner();
    if let Err(errors) = request.validate() {
        warn!("Rejected registration for '{}': {}", request.username, errors);
        return validation_error_response(&errors);
    }

    match state.auth_service.register(request.into()).await {
        Ok(user) => HttpResponse::Created().json(user.to_owner_dto()),
        Err(error) => handle_domain_error(&error),
    }
}
