use actix_web::{web, HttpResponse};
use kb_core::repositories::UserRepository;

use crate::app::AppState;
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

/// Handler for GET /api/user/me
///
/// Requires a bearer token. Returns the caller's account, email included.
pub async fn me<U: UserRepository + 'static>(
    state: web::Data<AppState<U>>,
    auth: AuthContext,
) -> HttpResponse {
    match state.auth_service.current_user(auth.account_id).await {
        Ok(user) => HttpResponse::Ok().json(user.to_owner_dto()),
        Err(error) => handle_domain_error(&error),
    }
}
