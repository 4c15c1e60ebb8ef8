use actix_web::{web, HttpResponse};
use kb_core::repositories::UserRepository;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::dto::LoginRequest;
use crate::handlers::error::{handle_domain_error, validation_error_response};

/// Handler for POST /api/login
///
/// Answers 200 with `{access_token, token_type: "Bearer", expires_in}`,
/// 401 on bad credentials and 500 when the keyring has no active key.
pub async fn login<U: UserRepository + 'static>(
    state: web::Data<AppState<U>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state
        .auth_service
        .login(&request.username, &request.password)
        .await
    {
        Ok(token) => {
            info!("Issued access token for {}", request.username);
            HttpResponse::Ok().json(token)
        }
        Err(error) => handle_domain_error(&error),
    }
}
