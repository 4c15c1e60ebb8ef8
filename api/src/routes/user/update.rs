use actix_web::{web, HttpResponse};
use kb_core::repositories::UserRepository;
use validator::Validate;

use crate::app::AppState;
use crate::dto::UpdateUserRequest;
use crate::handlers::error::{bad_request, handle_domain_error, validation_error_response};
use crate::middleware::auth::AuthContext;

/// Handler for PUT|PATCH /api/user
///
/// Changes the caller's email and/or password. 204 on success, 400 when the
/// body is empty or a field breaks the registration rules.
pub async fn update<U: UserRepository + 'static>(
    state: web::Data<AppState<U>>,
    auth: AuthContext,
    request: web::Json<UpdateUserRequest>,
) -> HttpResponse {
    let request = request.into_inner();
    if request.is_empty() {
        return bad_request("no changes supplied");
    }
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state
        .auth_service
        .update(auth.account_id, request.into())
        .await
    {
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(error) => handle_domain_error(&error),
    }
}
