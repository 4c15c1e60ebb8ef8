use actix_web::{web, HttpResponse};
use kb_core::repositories::UserRepository;
use uuid::Uuid;

use crate::app::AppState;
use crate::handlers::error::{bad_request, handle_domain_error, not_found};

/// Handler for GET /api/user/{account_id}
pub async fn by_account_id<U: UserRepository + 'static>(
    state: web::Data<AppState<U>>,
    path: web::Path<String>,
) -> HttpResponse {
    let Ok(account_id) = Uuid::parse_str(path.trim()) else {
        return bad_request("account id must be a UUID");
    };

    match state.auth_service.find_by_account_id(account_id).await {
        Ok(Some(user)) => HttpResponse::Ok().json(user.to_dto()),
        Ok(None) => not_found("User not found"),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for GET /api/user/username/{username}
pub async fn by_username<U: UserRepository + 'static>(
    state: web::Data<AppState<U>>,
    path: web::Path<String>,
) -> HttpResponse {
    let username = path.trim();
    if username.is_empty() {
        return bad_request("username must not be blank");
    }

    match state.auth_service.find_by_username(username).await {
        Ok(Some(user)) => HttpResponse::Ok().json(user.to_dto()),
        Ok(None) => not_found("User not found"),
        Err(error) => handle_domain_error(&error),
    }
}
