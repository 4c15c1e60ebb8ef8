use actix_web::{web, HttpResponse};
use kb_core::repositories::UserRepository;
use kb_shared::Page;

use crate::app::AppState;
use crate::handlers::error::{bad_request, handle_domain_error};

/// Handler for GET /api/user/search/{username}?limit=&offset=
///
/// # Response
///
/// - 200 with the matching public user DTOs
/// - 204 when nothing matches
/// - 400 when the username is blank or the paging query is malformed
pub async fn search<U: UserRepository + 'static>(
    state: web::Data<AppState<U>>,
    path: web::Path<String>,
    page: web::Query<Page>,
) -> HttpResponse {
    let username = path.trim();
    if username.is_empty() {
        return bad_request("username must not be blank");
    }

    match state.auth_service.search(username, page.into_inner()).await {
        Ok(users) if users.is_empty() => HttpResponse::NoContent().finish(),
        Ok(users) => {
            let dtos: Vec<_> = users.iter().map(|u| u.to_dto()).collect();
            HttpResponse::Ok().json(dtos)
        }
        Err(error) => handle_domain_error(&error),
    }
}
