//! Application state and route table
//!
//! The binary and the integration tests build their `App` from the same
//! [`configure_routes`] so both serve an identical surface.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use kb_core::repositories::UserRepository;
use kb_core::services::{AuthService, TokenService};

use crate::dto::{error_codes, ErrorResponse, ErrorResponseExt};
use crate::handlers::error::{json_error_handler, query_error_handler};
use crate::middleware::auth::JwtAuth;
use crate::routes::{auth, health, jwks, user};

/// Shared services handed to every handler
pub struct AppState<U: UserRepository> {
    pub auth_service: Arc<AuthService<U>>,
    pub token_service: Arc<TokenService>,
}

impl<U: UserRepository> AppState<U> {
    pub fn new(auth_service: Arc<AuthService<U>>, token_service: Arc<TokenService>) -> Self {
        Self {
            auth_service,
            token_service,
        }
    }

    /// App data entries the routes and [`JwtAuth`] look up
    pub fn into_app_data(self) -> (web::Data<Self>, web::Data<TokenService>) {
        let token_service = web::Data::from(Arc::clone(&self.token_service));
        (web::Data::new(self), token_service)
    }
}

/// Register every route. The fixed `/api/user/...` paths precede
/// `/api/user/{account_id}`.
pub fn configure_routes<U: UserRepository + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .route("/jwks", web::get().to(jwks::jwks))
                .route("/register", web::post().to(auth::register::register::<U>))
                .route("/login", web::post().to(auth::login::login::<U>))
                .service(
                    web::resource("/user/me")
                        .wrap(JwtAuth::new())
                        .route(web::get().to(user::me::me::<U>)),
                )
                .service(
                    web::resource("/user")
                        .wrap(JwtAuth::new())
                        .route(web::put().to(user::update::update::<U>))
                        .route(web::patch().to(user::update::update::<U>)),
                )
                .route(
                    "/user/username/{username}",
                    web::get().to(user::lookup::by_username::<U>),
                )
                .route(
                    "/user/search/{username}",
                    web::get().to(user::search::search::<U>),
                )
                .route(
                    "/user/{account_id}",
                    web::get().to(user::lookup::by_account_id::<U>),
                ),
        )
        .default_service(web::route().to(not_found));
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    )
    .to_response(actix_web::http::StatusCode::NOT_FOUND)
}
