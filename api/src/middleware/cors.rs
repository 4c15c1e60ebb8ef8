//! CORS middleware configuration for cross-origin requests.
//!
//! Development is permissive so local front ends and tooling can reach the
//! API. Staging and production accept only the origins listed in
//! `ServerConfig::allowed_origins`.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use kb_shared::config::{Environment, ServerConfig};
use tracing::info;

/// Creates a CORS middleware instance for the given environment
pub fn create_cors(server: &ServerConfig, environment: Environment) -> Cors {
    if environment.is_development() {
        create_development_cors(server.cors_max_age)
    } else {
        create_restricted_cors(server)
    }
}

fn allowed_methods() -> Vec<Method> {
    vec![
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::OPTIONS,
    ]
}

fn create_development_cors(max_age: usize) -> Cors {
    info!("Configuring CORS for development environment");

    Cors::default()
        .allow_any_origin()
        .allowed_methods(allowed_methods())
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::USER_AGENT,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .max_age(max_age)
        .supports_credentials()
}

fn create_restricted_cors(server: &ServerConfig) -> Cors {
    info!(
        "Configuring CORS with {} allowed origin(s)",
        server.allowed_origins.len()
    );

    let mut cors = Cors::default()
        .allowed_methods(allowed_methods())
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .max_age(server.cors_max_age);

    for origin in &server.allowed_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}
