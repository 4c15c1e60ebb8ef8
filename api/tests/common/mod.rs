//! Shared fixtures for HTTP integration tests
#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{test::TestRequest, web};
use kb_api::AppState;
use kb_core::keyring::{CurveType, KeySet, ManualScheduler};
use kb_core::repositories::InMemoryUserRepository;
use kb_core::services::{AuthService, AuthServiceConfig, TokenService, TokenServiceConfig};

pub const PASSWORD: &str = "correct-horse-battery";

/// Services behind a test app, with handles for steering them
pub struct TestContext {
    pub state: web::Data<AppState<InMemoryUserRepository>>,
    pub token_data: web::Data<TokenService>,
    pub users: InMemoryUserRepository,
    pub keyring: KeySet,
    pub scheduler: ManualScheduler,
}

/// A 10s/4s P-256 keyring on a simulated clock holding `keys` active keys
pub fn context_with_keys(keys: usize) -> TestContext {
    let scheduler = ManualScheduler::new();
    let keyring = KeySet::new(10, 4, Arc::new(scheduler.clone())).unwrap();
    keyring.configure([CurveType::P256]).unwrap();
    if keys > 0 {
        keyring.generate(keys).unwrap();
    }

    let token_service = Arc::new(TokenService::new(
        keyring.clone(),
        TokenServiceConfig::default(),
    ));
    let users = InMemoryUserRepository::new();
    let auth_service = Arc::new(AuthService::new(
        Arc::new(users.clone()),
        Arc::clone(&token_service),
        AuthServiceConfig {
            allow_registration: true,
            bcrypt_cost: 4,
        },
    ));
    let (state, token_data) = AppState::new(auth_service, token_service).into_app_data();

    TestContext {
        state,
        token_data,
        users,
        keyring,
        scheduler,
    }
}

pub fn context() -> TestContext {
    context_with_keys(1)
}

/// Initialise the full route table over a [`TestContext`]
macro_rules! test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($ctx.state.clone())
                .app_data($ctx.token_data.clone())
                .configure(kb_api::configure_routes::<kb_core::repositories::InMemoryUserRepository>),
        )
        .await
    };
}

pub fn register_request(username: &str, email: &str) -> TestRequest {
    TestRequest::post().uri("/api/register").set_json(serde_json::json!({
        "username": username,
        "password": PASSWORD,
        "email": email,
    }))
}

pub fn login_request(username: &str, password: &str) -> TestRequest {
    TestRequest::post().uri("/api/login").set_json(serde_json::json!({
        "username": username,
        "password": password,
    }))
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
