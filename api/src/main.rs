use std::sync::Arc;

use actix_web::{middleware::Logger, App, HttpServer};
use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kb_api::middleware::cors::create_cors;
use kb_api::{configure_routes, AppState};
use kb_core::keyring::{KeySet, TokioScheduler};
use kb_core::repositories::InMemoryUserRepository;
use kb_core::services::{AuthService, AuthServiceConfig, TokenService, TokenServiceConfig};
use kb_shared::{AppConfig, LogFormat, LoggingConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("invalid configuration")?;
    init_tracing(&config.logging);

    info!(
        "Starting Knockbox authentication server ({})",
        config.environment
    );

    // Keyring timers run on this runtime for the life of the process
    let scheduler = TokioScheduler::current().context("key rotation scheduler")?;
    let keyring = KeySet::bootstrap(&config.keyring, Arc::new(scheduler))
        .context("failed to bootstrap signing keyring")?;

    let token_service = Arc::new(TokenService::new(
        keyring,
        TokenServiceConfig::from_settings(&config.token),
    ));
    let auth_service = Arc::new(AuthService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::clone(&token_service),
        AuthServiceConfig::from_settings(&config.token),
    ));
    let (state, token_data) = AppState::new(auth_service, token_service).into_app_data();

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let server_config = config.server.clone();
    let environment = config.environment;
    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(token_data.clone())
            .wrap(create_cors(&server_config, environment))
            .wrap(Logger::default())
            .configure(configure_routes::<InMemoryUserRepository>)
    })
    .shutdown_timeout(config.server.shutdown_timeout);

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;

    info!("Server stopped");
    Ok(())
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(logging.source_location)
        .with_line_number(logging.source_location);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}
