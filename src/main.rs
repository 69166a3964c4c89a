//! Plateful payment service entrypoint.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use plateful::adapters::auth::JwtSessionValidator;
use plateful::adapters::http::middleware::{auth_middleware, AuthState};
use plateful::adapters::http::payments::handlers::health;
use plateful::adapters::http::{payment_routes, webhook_routes, PaymentsAppState};
use plateful::adapters::postgres::{
    PostgresOrderRepository, PostgresPaymentRepository, PostgresTransitionStore,
};
use plateful::adapters::stripe::bootstrap_provider;
use plateful::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .idle_timeout(config.database.idle_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    // A failed bootstrap leaves the payment endpoints answering 503 while the
    // rest of the service stays up.
    let provider = match bootstrap_provider(&config.payment) {
        Ok(runtime) => Some(Arc::new(runtime)),
        Err(err) => {
            tracing::error!(error = %err, "payment provider bootstrap failed, payment endpoints disabled");
            None
        }
    };

    let state = PaymentsAppState {
        orders: Arc::new(PostgresOrderRepository::new(pool.clone())),
        payments: Arc::new(PostgresPaymentRepository::new(pool.clone())),
        transitions: Arc::new(PostgresTransitionStore::new(pool.clone())),
        provider,
    };

    let validator: AuthState = Arc::new(JwtSessionValidator::new(&config.auth)?);

    let authed_payments = payment_routes().layer(axum::middleware::from_fn_with_state(
        validator,
        auth_middleware,
    ));

    let app = Router::new()
        .route("/health", get(health))
        .nest("/api/payments", authed_payments)
        .nest("/api/webhooks", webhook_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors_layer(&config));

    let addr = config.server.socket_addr();
    tracing::info!(%addr, "starting payment service");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any)
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install shutdown handler");
    }
    tracing::info!("shutdown signal received");
}
