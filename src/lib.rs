pub mod config;
pub mod db;
pub mod errors;
pub mod export;
mod http;
mod middleware;
pub mod models;
pub mod ratings;
pub mod state;
pub mod stats;
pub mod submission;

use std::{any::Any, net::SocketAddr, sync::Arc};

use axum::{
    Router,
    http::StatusCode,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
};
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use config::Config;
use db::{MemoryRatingStore, PgRatingStore, initialize_schema};
use errors::AppError;
use middleware::{cors_layer, create_rate_limiter, rate_limit_middleware};
use state::{AppState, SharedRatingStore};

pub async fn start_server() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()?;
    let store = open_store(&config).await?;
    let app = build_router(AppState::new(store), &config)?;

    let address = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Beer rating server running on {address}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shut down");

    Ok(())
}

/// Assemble the API with its middleware stack.
pub fn build_router(state: AppState, config: &Config) -> Result<Router, AppError> {
    let rate_limiter = create_rate_limiter(config.rate_limit_per_minute)?;

    let app = Router::new()
        .merge(http::create_http_routes(state))
        .fallback(|| async { (StatusCode::NOT_FOUND, "404 Not Found") })
        .layer(axum_middleware::from_fn(move |req, next| {
            rate_limit_middleware(rate_limiter.clone(), req, next)
        }))
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(panic_response))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config.allowed_origins)?),
        );

    Ok(app)
}

fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("Request handler panicked");
    AppError::InternalError.into_response()
}

async fn open_store(config: &Config) -> Result<SharedRatingStore, AppError> {
    match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to Postgres rating store...");

            let postgres = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await?;
            initialize_schema(&postgres).await?;

            Ok(Arc::new(PgRatingStore::new(postgres)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, ratings are kept in memory and lost on restart");

            Ok(Arc::new(MemoryRatingStore::new()))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }

        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
