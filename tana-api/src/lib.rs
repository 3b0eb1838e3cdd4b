//! # tana-api: credentials, profiles and reference lookups
//!
//! `tana-api` is a small HTTP service over PostgreSQL. Authenticated users manage their own API
//! credentials (a random key plus a secret shown only once, at most
//! [`credentials.max_per_user`](config::CredentialsConfig) live at a time), read and partially
//! update their own profile, and anyone can read the static `mmlu` reference table.
//!
//! ## Architecture
//!
//! The HTTP layer is [Axum](https://github.com/tokio-rs/axum). Every request that needs an
//! identity extracts a [`Session`](auth::session::Session) from its bearer token before the
//! handler body runs, so rejected requests never reach storage. Handlers talk to a
//! [`Store`](db::store::Store) held in [`AppState`]:
//!
//! - [`PgStore`](db::store::PgStore) drives the repositories in [`db::handlers`] over a
//!   `sqlx` connection pool. Credential creation locks the owner's user row, counts live
//!   credentials and inserts in one transaction, so concurrent requests cannot overshoot the
//!   quota.
//! - [`InMemoryStore`](db::store::InMemoryStore) keeps rows in process memory. It backs the test
//!   suite and `database.type: memory` development runs.
//!
//! Credentials and users are soft-deleted (`deleted_at`); every read filters on live rows.
//!
//! ## Configuration
//!
//! See [`config`] for the YAML file and `TANA_`-prefixed environment overrides. A
//! `secret_key` of at least 16 bytes is required to sign and verify session tokens.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tana_api::{Application, Config, telemetry};
//! use tana_api::config::Args;
//! use clap::Parser;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = Args::parse();
//!     let config = Config::load(&args)?;
//!     telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.ok();
//!     })
//!     .await
//! }
//! ```
//!
//! ## Modules
//!
//! - [`api`]: HTTP handlers, request/response models and field validation
//! - [`auth`]: session tokens and the bearer-token extractor
//! - [`db`]: repositories, storage backends and database models
//! - [`config`]: configuration loading and validation
//! - [`errors`]: the API error type and its HTTP mapping
//! - [`telemetry`]: tracing and optional OTLP export

pub mod api;
pub mod auth;
pub mod config;
pub mod crypto;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use crate::config::{CorsOrigin, DatabaseConfig, PoolSettings};
use crate::db::store::{InMemoryStore, PgStore, Store};
use crate::openapi::ApiDoc;
use axum::http::{self, HeaderValue, Method};
use axum::{
    Router,
    routing::{get, post},
};
use bon::Builder;
pub use config::Config;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info, instrument, warn};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{CredentialId, MmluId, UserId};

/// Shared state handed to every handler.
#[derive(Clone, Builder)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Config,
}

/// Get the tana-api database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Connect to PostgreSQL with the configured pool settings and run pending migrations.
#[instrument(skip(url, settings), err)]
async fn setup_database(url: &str, settings: &PoolSettings) -> anyhow::Result<PgPool> {
    let non_zero = |secs: u64| (secs > 0).then(|| Duration::from_secs(secs));

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .idle_timeout(non_zero(settings.idle_timeout_secs))
        .max_lifetime(non_zero(settings.max_lifetime_secs))
        .connect(url)
        .await?;

    migrator().run(&pool).await?;
    info!("Database migrations applied");

    Ok(pool)
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors_config = &config.auth.security.cors;

    let allow_origin = if cors_config.allowed_origins.iter().any(|o| matches!(o, CorsOrigin::Wildcard)) {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in &cors_config.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                // Origins never carry a trailing slash
                origins.push(url.as_str().trim_end_matches('/').parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([http::header::AUTHORIZATION, http::header::CONTENT_TYPE])
        .allow_credentials(cors_config.allow_credentials);

    if let Some(max_age) = cors_config.max_age {
        cors = cors.max_age(Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router.
///
/// Resource routes live under `api_prefix` (served at the root when it is empty). `/healthz`
/// and the `/docs` UI are always at the root.
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    use api::handlers::{credentials, health, mmlu, users};

    let resource_routes = Router::new()
        .route("/credentials", get(credentials::list_credentials))
        .route("/credentials/generate", post(credentials::generate_credential))
        .route(
            "/credentials/{id}",
            get(credentials::get_credential).delete(credentials::delete_credential),
        )
        .route("/users/me", get(users::get_me).patch(users::update_me))
        .route("/mmlu", get(mmlu::list_mmlu))
        .route("/mmlu/{id}", get(mmlu::get_mmlu))
        .route("/reference", get(mmlu::list_reference))
        .route("/reference/{id}", get(mmlu::get_reference));

    let api_prefix = state.config.api_prefix.clone();
    let cors_layer = create_cors_layer(&state.config)?;

    let root = Router::new().route("/healthz", get(health::healthz));
    let router = if api_prefix.is_empty() {
        root.merge(resource_routes)
    } else {
        root.nest(&api_prefix, resource_routes)
    };

    let router = router
        .with_state(state)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .layer(cors_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    Ok(router)
}

/// The assembled service: router, configuration and, for PostgreSQL, the pool to close on
/// shutdown.
///
/// ```text
/// Application::new(config) -> app.serve(shutdown_signal) -> pool closed, spans flushed
/// ```
pub struct Application {
    router: Router,
    config: Config,
    pool: Option<PgPool>,
}

impl Application {
    /// Connect the configured store (running migrations for PostgreSQL) and build the router.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let (store, pool): (Arc<dyn Store>, Option<PgPool>) = match &config.database {
            DatabaseConfig::Memory => {
                warn!("Using the in-memory store: all data is lost on shutdown");
                (Arc::new(InMemoryStore::new()), None)
            }
            DatabaseConfig::External { url, pool } => {
                let pg = setup_database(url, pool).await?;
                (Arc::new(PgStore::new(pg.clone())), Some(pg))
            }
        };

        Self::with_store(config, store, pool)
    }

    /// Build around an existing store. `pool`, if given, is closed when serving ends.
    pub fn with_store(config: Config, store: Arc<dyn Store>, pool: Option<PgPool>) -> anyhow::Result<Self> {
        let app_state = AppState::builder().store(store).config(config.clone()).build();
        let router = build_router(app_state)?;

        Ok(Self { router, config, pool })
    }

    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service()).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("tana-api listening on http://{}", listener.local_addr()?);

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        if let Some(pool) = self.pool {
            info!("Closing database connections...");
            pool.close().await;
        }

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
