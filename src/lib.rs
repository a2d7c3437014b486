//! # hostlink
//!
//! Backend for a small hospitality platform: hosts register an account,
//! manage their property portfolio, and share a single tokenised "guest view"
//! link that shows their listings to guests without any login.
//!
//! The crate is organised in three layers:
//!
//! - [`api`]: HTTP handlers and request/response models (axum + utoipa)
//! - [`auth`]: password hashing, session tokens, request authentication and
//!   the single-owner access rule
//! - [`db`]: sqlx repositories over PostgreSQL
//!
//! # Example
//!
//! ```no_run
//! use hostlink::{config::{Args, Config}, Application};
//! use clap::Parser;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = Args::parse();
//!     let config = Config::load(&args)?;
//!     let app = Application::new(config).await?;
//!     // Run with graceful shutdown on Ctrl+C
//!     app.serve(async { tokio::signal::ctrl_c().await.unwrap() }).await
//! }
//! ```
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use crate::{
    auth::password,
    config::CorsOrigin,
    db::handlers::{GuestviewTokens, Properties, Repository, Users},
    db::models::{properties::PropertyCreateDBRequest, users::UserCreateDBRequest},
    openapi::ApiDoc,
};
use axum::http::HeaderValue;
use axum::{
    http,
    routing::{get, post},
    Router,
};
use bon::Builder;
pub use config::Config;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, info, instrument, Level};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{GuestviewTokenId, PropertyId, UserId};

/// Application state shared across all request handlers.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .db(pool)
///     .config(config)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the hostlink database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Demo portfolio created alongside the demo account.
const DEMO_PROPERTIES: [(&str, &str, &str); 3] = [
    (
        "Boutique Hotel Alpenblick",
        "Family-run hotel with twelve rooms and a view of the Zugspitze.",
        "Alpspitzstraße 12, 82467 Garmisch-Partenkirchen",
    ),
    (
        "Ferienwohnung Seeblick",
        "Bright two-room apartment a short walk from the harbour.",
        "Uferweg 3, 88131 Lindau",
    ),
    (
        "Stadtapartment München City",
        "Compact apartment near Marienplatz, ideal for city trips.",
        "Müllerstraße 8, 80469 München",
    ),
];

/// Seed the demo account if it does not exist yet.
///
/// Creates the demo host, a small sample portfolio and the well-known
/// guestview token, all in one transaction. If the demo user already exists
/// nothing is written, so repeated startups leave earlier demo data alone.
#[instrument(skip_all, err)]
pub async fn ensure_demo_data(config: &Config, db: &PgPool) -> anyhow::Result<()> {
    let mut tx = db.begin().await?;

    if Users::new(&mut tx).get_user_by_email(&config.demo.email).await?.is_some() {
        debug!("Demo user already exists, skipping demo data seeding");
        return Ok(());
    }

    let password_hash = password::hash_string(&config.demo.password)?;
    let user = Users::new(&mut tx)
        .create(&UserCreateDBRequest {
            email: config.demo.email.clone(),
            name: Some(config.demo.name.clone()),
            password_hash,
            is_demo: true,
        })
        .await?;

    GuestviewTokens::new(&mut tx)
        .rotate_for_user_with_token(user.id, &config.demo.guestview_token)
        .await?;

    for (name, description, address) in DEMO_PROPERTIES {
        Properties::new(&mut tx)
            .create(&PropertyCreateDBRequest {
                user_id: user.id,
                name: name.to_string(),
                description: Some(description.to_string()),
                address: Some(address.to_string()),
            })
            .await?;
    }

    tx.commit().await?;
    info!(email = %config.demo.email, "Created demo user and sample properties");
    Ok(())
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.auth.security.cors.allowed_origins {
        let header_value = match origin {
            CorsOrigin::Wildcard => "*".parse::<HeaderValue>()?,
            CorsOrigin::Url(url) => url.as_str().parse::<HeaderValue>()?,
        };
        origins.push(header_value);
    }

    let mut cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(config.auth.security.cors.allow_credentials)
        .allow_methods(vec![
            http::Method::GET,
            http::Method::POST,
            http::Method::PATCH,
            http::Method::DELETE,
        ])
        .allow_headers(vec![http::header::AUTHORIZATION, http::header::CONTENT_TYPE])
        .expose_headers(vec![http::header::LOCATION]);

    if let Some(max_age) = config.auth.security.cors.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router with all endpoints and middleware.
///
/// Routes live under `/api`, with a health probe at `/healthz` and interactive
/// API docs at `/docs`.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let api_routes = Router::new()
        .route("/auth/register", post(api::handlers::auth::register))
        .route("/auth/login", post(api::handlers::auth::login))
        .route("/auth/magic-link", post(api::handlers::auth::magic_link))
        .route("/auth/me", get(api::handlers::auth::me))
        .route(
            "/properties",
            get(api::handlers::properties::list_properties).post(api::handlers::properties::create_property),
        )
        .route(
            "/properties/{id}",
            get(api::handlers::properties::get_property)
                .patch(api::handlers::properties::update_property)
                .delete(api::handlers::properties::delete_property),
        )
        .route("/guestview-token", post(api::handlers::guestview::rotate_guestview_token))
        .route("/guestview/{token}", get(api::handlers::guestview::get_guest_view));

    let cors_layer = create_cors_layer(&state.config)?;

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/api", api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    Ok(router)
}

/// The running application: connection pool, router and configuration.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] connects to the database, runs
///    migrations and seeds the demo account when enabled
/// 2. **Serve**: [`Application::serve`] binds a TCP port and handles requests
///    until the shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting hostlink with configuration: {:#?}", config);

        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(config.database.acquire_timeout)
            .connect(&config.database.url)
            .await?;
        migrator().run(&pool).await?;

        if config.demo.enabled {
            ensure_demo_data(&config, &pool).await?;
        }

        let state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(state)?;

        Ok(Self { router, config, pool })
    }

    /// Build an application on an existing pool. Migrations and demo seeding
    /// are assumed to have run already.
    pub fn with_pool(config: Config, pool: PgPool) -> anyhow::Result<Self> {
        let state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(state)?;
        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "hostlink listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}
