//! Router assembly

use std::sync::Arc;

use auth::{AccountProvisioner, AuthConfig, AuthGate, UserRepository, auth_router_generic};
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::{Router, routing::get};
use growth::GrowthConfig;
use growth::domain::repository::{AccountRepository, RecordRepository};
use growth::growth_router_generic;
use platform::upload::UploadStore;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::services::ServeDir;

/// Everything the router needs
pub struct AppParts<U, G> {
    pub users: U,
    /// Growth store; also provisions default accounts at login
    pub growth: G,
    pub uploads: UploadStore,
    pub auth_config: Arc<AuthConfig>,
    pub growth_config: Arc<GrowthConfig>,
    pub max_upload_bytes: usize,
}

/// Build the application router
///
/// - `/api/...` auth and growth endpoints
/// - `/uploads/{file}` stored files
/// - `/health` liveness probe
pub fn build_app<U, G>(parts: AppParts<U, G>) -> Router
where
    U: UserRepository + Clone + Send + Sync + 'static,
    G: AccountRepository + RecordRepository + AccountProvisioner + Clone + Send + Sync + 'static,
{
    let gate = AuthGate::new(parts.auth_config.clone());

    let api = auth_router_generic(
        parts.users,
        parts.growth.clone(),
        parts.uploads.clone(),
        parts.auth_config,
    )
    .merge(growth_router_generic(
        parts.growth,
        parts.uploads.clone(),
        parts.growth_config,
        gate,
    ))
    .layer(DefaultBodyLimit::max(parts.max_upload_bytes));

    Router::new()
        .nest("/api", api)
        .nest_service(
            parts.uploads.url_prefix(),
            ServeDir::new(parts.uploads.root()),
        )
        .route("/health", get(|| async { "ok" }))
}

/// CORS for the configured frontend origins
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .expose_headers([
            header::HeaderName::from_static("x-total-count"),
            header::HeaderName::from_static("x-page-count"),
        ])
        .allow_credentials(true)
}
