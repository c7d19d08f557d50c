//! Growth Router

use auth::{AuthGate, require_bearer};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use platform::upload::UploadStore;
use std::sync::Arc;

use crate::application::config::GrowthConfig;
use crate::domain::repository::{AccountRepository, RecordRepository};
use crate::infra::postgres::PgGrowthRepository;
use crate::presentation::handlers::{self, GrowthAppState};

/// Create the Growth router with PostgreSQL repository
pub fn growth_router(
    repo: PgGrowthRepository,
    uploads: UploadStore,
    config: Arc<GrowthConfig>,
    gate: AuthGate,
) -> Router {
    growth_router_generic(repo, uploads, config, gate)
}

/// Create a generic Growth router for any repository implementation
///
/// Every route sits behind the bearer gate.
pub fn growth_router_generic<R>(
    repo: R,
    uploads: UploadStore,
    config: Arc<GrowthConfig>,
    gate: AuthGate,
) -> Router
where
    R: AccountRepository + RecordRepository + Clone + Send + Sync + 'static,
{
    let state = GrowthAppState {
        repo: Arc::new(repo),
        uploads: Arc::new(uploads),
        config,
    };

    Router::new()
        .route(
            "/accounts",
            get(handlers::list_accounts::<R>).post(handlers::create_account::<R>),
        )
        .route("/records", post(handlers::create_record::<R>))
        // GET takes an account id, PUT and DELETE a record id
        .route(
            "/records/{id}",
            get(handlers::list_records::<R>)
                .put(handlers::update_record::<R>)
                .delete(handlers::delete_record::<R>),
        )
        .route_layer(middleware::from_fn_with_state(gate, require_bearer))
        .with_state(state)
}
