//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use platform::upload::UploadStore;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{AccountProvisioner, UserRepository};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthGate, require_bearer};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router<P>(
    repo: PgAuthRepository,
    provisioner: P,
    uploads: UploadStore,
    config: Arc<AuthConfig>,
) -> Router
where
    P: AccountProvisioner + Clone + Send + Sync + 'static,
{
    auth_router_generic(repo, provisioner, uploads, config)
}

/// Create a generic Auth router for any repository implementation
///
/// `/register` and `/login` are public; `/profile` sits behind the bearer gate.
pub fn auth_router_generic<R, P>(
    repo: R,
    provisioner: P,
    uploads: UploadStore,
    config: Arc<AuthConfig>,
) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
    P: AccountProvisioner + Clone + Send + Sync + 'static,
{
    let gate = AuthGate::new(config.clone());
    let state = AuthAppState {
        repo: Arc::new(repo),
        provisioner: Arc::new(provisioner),
        uploads: Arc::new(uploads),
        config,
    };

    Router::new()
        .route(
            "/profile",
            get(handlers::get_profile::<R, P>).put(handlers::update_profile::<R, P>),
        )
        .route_layer(middleware::from_fn_with_state(gate, require_bearer))
        .route("/register", post(handlers::register::<R, P>))
        .route("/login", post(handlers::login::<R, P>))
        .with_state(state)
}
