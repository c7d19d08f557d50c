//! Auth Middleware
//!
//! Bearer-token gate for protected routes, and the extractor handlers use
//! to learn who is calling.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use kernel::id::UserId;
use platform::token::{BearerToken, extract_bearer};
use std::sync::Arc;

use crate::application::access_token::verify_access_token;
use crate::application::config::AuthConfig;
use crate::error::AuthError;

/// Middleware state
#[derive(Clone, Debug)]
pub struct AuthGate {
    config: Arc<AuthConfig>,
}

impl AuthGate {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }
}

/// Identity of the caller, inserted by [`require_bearer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub user_name: String,
}

/// Middleware that requires a valid bearer token
///
/// - no `Authorization: Bearer` header → 401
/// - bad signature, malformed or expired token → 403
pub async fn require_bearer(
    State(gate): State<AuthGate>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = match extract_bearer(req.headers()) {
        BearerToken::Present(token) => token,
        BearerToken::Missing => return Err(AuthError::MissingToken),
    };

    let now = chrono::Utc::now().timestamp();
    let claims = verify_access_token(&gate.config, token, now)?;

    req.extensions_mut().insert(CurrentUser {
        user_id: claims.sub,
        user_name: claims.username,
    });

    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::access_token::issue_access_token;
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use axum::routing::get;
    use axum::{Router, middleware};
    use tower::ServiceExt;

    async fn whoami(user: CurrentUser) -> String {
        format!("{}:{}", user.user_id, user.user_name)
    }

    fn app(config: Arc<AuthConfig>) -> Router {
        Router::new()
            .route("/me", get(whoami))
            .route_layer(middleware::from_fn_with_state(
                AuthGate::new(config),
                require_bearer,
            ))
            .route("/open", get(whoami))
    }

    fn request(uri: &str, authorization: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler() {
        let config = Arc::new(AuthConfig::development());
        let now = chrono::Utc::now().timestamp();
        let token = issue_access_token(&config, UserId::from_i64(5), "hanako", now).unwrap();

        let response = app(config)
            .oneshot(request("/me", Some(&format!("Bearer {token}"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "5:hanako");
    }

    #[tokio::test]
    async fn test_missing_token_is_401() {
        let config = Arc::new(AuthConfig::development());

        let response = app(config.clone())
            .oneshot(request("/me", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app(config)
            .oneshot(request("/me", Some("Basic Zm9vOmJhcg==")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_bad_or_expired_token_is_403() {
        let config = Arc::new(AuthConfig::development());
        let expired =
            issue_access_token(&config, UserId::from_i64(5), "hanako", 1_000).unwrap();

        for auth in [
            "Bearer not-a-token".to_string(),
            format!("Bearer {expired}"),
        ] {
            let response = app(config.clone())
                .oneshot(request("/me", Some(&auth)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::FORBIDDEN);

            let body: serde_json::Value =
                serde_json::from_str(&body_text(response).await).unwrap();
            assert_eq!(body["error"], "Invalid or expired token");
        }
    }

    #[tokio::test]
    async fn test_extractor_without_gate_is_401() {
        let config = Arc::new(AuthConfig::development());
        let response = app(config).oneshot(request("/open", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
