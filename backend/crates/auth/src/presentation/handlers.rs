//! HTTP Handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use platform::multipart::read_form;
use platform::upload::UploadStore;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    GetProfileUseCase, LoginInput, LoginUseCase, RegisterInput, RegisterUseCase,
    UpdateProfileInput, UpdateProfileUseCase,
};
use crate::domain::repository::{AccountProvisioner, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UpdateProfileResponse,
    UserResponse,
};
use crate::presentation::middleware::CurrentUser;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R, P>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    P: AccountProvisioner + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub provisioner: Arc<P>,
    pub uploads: Arc<UploadStore>,
    pub config: Arc<AuthConfig>,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AuthResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AuthError::Validation(rejection.body_text()))
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/register
pub async fn register<R, P>(
    State(state): State<AuthAppState<R, P>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AuthResult<(StatusCode, Json<RegisterResponse>)>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    P: AccountProvisioner + Clone + Send + Sync + 'static,
{
    let req = json_body(payload)?;
    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(RegisterInput {
            user_name: req.username,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user_id: output.user_id,
        }),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/login
pub async fn login<R, P>(
    State(state): State<AuthAppState<R, P>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<Json<LoginResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    P: AccountProvisioner + Clone + Send + Sync + 'static,
{
    let req = json_body(payload)?;
    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.provisioner.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(LoginInput {
            user_name: req.username,
            password: req.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        token: output.token,
        user: UserResponse::from(&output.user),
    }))
}

// ============================================================================
// Profile (requires authentication)
// ============================================================================

/// GET /api/profile
pub async fn get_profile<R, P>(
    State(state): State<AuthAppState<R, P>>,
    current: CurrentUser,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    P: AccountProvisioner + Clone + Send + Sync + 'static,
{
    let user = GetProfileUseCase::new(state.repo.clone())
        .execute(current.user_id)
        .await?;

    Ok(Json(UserResponse::from(&user)))
}

/// PUT /api/profile (multipart: username, email, avatar?)
pub async fn update_profile<R, P>(
    State(state): State<AuthAppState<R, P>>,
    current: CurrentUser,
    multipart: Multipart,
) -> AuthResult<Json<UpdateProfileResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    P: AccountProvisioner + Clone + Send + Sync + 'static,
{
    let mut form = read_form(multipart, "avatar").await?;

    let input = UpdateProfileInput {
        user_name: form.text("username").unwrap_or_default().to_string(),
        email: form.text("email").unwrap_or_default().to_string(),
        avatar: form.take_file(),
    };

    let user = UpdateProfileUseCase::new(state.repo.clone(), state.uploads.clone())
        .execute(current.user_id, input)
        .await?;

    Ok(Json(UpdateProfileResponse {
        message: "Profile updated successfully".to_string(),
        user: UserResponse::from(&user),
    }))
}
