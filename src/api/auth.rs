//! Authentication API endpoints
//!
//! - POST /api/register - User registration
//! - POST /api/login - User login
//!
//! Both routes are public; everything else sits behind the auth gate.

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{OkResponse, TokenResponse};
use crate::services::{LoginInput, RegisterInput};

/// Request body for registration and login
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Build the public auth router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// POST /api/register - User registration
async fn register(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    state
        .user_service
        .register(RegisterInput::new(body.username, body.password))
        .await?;

    Ok(Json(OkResponse::new()))
}

/// POST /api/login - User login
///
/// Returns a session token valid for the configured lifetime.
async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let session = state
        .user_service
        .login(LoginInput::new(body.username, body.password))
        .await?;

    Ok(Json(TokenResponse {
        token: session.token,
    }))
}
