//! API middleware
//!
//! Contains the shared application state, the API error type, and the
//! authentication gate that protects the vehicle routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::services::{
    TokenClaims, TokenService, UserService, UserServiceError, VehicleService, VehicleServiceError,
};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub vehicle_service: Arc<VehicleService>,
    pub token_service: TokenService,
    pub upload_config: Arc<crate::config::UploadConfig>,
}

/// Authenticated identity extracted from a verified session token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub TokenClaims);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("No token"))
    }
}

/// Error response for API errors.
///
/// Serializes as `{"error": "<message>"}` with the matching status code.
/// Internal failures are logged server-side and surfaced with a generic
/// message only.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            error: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Log the underlying failure and return a generic 500
    pub fn internal_error(err: impl std::fmt::Display) -> Self {
        tracing::error!("internal error: {}", err);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<UserServiceError> for ApiError {
    fn from(e: UserServiceError) -> Self {
        match e {
            UserServiceError::UserNotFound => ApiError::bad_request("User not found"),
            UserServiceError::WrongPassword => ApiError::bad_request("Wrong password"),
            UserServiceError::UsernameTaken(_) | UserServiceError::ValidationError(_) => {
                ApiError::bad_request(e.to_string())
            }
            UserServiceError::InternalError(err) => ApiError::internal_error(err),
        }
    }
}

impl From<VehicleServiceError> for ApiError {
    fn from(e: VehicleServiceError) -> Self {
        match e {
            VehicleServiceError::ValidationError(_) => ApiError::bad_request(e.to_string()),
            VehicleServiceError::InternalError(err) => ApiError::internal_error(err),
        }
    }
}

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

/// Authentication middleware.
///
/// Verifies the bearer token and attaches the decoded identity to the
/// request. Rejects with 401 when the header is missing or the token does
/// not verify.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token =
        extract_bearer_token(&request).ok_or_else(|| ApiError::unauthorized("No token"))?;

    let claims = state
        .token_service
        .verify(&token)
        .map_err(|_| ApiError::unauthorized("Invalid token"))?;

    request.extensions_mut().insert(AuthenticatedUser(claims));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with_auth(value: &str) -> Request<Body> {
        Request::builder()
            .uri("/test")
            .header(header::AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_extract_bearer_token() {
        let request = request_with_auth("Bearer test-token-123");
        assert_eq!(
            extract_bearer_token(&request),
            Some("test-token-123".to_string())
        );
    }

    #[test]
    fn test_extract_bearer_token_none() {
        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();
        assert!(extract_bearer_token(&request).is_none());
    }

    #[test]
    fn test_extract_bearer_token_wrong_scheme() {
        let request = request_with_auth("Basic dXNlcjpwYXNz");
        assert!(extract_bearer_token(&request).is_none());
    }

    #[test]
    fn test_api_error_body_shape() {
        let error = ApiError::unauthorized("No token");
        let json = serde_json::to_value(&error).unwrap();

        assert_eq!(json, serde_json::json!({"error": "No token"}));
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let error = ApiError::internal_error("connection refused (127.0.0.1:5432)");
        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.error, "Internal server error");
    }

    #[test]
    fn test_user_service_error_mapping() {
        let error: ApiError = UserServiceError::UserNotFound.into();
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(error.error, "User not found");

        let error: ApiError = UserServiceError::WrongPassword.into();
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(error.error, "Wrong password");

        let error: ApiError = UserServiceError::UsernameTaken("a".to_string()).into();
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
    }
}
