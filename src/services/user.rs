//! User service
//!
//! Business logic for user accounts:
//! - Registration with argon2id-hashed credentials
//! - Login, verifying the password and issuing a session token
//!
//! Plaintext passwords exist only inside these calls; they are never
//! stored or logged.

use crate::db::repositories::UserRepository;
use crate::models::User;
use crate::services::password::{hash_password, verify_password};
use crate::services::token::TokenService;
use anyhow::Context;
use std::sync::Arc;

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// No account with the given username
    #[error("User not found")]
    UserNotFound,

    /// Password did not match the stored hash
    #[error("Wrong password")]
    WrongPassword,

    /// Username already registered
    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// A successful login: the user plus their freshly issued token
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// Input for user registration
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub password: String,
}

impl RegisterInput {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Input for user login
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

impl LoginInput {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// User service for registration and authentication
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    token_service: TokenService,
}

impl UserService {
    /// Create a new user service
    pub fn new(user_repo: Arc<dyn UserRepository>, token_service: TokenService) -> Self {
        Self {
            user_repo,
            token_service,
        }
    }

    /// Register a new user.
    ///
    /// The password is hashed before it reaches the store. Duplicate
    /// usernames are detected through the store's UNIQUE constraint and
    /// translated into `UsernameTaken`.
    pub async fn register(&self, input: RegisterInput) -> Result<User, UserServiceError> {
        if input.username.trim().is_empty() {
            return Err(UserServiceError::ValidationError(
                "Username cannot be empty".to_string(),
            ));
        }
        if input.password.is_empty() {
            return Err(UserServiceError::ValidationError(
                "Password cannot be empty".to_string(),
            ));
        }

        let password_hash = hash_password(&input.password).context("Failed to hash password")?;

        let user = User::new(input.username.clone(), password_hash);

        match self.user_repo.create(&user).await {
            Ok(created) => {
                tracing::info!(user_id = created.id, username = %created.username, "user registered");
                Ok(created)
            }
            Err(e) if is_unique_violation(&e) => {
                Err(UserServiceError::UsernameTaken(input.username))
            }
            Err(e) => Err(UserServiceError::InternalError(
                e.context("Failed to create user"),
            )),
        }
    }

    /// Login with credentials.
    ///
    /// Looks the user up by username, verifies the password against the
    /// stored hash, and issues a session token on success.
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, UserServiceError> {
        let user = self
            .user_repo
            .get_by_username(&input.username)
            .await
            .context("Failed to look up user")?
            .ok_or(UserServiceError::UserNotFound)?;

        let password_valid = verify_password(&input.password, &user.password_hash)
            .context("Failed to verify password")?;

        if !password_valid {
            tracing::debug!(username = %input.username, "login rejected: wrong password");
            return Err(UserServiceError::WrongPassword);
        }

        let token = self
            .token_service
            .issue(user.id, &user.username)
            .map_err(|e| anyhow::anyhow!(e).context("Failed to issue token"))?;

        tracing::info!(user_id = user.id, username = %user.username, "user logged in");

        Ok(AuthSession { user, token })
    }
}

/// Check whether an error chain bottoms out in a UNIQUE constraint violation
fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<sqlx::Error>()
            .and_then(|e| e.as_database_error())
            .is_some_and(|db| db.is_unique_violation())
    })
}
