//! Business logic services
//!
//! Services sit between the API layer and the repositories. Each service
//! owns one concern: credentials, session tokens, or vehicle records.

pub mod password;
pub mod token;
pub mod user;
pub mod vehicle;

pub use token::{TokenClaims, TokenError, TokenService};
pub use user::{AuthSession, LoginInput, RegisterInput, UserService, UserServiceError};
pub use vehicle::{VehicleService, VehicleServiceError};
