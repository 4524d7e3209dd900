pub mod extractors;
pub mod guard;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::UserResponse;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{issue_token, verify_token, Claims};

/// Payload for a signup request.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Email address for the new account. Uniqueness is case-sensitive as
    /// stored.
    #[validate(email)]
    pub email: String,
    /// Password for the new account, at least 8 characters.
    #[validate(length(min = 8, max = 100))]
    pub password: String,
}

/// Payload for a login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Response after successful signup or login: the public user record plus a
/// bearer token asserting it.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}
