use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Tokens are valid for 7 days from issue. There is no revocation list and
/// no refresh flow: a token keeps working for its whole window regardless of
/// what happens to the account in the meantime.
const TOKEN_TTL_DAYS: i64 = 7;

/// Claims carried in the bearer token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the stringified numeric id of the authenticated user.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Mints a signed token asserting `user_id` as its subject.
///
/// The signing secret is process-wide configuration, passed in from the
/// injected [`crate::config::Config`]; nothing here reads the environment.
pub fn issue_token(user_id: i32, secret: &str) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expiration = now + chrono::Duration::days(TOKEN_TTL_DAYS);

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: expiration.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
}

/// Validates signature and expiration and returns the claims.
///
/// Every failure mode (malformed token, bad signature, expired token,
/// missing subject, or a token signed under a different secret) collapses
/// into the same 401. A "valid but foreign" token is indistinguishable from
/// an invalid one and must not be told apart in the response.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid or expired authentication token".into()))
}
