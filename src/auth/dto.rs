use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Measured in bytes of the UTF-8 encoding.
pub const MIN_PASSWORD_LENGTH: usize = 6;
/// Width of the `users.email` column, in characters.
pub const MAX_EMAIL_LENGTH: usize = 255;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned after registration; never carries the password hash.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: i64,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}
