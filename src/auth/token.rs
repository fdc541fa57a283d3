use crate::error::AppError;
use crate::models::Role;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the claims encoded within a bearer token.
///
/// The embedded role is informational only: the auth middleware re-fetches
/// the current user record on every request, so a stale role never grants
/// access after it has been revoked.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's id.
    pub sub: Uuid,
    /// The user's role at issuance time.
    pub role: Role,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Generates a signed bearer token for a user.
///
/// The token expires in 24 hours and is signed with the `JWT_SECRET`
/// environment variable.
///
/// # Returns
/// The encoded token string, or `AppError::Internal` if `JWT_SECRET` is not
/// set or encoding fails.
pub fn generate_token(user_id: Uuid, role: Role) -> Result<String, AppError> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::hours(24))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id,
        role,
        exp: expiration,
    };

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal("JWT_SECRET not set".into()))?;

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

/// Verifies a bearer token and decodes its claims.
///
/// Fails closed: a malformed payload, invalid signature, or expired token
/// all produce the same `AppError::Unauthenticated` without revealing which
/// check failed.
pub fn verify_token(token: &str) -> Result<Claims, AppError> {
    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal("JWT_SECRET not set".into()))?;
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)?;
    Ok(claims)
}
