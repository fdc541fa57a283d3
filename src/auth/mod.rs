pub mod extractors;
pub mod gate;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::UserSummary;

// Re-export necessary items
pub use extractors::CurrentUser;
pub use gate::AccessRule;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{generate_token, verify_token, Claims};

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address.
    /// Must be a valid email format. Matched case-insensitively.
    #[validate(email)]
    pub email: String,
    /// User's password.
    /// Must be at least 6 characters long.
    #[validate(length(min = 6))]
    pub password: String,
}

/// Response structure after successful authentication.
/// Contains the bearer token and the authenticated user's public identity.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The signed, time-bound bearer token.
    pub token: String,
    /// The authenticated user: id, name, email, role. Never the digest.
    pub user: UserSummary,
}
