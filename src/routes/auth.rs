use crate::{
    auth::{generate_token, verify_password, LoginRequest, LoginResponse},
    error::AppError,
    models::{User, UserSummary},
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Login
///
/// Authenticates by email and password and returns a bearer token together
/// with the user's public identity. An unknown email and a wrong password
/// produce the same rejection so accounts cannot be enumerated.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let email = login_data.email.trim().to_lowercase();

    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, role, password_hash, created_at, updated_at \
         FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(&**pool)
    .await?;

    let user = match user {
        Some(user) => user,
        None => return Err(AppError::Unauthenticated("Invalid credentials".into())),
    };

    if !verify_password(&login_data.password, &user.password_hash)? {
        return Err(AppError::Unauthenticated("Invalid credentials".into()));
    }

    let token = generate_token(user.id, user.role)?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        user: UserSummary::from(user),
    }))
}
