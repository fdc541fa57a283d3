use crate::{
    auth::{hash_password, AccessRule, CurrentUser},
    error::AppError,
    models::{NewUser, Role, UserSummary},
};
use actix_web::{get, post, web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// List users (admin)
///
/// Returns public summaries of every user, newest first. The password
/// digest never appears in the projection.
#[get("")]
pub async fn list_users(
    pool: web::Data<PgPool>,
    current_user: CurrentUser,
) -> Result<impl Responder, AppError> {
    AccessRule::RoleAtLeast(Role::Admin).check(&current_user, None)?;

    let users = sqlx::query_as::<_, UserSummary>(
        "SELECT id, name, email, role FROM users ORDER BY created_at DESC",
    )
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(users))
}

/// Provision a user (admin)
///
/// Emails are stored lowercased and must be unique; a duplicate yields a
/// 409. Any requested role other than `"admin"` provisions a member.
#[post("")]
pub async fn create_user(
    pool: web::Data<PgPool>,
    current_user: CurrentUser,
    user_data: web::Json<NewUser>,
) -> Result<impl Responder, AppError> {
    AccessRule::RoleAtLeast(Role::Admin).check(&current_user, None)?;
    user_data.validate()?;

    let email = user_data.email.trim().to_lowercase();

    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)",
    )
    .bind(&email)
    .fetch_one(&**pool)
    .await?;
    if exists {
        return Err(AppError::Conflict("Email already exists".into()));
    }

    let password_hash = hash_password(&user_data.password)?;

    let created = sqlx::query_as::<_, UserSummary>(
        "INSERT INTO users (id, name, email, role, password_hash) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, name, email, role",
    )
    .bind(Uuid::new_v4())
    .bind(user_data.name.trim())
    .bind(&email)
    .bind(user_data.requested_role())
    .bind(&password_hash)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(created))
}
