use crate::{
    auth::{AccessRule, CurrentUser},
    error::AppError,
    models::{CreateTask, Role, StatusUpdate, TaskListQuery, UpdateTask},
    tasks::{self, ListScope},
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

/// List all tasks (admin)
///
/// Paginated listing across every user, with optional `status`,
/// `priority`, `assignedTo`, and full-text `search` filters. Supplying the
/// sentinel value `All` for a filter is the same as omitting it.
///
/// ## Query Parameters:
/// - `page` (optional, default 1) and `limit` (optional, default 10):
///   non-numeric or non-positive values fall back to the defaults.
/// - `status` / `priority` (optional): exact enum spellings; anything else
///   is rejected with a 400.
/// - `assignedTo` (optional): a user id.
/// - `search` (optional): relevance-ranked match over title/description.
///
/// ## Responses:
/// - `200 OK`: `{items, page, limit, total, pages}` envelope.
/// - `401 Unauthorized` / `403 Forbidden` for missing credentials or a
///   non-admin caller.
#[get("")]
pub async fn list_tasks(
    pool: web::Data<PgPool>,
    current_user: CurrentUser,
    params: web::Query<TaskListQuery>,
) -> Result<impl Responder, AppError> {
    AccessRule::RoleAtLeast(Role::Admin).check(&current_user, None)?;

    let page = tasks::list_tasks(&pool, ListScope::All, &params).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// List own tasks (any authenticated user)
///
/// Same shape as the admin listing, but the assignee filter is forced to
/// the caller regardless of supplied parameters, and the default page size
/// is 20.
#[get("/my")]
pub async fn my_tasks(
    pool: web::Data<PgPool>,
    current_user: CurrentUser,
    params: web::Query<TaskListQuery>,
) -> Result<impl Responder, AppError> {
    let scope = ListScope::Owner(current_user.id);
    let page = tasks::list_tasks(&pool, scope, &params).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Create a task (admin)
///
/// Validates the title/description bounds and that `assignedTo` references
/// an existing user. `createdBy` and `updatedBy` are both stamped to the
/// creator; status and priority default to `Todo` / `Medium`.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    current_user: CurrentUser,
    task_data: web::Json<CreateTask>,
) -> Result<impl Responder, AppError> {
    AccessRule::RoleAtLeast(Role::Admin).check(&current_user, None)?;

    let task = tasks::create_task(&pool, current_user.id, task_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Fetch a single task
///
/// Admins may read any task; a member may only read a task assigned to
/// them.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    current_user: CurrentUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = tasks::get_task(&pool, task_id.into_inner()).await?;
    AccessRule::OwnerOrRole(Role::Admin).check(&current_user, Some(task.assigned_to.id))?;
    Ok(HttpResponse::Ok().json(task))
}

/// Update a task (admin)
///
/// Partial update: only supplied fields change. `updatedBy`/`updatedAt`
/// are restamped on every successful call.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    current_user: CurrentUser,
    task_id: web::Path<Uuid>,
    task_data: web::Json<UpdateTask>,
) -> Result<impl Responder, AppError> {
    AccessRule::RoleAtLeast(Role::Admin).check(&current_user, None)?;

    let task = tasks::update_task(
        &pool,
        current_user.id,
        task_id.into_inner(),
        task_data.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Update a task's status (assignee)
///
/// Only the assigned user may progress a task; admins get no bypass. The
/// status value must be one of the three enumerated spellings.
#[patch("/{id}/status")]
pub async fn update_status(
    pool: web::Data<PgPool>,
    current_user: CurrentUser,
    task_id: web::Path<Uuid>,
    body: web::Json<StatusUpdate>,
) -> Result<impl Responder, AppError> {
    let task =
        tasks::update_status(&pool, &current_user, task_id.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Delete a task (admin)
///
/// Permanent removal; responds with an acknowledgment body.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    current_user: CurrentUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    AccessRule::RoleAtLeast(Role::Admin).check(&current_user, None)?;

    tasks::delete_task(&pool, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}
