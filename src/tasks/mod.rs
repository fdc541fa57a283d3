//!
//! # Task Engine
//!
//! Orchestrates the task lifecycle against the store: input validation,
//! ownership checks for member-level mutations, audit stamping of
//! `created_by`/`updated_by`, and the filtered, relevance-sorted, paginated
//! listing. Role checks for admin-only operations happen in the route layer
//! before these functions run; the ownership rule for the status update is
//! applied here because it needs the loaded task.

pub mod query;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{AccessRule, CurrentUser};
use crate::error::AppError;
use crate::models::{
    CreateTask, Role, StatusUpdate, TaskDetail, TaskListQuery, TaskPage, TaskPriority, TaskStatus,
    UpdateTask, UserSummary,
};

pub use query::ListScope;

/// Base SELECT joining the three audit references to their user rows.
const TASK_SELECT: &str = "\
    SELECT t.id, t.title, t.description, t.status, t.priority, t.due_date, \
           t.created_at, t.updated_at, \
           a.id AS assignee_id, a.name AS assignee_name, a.email AS assignee_email, a.role AS assignee_role, \
           c.id AS creator_id, c.name AS creator_name, c.email AS creator_email, c.role AS creator_role, \
           u.id AS updater_id, u.name AS updater_name, u.email AS updater_email, u.role AS updater_role \
      FROM tasks t \
      JOIN users a ON a.id = t.assigned_to \
      JOIN users c ON c.id = t.created_by \
      JOIN users u ON u.id = t.updated_by";

/// A task row flattened across the user joins.
#[derive(Debug, FromRow)]
struct TaskRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    assignee_id: Uuid,
    assignee_name: String,
    assignee_email: String,
    assignee_role: Role,
    creator_id: Uuid,
    creator_name: String,
    creator_email: String,
    creator_role: Role,
    updater_id: Uuid,
    updater_name: String,
    updater_email: String,
    updater_role: Role,
}

impl TaskRow {
    fn into_detail(self) -> TaskDetail {
        TaskDetail {
            id: self.id,
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            due_date: self.due_date,
            assigned_to: UserSummary {
                id: self.assignee_id,
                name: self.assignee_name,
                email: self.assignee_email,
                role: self.assignee_role,
            },
            created_by: UserSummary {
                id: self.creator_id,
                name: self.creator_name,
                email: self.creator_email,
                role: self.creator_role,
            },
            updated_by: UserSummary {
                id: self.updater_id,
                name: self.updater_name,
                email: self.updater_email,
                role: self.updater_role,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Filtered, sorted, paginated task listing.
///
/// The scope decides visibility: `All` sees everything, `Owner` is pinned
/// to the caller's assignments. A page past the last one yields empty
/// items with the correct `total`/`pages`, not an error.
pub async fn list_tasks(
    pool: &PgPool,
    scope: ListScope,
    params: &TaskListQuery,
) -> Result<TaskPage, AppError> {
    let filter = query::TaskFilter::from_query(params, &scope)?;
    let page = query::parse_page(&params.page);
    let limit = query::parse_limit(&params.limit, scope.default_limit());
    let offset = query::offset_for(page, limit);

    let parts = query::sql_parts(&filter);
    let select_sql = format!(
        "{} {} {} LIMIT ${} OFFSET ${}",
        TASK_SELECT,
        parts.where_sql,
        parts.order_sql,
        parts.params_used + 1,
        parts.params_used + 2
    );
    let count_sql = format!("SELECT count(*) FROM tasks t {}", parts.where_sql);

    let mut select = sqlx::query_as::<_, TaskRow>(&select_sql);
    if let Some(status) = filter.status {
        select = select.bind(status);
    }
    if let Some(priority) = filter.priority {
        select = select.bind(priority);
    }
    if let Some(assigned_to) = filter.assigned_to {
        select = select.bind(assigned_to);
    }
    if let Some(search) = &filter.search {
        select = select.bind(search.clone());
    }
    let rows = select.bind(limit).bind(offset).fetch_all(pool).await?;

    let mut count = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(status) = filter.status {
        count = count.bind(status);
    }
    if let Some(priority) = filter.priority {
        count = count.bind(priority);
    }
    if let Some(assigned_to) = filter.assigned_to {
        count = count.bind(assigned_to);
    }
    if let Some(search) = &filter.search {
        count = count.bind(search.clone());
    }
    let total = count.fetch_one(pool).await?;

    Ok(TaskPage {
        items: rows.into_iter().map(TaskRow::into_detail).collect(),
        page,
        limit,
        total,
        pages: query::pages_for(total, limit),
    })
}

/// Point lookup returning the expanded task, or 404.
pub async fn get_task(pool: &PgPool, task_id: Uuid) -> Result<TaskDetail, AppError> {
    let sql = format!("{} WHERE t.id = $1", TASK_SELECT);
    let row = sqlx::query_as::<_, TaskRow>(&sql)
        .bind(task_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    Ok(row.into_detail())
}

/// Creates a task on behalf of `actor`, stamping `created_by` and
/// `updated_by` to the creator. Status and priority default to `Todo` /
/// `Medium` when omitted.
pub async fn create_task(
    pool: &PgPool,
    actor: Uuid,
    input: CreateTask,
) -> Result<TaskDetail, AppError> {
    input.validate()?;
    ensure_assignee_exists(pool, input.assigned_to).await?;

    let task_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO tasks (id, title, description, assigned_to, status, priority, due_date, created_by, updated_by) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)",
    )
    .bind(task_id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.assigned_to)
    .bind(input.status.unwrap_or_default())
    .bind(input.priority.unwrap_or_default())
    .bind(input.due_date)
    .bind(actor)
    .execute(pool)
    .await?;

    get_task(pool, task_id).await
}

/// Partial update of a task: only supplied fields change, but the audit
/// stamp is always refreshed to the mutating actor.
pub async fn update_task(
    pool: &PgPool,
    actor: Uuid,
    task_id: Uuid,
    input: UpdateTask,
) -> Result<TaskDetail, AppError> {
    input.validate()?;
    if let Some(assignee) = input.assigned_to {
        ensure_assignee_exists(pool, assignee).await?;
    }

    let mut sets = vec!["updated_by = $1".to_string(), "updated_at = now()".to_string()];
    let mut param = 2;
    for (present, column) in [
        (input.title.is_some(), "title"),
        (input.description.is_some(), "description"),
        (input.assigned_to.is_some(), "assigned_to"),
        (input.status.is_some(), "status"),
        (input.priority.is_some(), "priority"),
        (input.due_date.is_some(), "due_date"),
    ] {
        if present {
            sets.push(format!("{} = ${}", column, param));
            param += 1;
        }
    }

    let sql = format!("UPDATE tasks SET {} WHERE id = ${}", sets.join(", "), param);
    let mut update = sqlx::query(&sql).bind(actor);
    if let Some(title) = &input.title {
        update = update.bind(title);
    }
    if let Some(description) = &input.description {
        update = update.bind(description);
    }
    if let Some(assigned_to) = input.assigned_to {
        update = update.bind(assigned_to);
    }
    if let Some(status) = input.status {
        update = update.bind(status);
    }
    if let Some(priority) = input.priority {
        update = update.bind(priority);
    }
    if let Some(due_date) = input.due_date {
        update = update.bind(due_date);
    }

    let result = update.bind(task_id).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found".into()));
    }

    get_task(pool, task_id).await
}

/// Member-facing status transition. Only the task's assignee may move it
/// (no admin bypass), any of the three statuses is reachable from any
/// other, and a repeated value still restamps `updated_by`/`updated_at`.
pub async fn update_status(
    pool: &PgPool,
    actor: &CurrentUser,
    task_id: Uuid,
    input: &StatusUpdate,
) -> Result<TaskDetail, AppError> {
    let status = TaskStatus::parse(&input.status)
        .ok_or_else(|| AppError::Validation("Invalid status".into()))?;

    let assigned_to = sqlx::query_scalar::<_, Uuid>("SELECT assigned_to FROM tasks WHERE id = $1")
        .bind(task_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    AccessRule::Owner.check(actor, Some(assigned_to))?;

    sqlx::query("UPDATE tasks SET status = $1, updated_by = $2, updated_at = now() WHERE id = $3")
        .bind(status)
        .bind(actor.id)
        .bind(task_id)
        .execute(pool)
        .await?;

    get_task(pool, task_id).await
}

/// Permanent removal; 404 when the task is already gone.
pub async fn delete_task(pool: &PgPool, task_id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(task_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found".into()));
    }
    Ok(())
}

/// Every task write must point its assignee at a real user.
async fn ensure_assignee_exists(pool: &PgPool, user_id: Uuid) -> Result<(), AppError> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    if exists {
        Ok(())
    } else {
        Err(AppError::Validation(
            "assignedTo does not reference an existing user".into(),
        ))
    }
}
