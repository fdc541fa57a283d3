use uuid::Uuid;

use crate::error::AppError;
use crate::models::{TaskListQuery, TaskPriority, TaskStatus};

/// Visibility scope of a task listing: everything (admin listing) or only
/// the tasks assigned to one user (member self-listing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    All,
    Owner(Uuid),
}

impl ListScope {
    /// Admin listings default to 10 rows per page, self listings to 20.
    pub fn default_limit(&self) -> i64 {
        match self {
            ListScope::All => 10,
            ListScope::Owner(_) => 20,
        }
    }
}

/// The parsed, trusted form of a task listing's filter parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<Uuid>,
    pub search: Option<String>,
}

impl TaskFilter {
    /// Builds a filter from untrusted query parameters.
    ///
    /// Missing values and the `"All"` sentinel mean "no filter". Anything
    /// else must parse exactly; unknown enum values and malformed ids are
    /// rejected rather than silently matching nothing. Under an `Owner`
    /// scope the assignee filter is forced to the caller's id regardless of
    /// what was supplied.
    pub fn from_query(query: &TaskListQuery, scope: &ListScope) -> Result<Self, AppError> {
        let status = match effective(&query.status) {
            None => None,
            Some(raw) => Some(
                TaskStatus::parse(raw)
                    .ok_or_else(|| AppError::Validation("Invalid status".into()))?,
            ),
        };

        let priority = match effective(&query.priority) {
            None => None,
            Some(raw) => Some(
                TaskPriority::parse(raw)
                    .ok_or_else(|| AppError::Validation("Invalid priority".into()))?,
            ),
        };

        let assigned_to = match scope {
            ListScope::Owner(id) => Some(*id),
            ListScope::All => match effective(&query.assigned_to) {
                None => None,
                Some(raw) => Some(Uuid::parse_str(raw).map_err(|_| {
                    AppError::Validation("assignedTo must be a valid user id".into())
                })?),
            },
        };

        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        Ok(Self {
            status,
            priority,
            assigned_to,
            search,
        })
    }
}

/// A raw parameter value after sentinel handling: `None`, empty, and
/// `"All"` all mean "not filtered".
fn effective(raw: &Option<String>) -> Option<&str> {
    raw.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "All")
}

/// Parses a 1-based page number from untrusted input. Non-numeric or
/// non-positive values fall back to 1 instead of erroring.
pub fn parse_page(raw: &Option<String>) -> i64 {
    parse_positive(raw).unwrap_or(1)
}

/// Parses a page size from untrusted input, falling back to the scope's
/// default.
pub fn parse_limit(raw: &Option<String>, default: i64) -> i64 {
    parse_positive(raw).unwrap_or(default)
}

fn parse_positive(raw: &Option<String>) -> Option<i64> {
    raw.as_deref()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
}

/// Row offset for a 1-based page. Saturates instead of overflowing so an
/// absurdly large page number lands past the data and yields an empty
/// page, never a negative OFFSET.
pub fn offset_for(page: i64, limit: i64) -> i64 {
    page.saturating_sub(1).saturating_mul(limit)
}

/// Total page count: `ceil(total / limit)`, never less than 1 so an empty
/// result still reports one (empty) page.
pub fn pages_for(total: i64, limit: i64) -> i64 {
    std::cmp::max(1, (total + limit - 1) / limit)
}

/// Full-text match over title and description.
const SEARCH_MATCH: &str =
    "to_tsvector('english', t.title || ' ' || coalesce(t.description, '')) \
     @@ plainto_tsquery('english', ${n})";

/// Relevance ranking for the same expression.
const SEARCH_RANK: &str =
    "ts_rank(to_tsvector('english', t.title || ' ' || coalesce(t.description, '')), \
     plainto_tsquery('english', ${n}))";

/// WHERE and ORDER BY fragments for a listing, with `$n` placeholders
/// assigned in the canonical bind order: status, priority, assignee,
/// search term.
#[derive(Debug, PartialEq, Eq)]
pub struct SqlParts {
    pub where_sql: String,
    pub order_sql: String,
    /// Number of placeholders consumed; LIMIT/OFFSET continue from here.
    pub params_used: usize,
}

/// Renders the filter into SQL fragments.
///
/// When a search term is active the primary order is descending relevance;
/// `updated_at DESC` follows, and `id` breaks remaining ties so rows never
/// repeat or vanish across page boundaries.
pub fn sql_parts(filter: &TaskFilter) -> SqlParts {
    let mut conditions: Vec<String> = Vec::new();
    let mut param = 1;

    if filter.status.is_some() {
        conditions.push(format!("t.status = ${}", param));
        param += 1;
    }
    if filter.priority.is_some() {
        conditions.push(format!("t.priority = ${}", param));
        param += 1;
    }
    if filter.assigned_to.is_some() {
        conditions.push(format!("t.assigned_to = ${}", param));
        param += 1;
    }

    let mut search_param = None;
    if filter.search.is_some() {
        conditions.push(SEARCH_MATCH.replace("{n}", &param.to_string()));
        search_param = Some(param);
        param += 1;
    }

    let where_sql = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let order_sql = match search_param {
        Some(n) => format!(
            "ORDER BY {} DESC, t.updated_at DESC, t.id",
            SEARCH_RANK.replace("{n}", &n.to_string())
        ),
        None => "ORDER BY t.updated_at DESC, t.id".to_string(),
    };

    SqlParts {
        where_sql,
        order_sql,
        params_used: param - 1,
    }
}
