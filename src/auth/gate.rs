use uuid::Uuid;

use crate::auth::extractors::CurrentUser;
use crate::error::AppError;
use crate::models::Role;

/// A declarative authorization rule attached to an operation.
///
/// Rules are evaluated against the resolved identity and, for ownership
/// rules, the target task's assignee. Evaluation is a pure function of its
/// inputs: the same identity, rule, and resource state always yield the
/// same decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRule {
    /// The identity's role must match the required role. In the two-level
    /// system this means admin-only (any-authenticated operations carry no
    /// rule at all).
    RoleAtLeast(Role),
    /// The identity must be the resource's assignee. Used by the status
    /// update: admins get no bypass here.
    Owner,
    /// The identity must either hold the required role or be the
    /// resource's assignee.
    OwnerOrRole(Role),
}

impl AccessRule {
    /// Evaluates the rule. `owner` is the resource's `assigned_to`, or
    /// `None` for operations with no target resource (role-only rules
    /// never look at it).
    pub fn check(&self, identity: &CurrentUser, owner: Option<Uuid>) -> Result<(), AppError> {
        let allowed = match self {
            AccessRule::RoleAtLeast(role) => identity.role == *role,
            AccessRule::Owner => owner == Some(identity.id),
            AccessRule::OwnerOrRole(role) => {
                identity.role == *role || owner == Some(identity.id)
            }
        };

        if allowed {
            Ok(())
        } else {
            Err(AppError::Forbidden("Not allowed".into()))
        }
    }
}
