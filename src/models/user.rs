use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A user's role in the two-level access model.
/// Corresponds to the `user_role` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access: manage users and every task.
    Admin,
    /// May list and progress only tasks assigned to them.
    Member,
}

/// A user row as stored in the database.
///
/// Deliberately does not implement `Serialize`: the password digest must
/// never leave the process. Outward-facing responses use [`UserSummary`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The public projection of a user: identity fields only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Payload for provisioning a new user (admin-only operation).
#[derive(Debug, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    /// Any value other than `"admin"` provisions a member.
    pub role: Option<String>,
}

impl NewUser {
    pub fn requested_role(&self) -> Role {
        if self.role.as_deref() == Some("admin") {
            Role::Admin
        } else {
            Role::Member
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::Member).unwrap(), "\"member\"");
        let parsed: Role = serde_json::from_str("\"member\"").unwrap();
        assert_eq!(parsed, Role::Member);
    }

    #[test]
    fn test_user_summary_excludes_password() {
        let summary = UserSummary {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            role: Role::Member,
        };
        let json = serde_json::to_value(&summary).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["email", "id", "name", "role"]);
    }

    #[test]
    fn test_new_user_validation() {
        let input = NewUser {
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
            role: None,
        };
        assert!(input.validate().is_ok());

        let short_name = NewUser {
            name: "T".to_string(),
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
            role: None,
        };
        assert!(short_name.validate().is_err());

        let bad_email = NewUser {
            name: "Test User".to_string(),
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
            role: None,
        };
        assert!(bad_email.validate().is_err());

        let short_password = NewUser {
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password: "short".to_string(),
            role: None,
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_requested_role_defaults_to_member() {
        let mk = |role: Option<&str>| NewUser {
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
            role: role.map(String::from),
        };
        assert_eq!(mk(None).requested_role(), Role::Member);
        assert_eq!(mk(Some("admin")).requested_role(), Role::Admin);
        assert_eq!(mk(Some("member")).requested_role(), Role::Member);
        // Unknown role strings never escalate.
        assert_eq!(mk(Some("superuser")).requested_role(), Role::Member);
    }
}
