//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! application. It centralizes error management, providing a consistent way
//! to represent the failure taxonomy of the service: validation failures,
//! missing/invalid credentials, insufficient privilege, absent resources,
//! uniqueness conflicts, and unexpected internal failures.
//!
//! `AppError` implements `actix_web::error::ResponseError` to convert
//! application errors into HTTP responses with JSON bodies. `From`
//! implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error`, and `bcrypt::BcryptError` allow `?`
//! propagation from the libraries the handlers lean on.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Malformed, missing, or out-of-range input (HTTP 400).
    /// Carries the specific field reason.
    Validation(String),
    /// Missing, invalid, or expired credential (HTTP 401).
    Unauthenticated(String),
    /// Authenticated but insufficient role or ownership (HTTP 403).
    Forbidden(String),
    /// A referenced entity is absent (HTTP 404).
    NotFound(String),
    /// A uniqueness constraint was violated, e.g. a duplicate email (HTTP 409).
    Conflict(String),
    /// Unexpected store or infrastructure failure (HTTP 500).
    /// The carried detail is logged, never sent to the caller.
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// The 401/403 distinction is deliberate and observable: an absent or
/// invalid credential is never reported the same way as a valid credential
/// with insufficient privilege.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(msg) => HttpResponse::BadRequest().json(json!({
                "message": msg
            })),
            AppError::Unauthenticated(msg) => HttpResponse::Unauthorized().json(json!({
                "message": msg
            })),
            AppError::Forbidden(msg) => HttpResponse::Forbidden().json(json!({
                "message": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "message": msg
            })),
            AppError::Conflict(msg) => HttpResponse::Conflict().json(json!({
                "message": msg
            })),
            // Internal details are logged for operators and replaced with a
            // generic body so driver errors never reach the caller.
            AppError::Internal(msg) => {
                log::error!("internal error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "message": "Server error"
                }))
            }
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` maps to `NotFound`, unique-constraint violations map to
/// `Conflict`, and everything else becomes an `Internal` error.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                AppError::Conflict("Duplicate value for a unique field".into())
            }
            _ => AppError::Internal(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::Validation`,
/// preserving the per-field messages.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

/// Converts JWT processing failures into `AppError::Unauthenticated`.
///
/// Expired, forged, and malformed tokens all collapse to the same variant;
/// the caller is never told which check failed.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthenticated("Unauthorized".into())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::Internal`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(format!("password digest failure: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_responses() {
        let error = AppError::Validation("title is required".into());
        assert_eq!(error.error_response().status(), 400);

        let error = AppError::Unauthenticated("Unauthorized".into());
        assert_eq!(error.error_response().status(), 401);

        let error = AppError::Forbidden("Not allowed".into());
        assert_eq!(error.error_response().status(), 403);

        let error = AppError::NotFound("Task not found".into());
        assert_eq!(error.error_response().status(), 404);

        let error = AppError::Conflict("Email already exists".into());
        assert_eq!(error.error_response().status(), 409);

        let error = AppError::Internal("driver detail".into());
        assert_eq!(error.error_response().status(), 500);
    }

    #[test]
    fn test_unauthenticated_and_forbidden_are_distinct() {
        let unauthenticated = AppError::Unauthenticated("Unauthorized".into());
        let forbidden = AppError::Forbidden("Not allowed".into());
        assert_ne!(
            unauthenticated.error_response().status(),
            forbidden.error_response().status()
        );
    }

    #[test]
    fn test_jwt_errors_collapse_to_unauthenticated() {
        let expired = jsonwebtoken::errors::Error::from(
            jsonwebtoken::errors::ErrorKind::ExpiredSignature,
        );
        let forged = jsonwebtoken::errors::Error::from(
            jsonwebtoken::errors::ErrorKind::InvalidSignature,
        );
        // Both rejections are indistinguishable to the caller.
        let a = AppError::from(expired);
        let b = AppError::from(forged);
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.error_response().status(), 401);
    }
}
