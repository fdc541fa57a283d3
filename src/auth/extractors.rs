use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::Role;

/// The verified identity of the requester, resolved by `AuthMiddleware`
/// from the bearer token and a fresh user lookup.
///
/// Extracting this in a handler is only valid on routes behind the
/// middleware; if the identity is missing from request extensions the
/// extractor rejects with `Unauthenticated` as a safe default.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<CurrentUser>().cloned() {
            Some(user) => ready(Ok(user)),
            None => {
                let err = AppError::Unauthenticated("Unauthorized".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
