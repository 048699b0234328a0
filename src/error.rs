//!
//! # Custom Error Handling
//!
//! This module defines the error type `AppError` used throughout the application.
//! Every failure a request can run into, from a rejected bearer token to a missing
//! task, is one of its variants.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers, extractors and
//! middleware can return it directly and have it rendered as a JSON body with the
//! matching status code. The `From` implementations for store and bcrypt errors allow
//! the `?` operator to be used in the service and auth layers.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;

use crate::store::StoreError;
use crate::validation::FieldError;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// One or more request fields broke their validation rules (HTTP 400).
    /// Carries every violation found, in rule order.
    ValidationFailed(Vec<FieldError>),
    /// The request body could not be read as a JSON object (HTTP 400).
    BadRequest(String),
    /// No `Authorization` header was sent to a protected route (HTTP 401).
    AuthRequired,
    /// The bearer token is malformed, wrongly signed or expired (HTTP 401).
    InvalidToken,
    /// Signin failed, for an unknown user or a wrong password alike (HTTP 401).
    AuthenticationFailed,
    /// Signup with a username that is already registered (HTTP 409).
    UsernameTaken,
    /// A requested resource was not found (HTTP 404).
    NotFound(String),
    /// `assignedTo` names a user that does not exist (HTTP 404).
    AssignedUserNotFound,
    /// No route matched the request (HTTP 404).
    RouteNotFound,
    /// An unexpected server-side failure (HTTP 500).
    Internal(String),
}

impl AppError {
    /// The client-facing message for every variant that renders as `{ "message": ... }`.
    pub fn message(&self) -> String {
        match self {
            AppError::ValidationFailed(errors) => format!("{} validation error(s)", errors.len()),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::AuthRequired => "Authentication required".into(),
            AppError::InvalidToken => "Invalid token".into(),
            AppError::AuthenticationFailed => "Authentication failed".into(),
            AppError::UsernameTaken => "User with the same username already exists".into(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::AssignedUserNotFound => "Assigned user does not exist".into(),
            AppError::RouteNotFound => "Route not found".into(),
            AppError::Internal(msg) => msg.clone(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::ValidationFailed(_) => write!(f, "Validation Failed: {}", self.message()),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::AuthRequired | AppError::InvalidToken | AppError::AuthenticationFailed => {
                write!(f, "Unauthorized: {}", self.message())
            }
            AppError::UsernameTaken => write!(f, "Conflict: {}", self.message()),
            AppError::NotFound(_) | AppError::AssignedUserNotFound | AppError::RouteNotFound => {
                write!(f, "Not Found: {}", self.message())
            }
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// Validation failures render as `{ "errors": [...] }`, everything else as
/// `{ "message": "..." }`.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationFailed(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::AuthRequired | AppError::InvalidToken | AppError::AuthenticationFailed => {
                StatusCode::UNAUTHORIZED
            }
            AppError::UsernameTaken => StatusCode::CONFLICT,
            AppError::NotFound(_) | AppError::AssignedUserNotFound | AppError::RouteNotFound => {
                StatusCode::NOT_FOUND
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::ValidationFailed(errors) => {
                HttpResponse::build(self.status_code()).json(json!({ "errors": errors }))
            }
            AppError::Internal(msg) => {
                log::error!("Internal error while handling request: {}", msg);
                HttpResponse::build(self.status_code()).json(json!({ "message": msg }))
            }
            _ => HttpResponse::build(self.status_code()).json(json!({
                "message": self.message()
            })),
        }
    }
}

/// Store failures reaching a handler map onto the matching client error.
/// A duplicate id can only come from a generator collision, so it is internal.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::NotFound => AppError::NotFound("Task not found".into()),
            StoreError::UsernameTaken => AppError::UsernameTaken,
            StoreError::DuplicateId(id) => AppError::Internal(format!("Duplicate record id {}", id)),
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(format!("Password hashing failed: {}", error))
    }
}
