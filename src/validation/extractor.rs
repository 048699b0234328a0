use actix_web::dev::Payload;
use actix_web::{web, Error as ActixError, FromRequest, HttpRequest};
use chrono::Utc;
use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::HasSchema;
use crate::error::AppError;

/// A JSON body that has passed its type's validation rules.
///
/// The body is first read as raw JSON so the rules can see missing, null and
/// wrongly-typed fields; only a body that breaks no rule is deserialized into `T`.
/// Violations are reported together as `AppError::ValidationFailed`.
#[derive(Debug)]
pub struct Validated<T>(pub T);

impl<T> Validated<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromRequest for Validated<T>
where
    T: DeserializeOwned + HasSchema + 'static,
{
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Json::<Value>::from_request(req, payload);
        Box::pin(async move {
            let body = body
                .await
                .map_err(|e| AppError::BadRequest(format!("Invalid JSON payload: {}", e)))?
                .into_inner();

            if !body.is_object() {
                return Err(AppError::BadRequest("Request body must be a JSON object".into()).into());
            }

            let errors = T::schema().evaluate(&body, Utc::now().date_naive());
            if !errors.is_empty() {
                log::debug!("Rejected request body with {} validation error(s)", errors.len());
                return Err(AppError::ValidationFailed(errors).into());
            }

            serde_json::from_value(body)
                .map(Validated)
                .map_err(|e| AppError::Internal(e.to_string()).into())
        })
    }
}
