use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage, HttpResponse,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::extractors::AuthenticatedUser;
use crate::auth::token::TokenIssuer;
use crate::error::AppError;

/// Rejects requests without a valid bearer token.
/// Wrap it around each route that needs authentication. On success the token's
/// Wrap it around the scopes that need authentication. On success the token's
/// identity is stored in the request extensions, where the `AuthenticatedUser`
/// extractor picks it up for the handler. The `TokenIssuer` is taken from app data.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

/// Pulls the identity out of the request's bearer token.
fn authenticate(req: &ServiceRequest) -> Result<AuthenticatedUser, AppError> {
    let issuer = req
        .app_data::<web::Data<TokenIssuer>>()
        .ok_or_else(|| AppError::Internal("Token issuer is not configured".into()))?;

    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AppError::AuthRequired)?;

    let token = header_value
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AppError::InvalidToken)?;

    let claims = issuer.verify(token)?;
    Ok(AuthenticatedUser {
        id: claims.id,
        username: claims.username,
    })
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(&req) {
            Ok(user) => {
                req.extensions_mut().insert(user);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(app_err) => {
                // Answer here instead of returning Err so the rejection is an ordinary
                // response that outer middleware (logger, CORS) still sees.
                log::warn!("Rejected {} {}: {}", req.method(), req.path(), app_err);
                let response = HttpResponse::from_error(app_err).map_into_right_body();
                Box::pin(async move { Ok(req.into_response(response)) })
            }
        }
    }
}
