use crate::{
    auth::TokenIssuer,
    error::AppError,
    models::Credentials,
    services::users,
    store::DataStore,
    validation::Validated,
};
use actix_web::{post, web, HttpResponse, Responder};

/// Register a new user
///
/// Creates a new user account and returns its id, username and a bearer token.
/// Answers `409 Conflict` if the username is taken.
#[post("/signup")]
pub async fn signup(
    store: web::Data<DataStore>,
    tokens: web::Data<TokenIssuer>,
    credentials: Validated<Credentials>,
) -> Result<impl Responder, AppError> {
    let response = users::signup(&store, &tokens, credentials.into_inner())?;
    Ok(HttpResponse::Created().json(response))
}

/// Sign in
///
/// Authenticates a user and returns a bearer token.
#[post("/signin")]
pub async fn signin(
    store: web::Data<DataStore>,
    tokens: web::Data<TokenIssuer>,
    credentials: Validated<Credentials>,
) -> Result<impl Responder, AppError> {
    let response = users::signin(&store, &tokens, credentials.into_inner())?;
    Ok(HttpResponse::Ok().json(response))
}
