//! Signup and signin.

use log::{info, warn};

use crate::auth::{hash_password, verify_password, TokenIssuer};
use crate::error::AppError;
use crate::models::{Credentials, SigninResponse, SignupResponse, User};
use crate::store::DataStore;

/// Registers a new user and returns its identity together with a fresh token.
pub fn signup(
    store: &DataStore,
    tokens: &TokenIssuer,
    credentials: Credentials,
) -> Result<SignupResponse, AppError> {
    if store.user_exists(&credentials.username) {
        return Err(AppError::UsernameTaken);
    }

    let password_hash = hash_password(&credentials.password)?;
    // The store re-checks the username under its lock, so a concurrent signup
    // for the same name still ends in UsernameTaken.
    let user = store.insert_user(User::new(credentials.username, password_hash))?;
    let token = tokens.issue(&user.username, user.id)?;

    info!("Registered user {} ({})", user.username, user.id);
    Ok(SignupResponse {
        id: user.id,
        username: user.username,
        token,
    })
}

/// Exchanges a username and password for a token.
///
/// Unknown usernames and wrong passwords fail with the same `AuthenticationFailed`.
pub fn signin(
    store: &DataStore,
    tokens: &TokenIssuer,
    credentials: Credentials,
) -> Result<SigninResponse, AppError> {
    let user = match store.find_user_by_username(&credentials.username) {
        Some(user) => user,
        None => {
            warn!("Signin failed: unknown user {}", credentials.username);
            return Err(AppError::AuthenticationFailed);
        }
    };

    if !verify_password(&credentials.password, &user.password_hash)? {
        warn!("Signin failed: wrong password for {}", user.username);
        return Err(AppError::AuthenticationFailed);
    }

    let token = tokens.issue(&user.username, user.id)?;
    info!("User {} signed in", user.username);
    Ok(SigninResponse { token })
}
