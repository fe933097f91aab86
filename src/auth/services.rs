use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{LoginInput, SignupInput},
    password::{hash_password, verify_password},
};
use crate::{
    error::AppError,
    state::AppState,
    users::{NewUser, StoreError, User},
};

const DUPLICATE_EMAIL: &str = "User with this email already exists";
const BAD_CREDENTIALS: &str = "Invalid email or password";

/// Creates the account and issues its first token.
pub async fn signup(state: &AppState, input: SignupInput) -> Result<(User, String), AppError> {
    let fail = |e: &dyn std::fmt::Display| state.internal("Error creating user", e);

    if state
        .users
        .find_by_email(&input.email)
        .await
        .map_err(|e| fail(&e))?
        .is_some()
    {
        warn!(email = %input.email, "email already registered");
        return Err(AppError::BadRequest(DUPLICATE_EMAIL.into()));
    }

    let password_hash = hash_password(&input.password).map_err(|e| fail(&e))?;

    let user = match state
        .users
        .create(NewUser {
            name: input.name,
            email: input.email,
            password_hash,
        })
        .await
    {
        Ok(u) => u,
        Err(StoreError::DuplicateEmail) => {
            warn!("email registered concurrently");
            return Err(AppError::BadRequest(DUPLICATE_EMAIL.into()));
        }
        Err(e) => return Err(fail(&e)),
    };

    let token = state.jwt.issue(user.id, &user.email).map_err(|e| fail(&e))?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((user, token))
}

/// Checks credentials; unknown email and wrong password are indistinguishable to the caller.
pub async fn login(state: &AppState, input: LoginInput) -> Result<(User, String), AppError> {
    let fail = |e: &dyn std::fmt::Display| state.internal("Error during login", e);

    let Some(record) = state
        .users
        .find_credentials_by_email(&input.email)
        .await
        .map_err(|e| fail(&e))?
    else {
        warn!(email = %input.email, "login unknown email");
        return Err(AppError::Unauthorized(BAD_CREDENTIALS.into()));
    };

    let ok = verify_password(&input.password, &record.password_hash).map_err(|e| fail(&e))?;
    if !ok {
        warn!(email = %input.email, user_id = %record.user.id, "login invalid password");
        return Err(AppError::Unauthorized(BAD_CREDENTIALS.into()));
    }

    let user = record.user;
    let token = state.jwt.issue(user.id, &user.email).map_err(|e| fail(&e))?;

    info!(user_id = %user.id, "user logged in");
    Ok((user, token))
}

pub async fn current_user(state: &AppState, user_id: Uuid) -> Result<User, AppError> {
    state
        .users
        .find_by_id(user_id)
        .await
        .map_err(|e| state.internal("Error fetching user", &e))?
        .ok_or_else(|| {
            warn!(user_id = %user_id, "token subject no longer exists");
            AppError::NotFound("User not found".into())
        })
}
