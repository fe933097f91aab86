use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument};

use super::{
    cookie::{removal_cookie, session_cookie},
    dto::{AuthResponse, LoginInput, MeResponse, MessageResponse, SignupInput},
    extractors::AuthUser,
    services,
    validation::ValidatedJson,
};
use crate::{error::AppError, state::AppState};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(input): ValidatedJson<SignupInput>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), AppError> {
    let (user, token) = services::signup(&state, input).await?;
    let jar = jar.add(session_cookie(token.clone(), state.config.cookie_secure));

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            message: "User created successfully".into(),
            token,
            user: user.into(),
        }),
    ))
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(input): ValidatedJson<LoginInput>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let (user, token) = services::login(&state, input).await?;
    let jar = jar.add(session_cookie(token.clone(), state.config.cookie_secure));

    Ok((
        jar,
        Json(AuthResponse {
            message: "Login successful".into(),
            token,
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, auth), fields(user_id = %auth.id))]
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MeResponse>, AppError> {
    let user = services::current_user(&state, auth.id).await?;
    Ok(Json(MeResponse { user: user.into() }))
}

#[instrument(skip_all)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    info!("session cookie cleared");
    (
        jar.add(removal_cookie()),
        Json(MessageResponse {
            message: "Logged out".into(),
        }),
    )
}
