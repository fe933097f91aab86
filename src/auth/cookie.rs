use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Cookie the client persists the session token under.
pub const TOKEN_COOKIE: &str = "token";
pub const TOKEN_COOKIE_MAX_AGE_SECS: i64 = 7 * 24 * 60 * 60;

/// Readable from the browser; the client mirrors it into local storage.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .max_age(Duration::seconds(TOKEN_COOKIE_MAX_AGE_SECS))
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Empty, already-expired `token` cookie that makes the browser drop its copy.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .same_site(SameSite::Lax)
        .build()
}
