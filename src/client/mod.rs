//! Client side of the auth flow: HTTP wrapper, token persistence and the
//! guard deciding which pages a session may open.

pub mod api;
pub mod guard;
pub mod session;

use reqwest::StatusCode;
use thiserror::Error;

use crate::error::FieldError;

pub use api::ApiClient;
pub use guard::{require_anonymous, require_session, Access, Page};
pub use session::TokenStore;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message}")]
    Api {
        status: StatusCode,
        message: String,
        errors: Vec<FieldError>,
    },
    #[error("not logged in")]
    NotAuthenticated,
    #[error("already logged in, redirecting to {}; run `logout` first", .0.path())]
    AlreadyAuthenticated(guard::Page),
    #[error("token store: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}
