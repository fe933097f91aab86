use reqwest::{header::AUTHORIZATION, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::ClientError;
use crate::{
    auth::dto::{AuthResponse, MeResponse, MessageResponse},
    error::FieldError,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Error body shape shared by every failing endpoint.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    #[serde(default)]
    errors: Vec<FieldError>,
}

/// JSON client for the auth API; attaches the bearer token when one is set.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%method, %url, "api request");

        let mut req = self.http.request(method, &url);
        if let Some(token) = &self.token {
            req = req.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = body {
            req = req.json(&body);
        }

        let res = req.send().await?;
        let status = res.status();
        let bytes = res.bytes().await?;

        if !status.is_success() {
            let parsed: ApiErrorBody = serde_json::from_slice(&bytes).unwrap_or_default();
            return Err(ClientError::Api {
                status,
                message: parsed
                    .message
                    .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16())),
                errors: parsed.errors,
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        self.request(Method::GET, endpoint, None).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.request(Method::POST, endpoint, Some(serde_json::to_value(body)?))
            .await
    }

    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        self.post(
            "/auth/signup",
            &json!({ "name": name, "email": email, "password": password }),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        self.post("/auth/login", &json!({ "email": email, "password": password }))
            .await
    }

    pub async fn me(&self) -> Result<MeResponse, ClientError> {
        self.get("/auth/me").await
    }

    pub async fn logout(&self) -> Result<MessageResponse, ClientError> {
        self.post("/auth/logout", &json!({})).await
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        self.get("/health").await
    }
}
