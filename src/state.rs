use std::{fmt::Display, sync::Arc};

use anyhow::Context;

use crate::{
    auth::jwt::JwtKeys,
    config::AppConfig,
    db,
    error::AppError,
    users::{MemoryUserStore, PgUserStore, UserStore},
};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let users: Arc<dyn UserStore> = if config.database_url == "memory" {
            tracing::warn!("DATABASE_URL=memory; users are kept in process memory only");
            Arc::new(MemoryUserStore::new())
        } else {
            let pool = db::connect(&config).await?;
            db::migrate(&pool).await;
            Arc::new(PgUserStore::new(pool))
        };

        Self::from_parts(users, Arc::new(config))
    }

    pub fn from_parts(users: Arc<dyn UserStore>, config: Arc<AppConfig>) -> anyhow::Result<Self> {
        let jwt = JwtKeys::new(&config.jwt).context("build JWT keys")?;
        Ok(Self { users, config, jwt })
    }

    /// Logs `cause` and wraps it as a 500 whose detail is shown only in development.
    pub fn internal(&self, message: &str, cause: impl Display) -> AppError {
        AppError::internal(message, cause, self.config.is_development())
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::fake_with_store().0
    }

    #[cfg(test)]
    pub fn fake_with_store() -> (Self, Arc<MemoryUserStore>) {
        let store = Arc::new(MemoryUserStore::new());
        let state = Self::from_parts(store.clone(), Arc::new(AppConfig::test()))
            .expect("test config builds");
        (state, store)
    }
}
