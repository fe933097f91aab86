use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{NewUser, StoreError, User, UserStore, UserWithPassword};

/// In-process store keyed by user id. Used by tests and `DATABASE_URL=memory`.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, UserWithPassword>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops a user; returns whether it existed.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.users.write().await.remove(&id).is_some()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.user.email == new_user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            created_at: now,
            updated_at: now,
        };
        users.insert(
            user.id,
            UserWithPassword {
                user: user.clone(),
                password_hash: new_user.password_hash,
            },
        );
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).map(|u| u.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .find_credentials_by_email(email)
            .await?
            .map(|u| u.user))
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserWithPassword>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.user.email == email)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ada".into(),
            email: email.into(),
            password_hash: "$argon2id$fake".into(),
        }
    }

    #[tokio::test]
    async fn create_and_find() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("ada@example.com")).await.unwrap();

        let by_id = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "ada@example.com");

        let creds = store
            .find_credentials_by_email("ada@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(creds.user.id, user.id);
        assert_eq!(creds.password_hash, "$argon2id$fake");
    }

    #[tokio::test]
    async fn rejects_duplicate_email() {
        let store = MemoryUserStore::new();
        store.create(new_user("ada@example.com")).await.unwrap();
        let err = store.create(new_user("ada@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[tokio::test]
    async fn remove_makes_user_vanish() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("ada@example.com")).await.unwrap();
        assert!(store.remove(user.id).await);
        assert!(store.find_by_id(user.id).await.unwrap().is_none());
        assert!(!store.remove(user.id).await);
    }

    #[test]
    fn user_serialization_has_no_password() {
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("ada@example.com"));
        assert!(!json.contains("password"));
    }
}
