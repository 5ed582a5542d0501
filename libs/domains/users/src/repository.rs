use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{User, UserFilter};

/// Repository trait for User persistence.
///
/// Reads only ever return users that are not soft-deleted, except
/// [`UserRepository::email_exists`] which looks at every row.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, user: User) -> UserResult<User>;

    /// Get an active user by ID
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Get an active user by email (case-insensitive)
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// List active users, oldest first
    async fn list(&self, filter: UserFilter) -> UserResult<Vec<User>>;

    /// Persist name, email, role and password hash of an active user
    async fn update(&self, user: User) -> UserResult<User>;

    /// Mark an active user deleted and return the updated row
    async fn soft_delete(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Whether any user, deleted or not, has this email
    async fn email_exists(&self, email: &str) -> UserResult<bool>;

    /// Whether an active user other than `exclude` has this email
    async fn email_taken_by_other(&self, email: &str, exclude: Uuid) -> UserResult<bool>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn same_email(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| same_email(&u.email, &user.email)) {
            return Err(UserError::DuplicateEmail(user.email));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, email = %user.email, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).filter(|u| !u.is_deleted()).cloned())
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| !u.is_deleted() && same_email(&u.email, email))
            .cloned())
    }

    async fn list(&self, filter: UserFilter) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        let needle = filter.search.as_deref().map(str::to_lowercase);

        let mut result: Vec<User> = users
            .values()
            .filter(|u| !u.is_deleted())
            .filter(|u| {
                needle.as_deref().is_none_or(|n| {
                    u.name.to_lowercase().contains(n) || u.email.to_lowercase().contains(n)
                })
            })
            .cloned()
            .collect();

        result.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let skip = filter.skip.unwrap_or(0) as usize;
        let take = filter.take.map_or(usize::MAX, |t| t as usize);
        Ok(result.into_iter().skip(skip).take(take).collect())
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        let existing = users
            .get_mut(&user.id)
            .filter(|u| !u.is_deleted())
            .ok_or(UserError::NotFound(user.id))?;

        existing.name = user.name;
        existing.email = user.email;
        existing.role = user.role;
        existing.password_hash = user.password_hash;
        existing.updated_at = Utc::now();

        tracing::info!(user_id = %existing.id, "Updated user");
        Ok(existing.clone())
    }

    async fn soft_delete(&self, id: Uuid) -> UserResult<Option<User>> {
        let mut users = self.users.write().await;

        let Some(user) = users.get_mut(&id).filter(|u| !u.is_deleted()) else {
            return Ok(None);
        };
        let now = Utc::now();
        user.deleted_at = Some(now);
        user.updated_at = now;

        tracing::info!(user_id = %id, "Soft-deleted user");
        Ok(Some(user.clone()))
    }

    async fn email_exists(&self, email: &str) -> UserResult<bool> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| same_email(&u.email, email)))
    }

    async fn email_taken_by_other(&self, email: &str, exclude: Uuid) -> UserResult<bool> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .any(|u| u.id != exclude && !u.is_deleted() && same_email(&u.email, email)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn user(name: &str, email: &str) -> User {
        User::new(name.into(), email.into(), "hash".into(), Role::User)
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email_case_insensitive() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("A", "a@vascomm.co.id")).await.unwrap();

        let err = repo.create(user("B", "A@Vascomm.co.id")).await.unwrap_err();
        assert!(matches!(err, UserError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn test_soft_deleted_users_are_hidden() {
        let repo = InMemoryUserRepository::new();
        let gone = repo.create(user("Gone", "gone@vascomm.co.id")).await.unwrap();
        repo.create(user("Kept", "kept@vascomm.co.id")).await.unwrap();

        let deleted = repo.soft_delete(gone.id).await.unwrap().unwrap();
        assert!(deleted.deleted_at.is_some());

        assert!(repo.get_by_id(gone.id).await.unwrap().is_none());
        assert!(repo.get_by_email("gone@vascomm.co.id").await.unwrap().is_none());
        assert!(repo.soft_delete(gone.id).await.unwrap().is_none());

        let listed = repo.list(UserFilter::default()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Kept");

        assert!(repo.email_exists("gone@vascomm.co.id").await.unwrap());
        assert!(
            !repo
                .email_taken_by_other("gone@vascomm.co.id", Uuid::now_v7())
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_list_search_matches_name_or_email() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("Super Admin", "superadmin@vascomm.co.id")).await.unwrap();
        repo.create(user("User", "user@vascomm.co.id")).await.unwrap();
        repo.create(user("Other", "other@example.com")).await.unwrap();

        let found = repo
            .list(UserFilter {
                search: Some("VASCOMM".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 2);

        let found = repo
            .list(UserFilter {
                search: Some("admin".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);

        let page = repo
            .list(UserFilter {
                search: None,
                take: Some(2),
                skip: Some(1),
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].name, "User");
    }

    #[tokio::test]
    async fn test_email_taken_by_other_ignores_self() {
        let repo = InMemoryUserRepository::new();
        let me = repo.create(user("Me", "me@vascomm.co.id")).await.unwrap();

        assert!(!repo.email_taken_by_other("me@vascomm.co.id", me.id).await.unwrap());
        assert!(
            repo.email_taken_by_other("me@vascomm.co.id", Uuid::now_v7())
                .await
                .unwrap()
        );
    }
}
