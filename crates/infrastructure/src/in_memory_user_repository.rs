//! In-memory user repository for tests and local development.

use async_trait::async_trait;
use tokio::sync::RwLock;

use userdeck_application::{NewUserRow, UserRecord, UserRepository};
use userdeck_core::{AppError, AppResult};
use userdeck_domain::UserId;

/// In-memory user repository implementation.
///
/// Rows keep insertion order; ids are assigned sequentially starting at 1,
/// mirroring a BIGSERIAL column. Duplicate emails are rejected the way the
/// PostgreSQL unique index would reject them.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    rows: RwLock<Vec<UserRecord>>,
    next_id: RwLock<i64>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list_all(&self) -> AppResult<Vec<UserRecord>> {
        Ok(self.rows.read().await.clone())
    }

    async fn list_by_active(&self, is_active: bool) -> AppResult<Vec<UserRecord>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|record| record.is_active == is_active)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|record| record.id == user_id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|record| record.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert(&self, row: NewUserRow) -> AppResult<UserId> {
        let mut rows = self.rows.write().await;

        if rows
            .iter()
            .any(|record| record.email.eq_ignore_ascii_case(&row.email))
        {
            return Err(AppError::Conflict(
                "a user with this email already exists".to_owned(),
            ));
        }

        let mut next_id = self.next_id.write().await;
        *next_id += 1;
        let id = UserId::from_i64(*next_id);

        rows.push(UserRecord {
            id,
            forename: row.forename,
            surname: row.surname,
            email: row.email,
            is_active: row.is_active,
            date_of_birth: row.date_of_birth,
            password_hash: row.password_hash,
        });

        Ok(id)
    }

    async fn update(&self, record: &UserRecord) -> AppResult<()> {
        let mut rows = self.rows.write().await;
        if let Some(stored) = rows.iter_mut().find(|stored| stored.id == record.id) {
            *stored = record.clone();
        }
        Ok(())
    }

    async fn delete(&self, user_id: UserId) -> AppResult<()> {
        self.rows.write().await.retain(|record| record.id != user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn new_row(email: &str) -> NewUserRow {
        NewUserRow {
            forename: "Ada".to_owned(),
            surname: "Lovelace".to_owned(),
            email: email.to_owned(),
            is_active: true,
            date_of_birth: None,
            password_hash: "hash".to_owned(),
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially() {
        let repository = Arc::new(InMemoryUserRepository::new());

        let first = repository.insert(new_row("first@example.com")).await;
        let second = repository.insert(new_row("second@example.com")).await;

        assert_eq!(first.ok(), Some(UserId::from_i64(1)));
        assert_eq!(second.ok(), Some(UserId::from_i64(2)));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let repository = InMemoryUserRepository::new();

        assert!(repository.insert(new_row("ada@example.com")).await.is_ok());
        let duplicate = repository.insert(new_row("ADA@example.com")).await;

        assert!(matches!(duplicate, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn email_lookup_ignores_case() {
        let repository = InMemoryUserRepository::new();

        assert!(repository.insert(new_row("ada@example.com")).await.is_ok());
        let found = repository.find_by_email("Ada@Example.COM").await;

        assert!(matches!(found, Ok(Some(_))));
    }

    #[tokio::test]
    async fn update_of_missing_row_is_a_no_op() {
        let repository = InMemoryUserRepository::new();

        let absent = UserRecord {
            id: UserId::from_i64(99),
            forename: "No".to_owned(),
            surname: "Body".to_owned(),
            email: "nobody@example.com".to_owned(),
            is_active: false,
            date_of_birth: None,
            password_hash: "hash".to_owned(),
        };

        assert!(repository.update(&absent).await.is_ok());
        assert_eq!(repository.list_all().await.map(|rows| rows.len()).ok(), Some(0));
    }
}
