//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use sqlx::PgPool;

use userdeck_application::{NewUserRow, UserRecord, UserRepository};
use userdeck_core::{AppError, AppResult};
use userdeck_domain::UserId;

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    forename: String,
    surname: String,
    email: String,
    is_active: bool,
    date_of_birth: Option<chrono::NaiveDate>,
    password_hash: String,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_i64(row.id),
            forename: row.forename,
            surname: row.surname,
            email: row.email,
            is_active: row.is_active,
            date_of_birth: row.date_of_birth,
            password_hash: row.password_hash,
        }
    }
}

const USER_COLUMNS: &str =
    "id, forename, surname, email, is_active, date_of_birth, password_hash";

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn list_all(&self) -> AppResult<Vec<UserRecord>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list users: {error}")))?;

        Ok(rows.into_iter().map(UserRecord::from).collect())
    }

    async fn list_by_active(&self, is_active: bool) -> AppResult<Vec<UserRecord>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE is_active = $1 ORDER BY id"
        ))
        .bind(is_active)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list users by active flag: {error}"))
        })?;

        Ok(rows.into_iter().map(UserRecord::from).collect())
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 LIMIT 1"
        ))
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user by id: {error}")))?;

        Ok(row.map(UserRecord::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1) LIMIT 1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user by email: {error}")))?;

        Ok(row.map(UserRecord::from))
    }

    async fn insert(&self, row: NewUserRow) -> AppResult<UserId> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (forename, surname, email, is_active, date_of_birth, password_hash)
            VALUES ($1, $2, LOWER($3), $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&row.forename)
        .bind(&row.surname)
        .bind(&row.email)
        .bind(row.is_active)
        .bind(row.date_of_birth)
        .bind(&row.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| email_conflict_or_internal(error, "create user"))?;

        Ok(UserId::from_i64(id))
    }

    async fn update(&self, record: &UserRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET forename = $2,
                surname = $3,
                email = LOWER($4),
                is_active = $5,
                date_of_birth = $6,
                password_hash = $7
            WHERE id = $1
            "#,
        )
        .bind(record.id.as_i64())
        .bind(&record.forename)
        .bind(&record.surname)
        .bind(&record.email)
        .bind(record.is_active)
        .bind(record.date_of_birth)
        .bind(&record.password_hash)
        .execute(&self.pool)
        .await
        .map_err(|error| email_conflict_or_internal(error, "update user"))?;

        Ok(())
    }

    async fn delete(&self, user_id: UserId) -> AppResult<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete user: {error}")))?;

        Ok(())
    }
}

fn email_conflict_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict("a user with this email already exists".to_owned());
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
