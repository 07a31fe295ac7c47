//! PostgreSQL-backed audit log repository.
//!
//! `occurred_at` is persisted as a BIGINT column holding microseconds since
//! the Unix epoch, UTC.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use userdeck_application::{AuditLogRepository, LogSearch, NewLogEntry, UserLogRecord};
use userdeck_core::{AppError, AppResult};
use userdeck_domain::{LogEntryId, UserAction, UserId};

/// PostgreSQL implementation of the audit log repository port.
#[derive(Clone)]
pub struct PostgresAuditLogRepository {
    pool: PgPool,
}

impl PostgresAuditLogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserLogRow {
    id: i64,
    user_id: i64,
    action: String,
    occurred_at: i64,
    performed_by: Option<String>,
    details: Option<String>,
}

impl TryFrom<UserLogRow> for UserLogRecord {
    type Error = AppError;

    fn try_from(row: UserLogRow) -> Result<Self, Self::Error> {
        let action = row.action.parse::<UserAction>()?;
        let occurred_at = DateTime::<Utc>::from_timestamp_micros(row.occurred_at)
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "stored timestamp {} is out of range",
                    row.occurred_at
                ))
            })?;

        Ok(Self {
            id: LogEntryId::from_i64(row.id),
            user_id: UserId::from_i64(row.user_id),
            action,
            occurred_at,
            performed_by: row.performed_by,
            details: row.details,
        })
    }
}

fn into_records(rows: Vec<UserLogRow>) -> AppResult<Vec<UserLogRecord>> {
    rows.into_iter().map(UserLogRecord::try_from).collect()
}

/// One substring term matched against details, performer, the lowercase
/// action name, and the decimal user id. The bound term is already
/// lowercased by the service and LIKE-escaped by [`escape_like`].
const SEARCH_PREDICATE: &str = r#"
    $1::TEXT IS NULL
    OR LOWER(COALESCE(details, '')) LIKE '%' || $1 || '%' ESCAPE '\'
    OR LOWER(COALESCE(performed_by, '')) LIKE '%' || $1 || '%' ESCAPE '\'
    OR action LIKE '%' || $1 || '%' ESCAPE '\'
    OR CAST(user_id AS TEXT) LIKE '%' || $1 || '%' ESCAPE '\'
"#;

/// Escapes LIKE metacharacters so the bound term matches literally, the way
/// the in-memory adapter's substring check does.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl AuditLogRepository for PostgresAuditLogRepository {
    async fn append(&self, entry: NewLogEntry) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_logs (user_id, action, occurred_at, performed_by, details)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(entry.user_id.as_i64())
        .bind(entry.action.as_str())
        .bind(entry.occurred_at.timestamp_micros())
        .bind(entry.performed_by)
        .bind(entry.details)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to append log entry: {error}")))?;

        Ok(())
    }

    async fn list_for_user(&self, user_id: UserId, take: i64) -> AppResult<Vec<UserLogRecord>> {
        let rows = sqlx::query_as::<_, UserLogRow>(
            r#"
            SELECT id, user_id, action, occurred_at, performed_by, details
            FROM user_logs
            WHERE user_id = $1
            ORDER BY occurred_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id.as_i64())
        .bind(take)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list user logs: {error}")))?;

        into_records(rows)
    }

    async fn search(&self, search: LogSearch) -> AppResult<(Vec<UserLogRecord>, i64)> {
        let term = search.term.as_deref().map(escape_like);

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM user_logs WHERE {SEARCH_PREDICATE}"
        ))
        .bind(term.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count log entries: {error}")))?;

        let rows = sqlx::query_as::<_, UserLogRow>(&format!(
            r#"
            SELECT id, user_id, action, occurred_at, performed_by, details
            FROM user_logs
            WHERE {SEARCH_PREDICATE}
            ORDER BY occurred_at DESC
            LIMIT $2
            OFFSET $3
            "#
        ))
        .bind(term.as_deref())
        .bind(search.limit)
        .bind(search.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to search log entries: {error}")))?;

        Ok((into_records(rows)?, total))
    }

    async fn find_by_id(&self, entry_id: LogEntryId) -> AppResult<Option<UserLogRecord>> {
        let row = sqlx::query_as::<_, UserLogRow>(
            r#"
            SELECT id, user_id, action, occurred_at, performed_by, details
            FROM user_logs
            WHERE id = $1
            LIMIT 1
            "#,
        )
        .bind(entry_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find log entry: {error}")))?;

        row.map(UserLogRecord::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_metacharacters_are_escaped_for_literal_matching() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain term"), "plain term");
    }
}
