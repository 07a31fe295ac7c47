//! Audit log ports and application service.
//!
//! Log entries are append-only: the port exposes no update or delete. The
//! service owns input normalization for the paginated query (page and
//! page-size clamping, query-term lowercasing); matching, counting,
//! ordering, and offset/limit evaluation live behind the repository port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use userdeck_core::AppResult;
use userdeck_domain::{LogEntryId, UserAction, UserId};

/// Page size applied when the caller supplies a non-positive value.
pub const DEFAULT_PAGE_SIZE: i64 = 25;

/// Column limit for the performer attribution.
pub const PERFORMED_BY_MAX_LENGTH: usize = 100;

/// Column limit for the free-text details.
pub const DETAILS_MAX_LENGTH: usize = 1000;

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Audit log entry returned by repository queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserLogRecord {
    /// Store-assigned identifier.
    pub id: LogEntryId,
    /// User the entry refers to. Not enforced as a foreign key at this layer.
    pub user_id: UserId,
    /// Recorded action.
    pub action: UserAction,
    /// When the action occurred, UTC.
    pub occurred_at: DateTime<Utc>,
    /// Free-text actor attribution, if known.
    pub performed_by: Option<String>,
    /// Free-text detail, if any.
    pub details: Option<String>,
}

/// Column values for a new log entry. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLogEntry {
    /// User the entry refers to.
    pub user_id: UserId,
    /// Recorded action.
    pub action: UserAction,
    /// When the action occurred, UTC.
    pub occurred_at: DateTime<Utc>,
    /// Free-text actor attribution, if known.
    pub performed_by: Option<String>,
    /// Free-text detail, if any.
    pub details: Option<String>,
}

/// Normalized parameters for the paginated log query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSearch {
    /// Rows to skip, `(page - 1) * page_size` after clamping.
    pub offset: i64,
    /// Maximum rows to return.
    pub limit: i64,
    /// Lowercased search term; `None` when the caller supplied a blank query.
    ///
    /// A row matches when the term is a substring of any of: details (empty
    /// when null), performer (empty when null), the action's lowercase
    /// storage name, or the decimal form of the user id.
    pub term: Option<String>,
}

/// One page of log entries plus the pre-pagination match count.
#[derive(Debug, Clone)]
pub struct LogPage {
    /// Entries for the requested page, ordered by `occurred_at` descending.
    pub items: Vec<UserLogRecord>,
    /// Count of all rows matching the filter, before pagination.
    pub total: i64,
    /// The clamped page number the items belong to.
    pub page: i64,
    /// The clamped page size used for the query.
    pub page_size: i64,
}

/// Repository port for the append-only audit log.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Persists one log entry.
    async fn append(&self, entry: NewLogEntry) -> AppResult<()>;

    /// Returns up to `take` entries for the user, most recent first.
    /// Ordering among entries with equal timestamps is store-determined.
    async fn list_for_user(&self, user_id: UserId, take: i64) -> AppResult<Vec<UserLogRecord>>;

    /// Runs the filtered, ordered, offset-paginated query and returns the
    /// page together with the pre-pagination match count.
    async fn search(&self, search: LogSearch) -> AppResult<(Vec<UserLogRecord>, i64)>;

    /// Finds a log entry by its identifier.
    async fn find_by_id(&self, entry_id: LogEntryId) -> AppResult<Option<UserLogRecord>>;
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for writing and querying the audit trail.
#[derive(Clone)]
pub struct AuditLogService {
    repository: Arc<dyn AuditLogRepository>,
}

impl AuditLogService {
    /// Creates a new audit log service.
    #[must_use]
    pub fn new(repository: Arc<dyn AuditLogRepository>) -> Self {
        Self { repository }
    }

    /// Appends one entry with `occurred_at` set to the current UTC instant.
    ///
    /// Fire-and-forget from the caller's perspective: one immediate
    /// independent write, no dedup, no buffering. Free-text fields are
    /// truncated to their column limits.
    pub async fn record(
        &self,
        user_id: UserId,
        action: UserAction,
        details: Option<String>,
        performed_by: Option<String>,
    ) -> AppResult<()> {
        self.repository
            .append(NewLogEntry {
                user_id,
                action,
                occurred_at: Utc::now(),
                performed_by: performed_by.map(|value| truncate(value, PERFORMED_BY_MAX_LENGTH)),
                details: details.map(|value| truncate(value, DETAILS_MAX_LENGTH)),
            })
            .await
    }

    /// Returns up to `take` entries for the user, most recent first.
    pub async fn get_for_user(
        &self,
        user_id: UserId,
        take: i64,
    ) -> AppResult<Vec<UserLogRecord>> {
        self.repository.list_for_user(user_id, take.max(0)).await
    }

    /// Returns one page of the global log, optionally filtered by a single
    /// case-insensitive substring term.
    ///
    /// `page` values below 1 clamp to 1; non-positive `page_size` values
    /// clamp to [`DEFAULT_PAGE_SIZE`]. The returned total always reflects
    /// the filtered count, not the grand total, when a query is present.
    pub async fn get_page(
        &self,
        page: i64,
        page_size: i64,
        query: Option<&str>,
    ) -> AppResult<LogPage> {
        let page = if page < 1 { 1 } else { page };
        let page_size = if page_size <= 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };

        let term = query
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_lowercase);

        // Saturates so an absurd client-supplied page degrades to an empty
        // page instead of overflowing.
        let offset = (page - 1).saturating_mul(page_size);

        let (items, total) = self
            .repository
            .search(LogSearch {
                offset,
                limit: page_size,
                term,
            })
            .await?;

        Ok(LogPage {
            items,
            total,
            page,
            page_size,
        })
    }

    /// Finds a log entry by its identifier.
    pub async fn get_by_id(&self, entry_id: LogEntryId) -> AppResult<Option<UserLogRecord>> {
        self.repository.find_by_id(entry_id).await
    }
}

fn truncate(value: String, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value;
    }

    value.chars().take(max_chars).collect()
}
