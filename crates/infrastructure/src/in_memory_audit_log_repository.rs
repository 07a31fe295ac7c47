//! In-memory audit log repository for tests and local development.

use async_trait::async_trait;
use tokio::sync::RwLock;

use userdeck_application::{AuditLogRepository, LogSearch, NewLogEntry, UserLogRecord};
use userdeck_core::AppResult;
use userdeck_domain::{LogEntryId, UserId};

/// In-memory audit log implementation.
///
/// Append-only, like the port: nothing in here can mutate or remove a stored
/// entry. Ids are assigned sequentially starting at 1. The descending
/// timestamp sort is stable, so entries sharing an instant keep insertion
/// order.
#[derive(Debug, Default)]
pub struct InMemoryAuditLogRepository {
    entries: RwLock<Vec<UserLogRecord>>,
    next_id: RwLock<i64>,
}

impl InMemoryAuditLogRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_term(record: &UserLogRecord, term: &str) -> bool {
    record
        .details
        .as_deref()
        .unwrap_or_default()
        .to_lowercase()
        .contains(term)
        || record
            .performed_by
            .as_deref()
            .unwrap_or_default()
            .to_lowercase()
            .contains(term)
        || record.action.as_str().contains(term)
        || record.user_id.to_string().contains(term)
}

#[async_trait]
impl AuditLogRepository for InMemoryAuditLogRepository {
    async fn append(&self, entry: NewLogEntry) -> AppResult<()> {
        let mut next_id = self.next_id.write().await;
        *next_id += 1;

        self.entries.write().await.push(UserLogRecord {
            id: LogEntryId::from_i64(*next_id),
            user_id: entry.user_id,
            action: entry.action,
            occurred_at: entry.occurred_at,
            performed_by: entry.performed_by,
            details: entry.details,
        });

        Ok(())
    }

    async fn list_for_user(&self, user_id: UserId, take: i64) -> AppResult<Vec<UserLogRecord>> {
        let mut matching: Vec<UserLogRecord> = self
            .entries
            .read()
            .await
            .iter()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();

        matching.sort_by(|left, right| right.occurred_at.cmp(&left.occurred_at));
        matching.truncate(usize::try_from(take).unwrap_or(0));

        Ok(matching)
    }

    async fn search(&self, search: LogSearch) -> AppResult<(Vec<UserLogRecord>, i64)> {
        let mut matching: Vec<UserLogRecord> = self
            .entries
            .read()
            .await
            .iter()
            .filter(|record| match search.term.as_deref() {
                Some(term) => matches_term(record, term),
                None => true,
            })
            .cloned()
            .collect();

        let total = matching.len() as i64;

        matching.sort_by(|left, right| right.occurred_at.cmp(&left.occurred_at));

        let items = matching
            .into_iter()
            .skip(usize::try_from(search.offset).unwrap_or(0))
            .take(usize::try_from(search.limit).unwrap_or(0))
            .collect();

        Ok((items, total))
    }

    async fn find_by_id(&self, entry_id: LogEntryId) -> AppResult<Option<UserLogRecord>> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .find(|record| record.id == entry_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, Utc};

    use userdeck_application::AuditLogService;
    use userdeck_domain::UserAction;

    use super::*;

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + seconds, 0).unwrap_or_default()
    }

    fn entry(
        user_id: i64,
        seconds: i64,
        action: UserAction,
        performed_by: Option<&str>,
    ) -> NewLogEntry {
        NewLogEntry {
            user_id: UserId::from_i64(user_id),
            action,
            occurred_at: at(seconds),
            performed_by: performed_by.map(str::to_owned),
            details: None,
        }
    }

    async fn seeded_service(entries: Vec<NewLogEntry>) -> AuditLogService {
        let repository = Arc::new(InMemoryAuditLogRepository::new());
        for item in entries {
            let appended = repository.append(item).await;
            assert!(appended.is_ok());
        }
        AuditLogService::new(repository)
    }

    fn ids(records: &[UserLogRecord]) -> Vec<i64> {
        records.iter().map(|record| record.id.as_i64()).collect()
    }

    fn five_entries() -> Vec<NewLogEntry> {
        (1..=5)
            .map(|offset| entry(offset, offset, UserAction::Viewed, Some("system")))
            .collect()
    }

    #[tokio::test]
    async fn first_page_returns_most_recent_entries_and_full_total() {
        let service = seeded_service(five_entries()).await;

        let page = service.get_page(1, 2, None).await;

        assert!(page.is_ok());
        if let Ok(page) = page {
            assert_eq!(ids(&page.items), vec![5, 4]);
            assert_eq!(page.total, 5);
        }
    }

    #[tokio::test]
    async fn second_page_continues_descending_order() {
        let service = seeded_service(five_entries()).await;

        let page = service.get_page(2, 2, None).await;

        assert!(page.is_ok());
        if let Ok(page) = page {
            assert_eq!(ids(&page.items), vec![3, 2]);
            assert_eq!(page.total, 5);
        }
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty_with_unchanged_total() {
        let service = seeded_service(five_entries()).await;

        let page = service.get_page(4, 2, None).await;

        assert!(page.is_ok());
        if let Ok(page) = page {
            assert!(page.items.is_empty());
            assert_eq!(page.total, 5);
        }
    }

    #[tokio::test]
    async fn extreme_page_number_yields_an_empty_page() {
        let service = seeded_service(five_entries()).await;

        let page = service.get_page(i64::MAX, 25, None).await;

        assert!(page.is_ok());
        if let Ok(page) = page {
            assert!(page.items.is_empty());
            assert_eq!(page.total, 5);
        }
    }

    #[tokio::test]
    async fn mixed_case_query_matches_performer_case_insensitively() {
        let performers = ["system", "bob", "bob", "alice", "qa"];
        let entries = performers
            .iter()
            .enumerate()
            .map(|(index, performer)| {
                entry(1, index as i64, UserAction::Viewed, Some(performer))
            })
            .collect();
        let service = seeded_service(entries).await;

        let page = service.get_page(1, 25, Some("BoB")).await;

        assert!(page.is_ok());
        if let Ok(page) = page {
            assert_eq!(page.total, 2);
            assert_eq!(page.items.len(), 2);
            assert!(page
                .items
                .iter()
                .all(|record| record.performed_by.as_deref() == Some("bob")));
        }
    }

    #[tokio::test]
    async fn query_matches_action_name_and_user_id() {
        let service = seeded_service(vec![
            entry(7, 1, UserAction::LoggedIn, Some("system")),
            entry(12, 2, UserAction::Deleted, Some("system")),
        ])
        .await;

        let by_action = service.get_page(1, 25, Some("logged")).await;
        assert!(by_action.is_ok());
        if let Ok(page) = by_action {
            assert_eq!(page.total, 1);
            assert_eq!(ids(&page.items), vec![1]);
        }

        let by_user_id = service.get_page(1, 25, Some("12")).await;
        assert!(by_user_id.is_ok());
        if let Ok(page) = by_user_id {
            assert_eq!(page.total, 1);
            assert_eq!(ids(&page.items), vec![2]);
        }
    }

    #[tokio::test]
    async fn query_metacharacters_match_literally() {
        let mut underscore = entry(1, 1, UserAction::Updated, None);
        underscore.details = Some("batch a_b finished".to_owned());
        let mut lookalike = entry(1, 2, UserAction::Updated, None);
        lookalike.details = Some("batch aXb finished".to_owned());
        let service = seeded_service(vec![underscore, lookalike]).await;

        let underscore_page = service.get_page(1, 25, Some("a_b")).await;
        assert!(underscore_page.is_ok());
        if let Ok(page) = underscore_page {
            assert_eq!(page.total, 1);
            assert_eq!(ids(&page.items), vec![1]);
        }

        let percent_page = service.get_page(1, 25, Some("100%")).await;
        assert!(percent_page.is_ok());
        if let Ok(page) = percent_page {
            assert_eq!(page.total, 0);
            assert!(page.items.is_empty());
        }
    }

    #[tokio::test]
    async fn query_matches_details_substring() {
        let mut with_details = entry(3, 1, UserAction::Updated, Some("system"));
        with_details.details = Some("API updated Grace Hopper".to_owned());
        let service =
            seeded_service(vec![with_details, entry(3, 2, UserAction::Viewed, None)]).await;

        let page = service.get_page(1, 25, Some("grace")).await;

        assert!(page.is_ok());
        if let Ok(page) = page {
            assert_eq!(page.total, 1);
            assert_eq!(ids(&page.items), vec![1]);
        }
    }

    #[tokio::test]
    async fn recent_user_logs_exclude_other_users_and_respect_take() {
        let service = seeded_service(vec![
            entry(7, 1, UserAction::Created, None),
            entry(7, 2, UserAction::Viewed, None),
            entry(7, 3, UserAction::Updated, None),
            entry(9, 4, UserAction::Viewed, None),
        ])
        .await;

        let recent = service.get_for_user(UserId::from_i64(7), 2).await;

        assert!(recent.is_ok());
        if let Ok(records) = recent {
            assert_eq!(ids(&records), vec![3, 2]);
            assert!(records
                .iter()
                .all(|record| record.user_id == UserId::from_i64(7)));
        }
    }

    #[tokio::test]
    async fn find_by_id_returns_entry_or_none() {
        let service = seeded_service(vec![entry(1, 1, UserAction::Created, None)]).await;

        let present = service.get_by_id(LogEntryId::from_i64(1)).await;
        let absent = service.get_by_id(LogEntryId::from_i64(42)).await;

        assert!(matches!(present, Ok(Some(_))));
        assert!(matches!(absent, Ok(None)));
    }
}
