//! Request and response shapes for the HTTP API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use userdeck_application::{LoginSession, UserLogRecord, UserRecord};
use userdeck_domain::UserAction;

/// Login request body. Missing fields default to blank and are rejected by
/// the service as malformed input.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: i64,
    pub forename: String,
    pub email: String,
}

impl From<LoginSession> for LoginResponse {
    fn from(session: LoginSession) -> Self {
        Self {
            token: session.token,
            user_id: session.user_id.as_i64(),
            forename: session.forename,
            email: session.email,
        }
    }
}

/// API representation of a user. The password hash never leaves the server.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub forename: String,
    pub surname: String,
    pub email: String,
    pub is_active: bool,
    pub date_of_birth: Option<NaiveDate>,
}

impl From<UserRecord> for UserResponse {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id.as_i64(),
            forename: record.forename,
            surname: record.surname,
            email: record.email,
            is_active: record.is_active,
            date_of_birth: record.date_of_birth,
        }
    }
}

/// Body for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub forename: String,
    pub surname: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
}

/// Body for updating a user. The id must match the path id.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub id: i64,
    pub forename: String,
    pub surname: String,
    pub email: String,
    pub is_active: bool,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    /// Blank or absent keeps the stored password.
    #[serde(default)]
    pub password: Option<String>,
}

/// API representation of an audit log entry.
#[derive(Debug, Serialize)]
pub struct UserLogResponse {
    pub id: i64,
    pub user_id: i64,
    pub action: UserAction,
    pub occurred_at: DateTime<Utc>,
    pub performed_by: Option<String>,
    pub details: Option<String>,
}

impl From<UserLogRecord> for UserLogResponse {
    fn from(record: UserLogRecord) -> Self {
        Self {
            id: record.id.as_i64(),
            user_id: record.user_id.as_i64(),
            action: record.action,
            occurred_at: record.occurred_at,
            performed_by: record.performed_by,
            details: record.details,
        }
    }
}

/// One page of the global audit log, echoing the clamped paging values and
/// the raw query string.
#[derive(Debug, Serialize)]
pub struct LogListResponse {
    pub items: Vec<UserLogResponse>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub query: Option<String>,
}

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use userdeck_domain::{LogEntryId, UserId};

    use super::*;

    #[test]
    fn user_response_never_carries_the_password_hash() {
        let record = UserRecord {
            id: UserId::from_i64(3),
            forename: "Ada".to_owned(),
            surname: "Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            is_active: true,
            date_of_birth: None,
            password_hash: "argon2-secret".to_owned(),
        };

        let json = serde_json::to_string(&UserResponse::from(record)).unwrap_or_default();

        assert!(json.contains("\"email\":\"ada@example.com\""));
        assert!(!json.contains("argon2-secret"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn log_response_serializes_action_as_snake_case() {
        let record = UserLogRecord {
            id: LogEntryId::from_i64(1),
            user_id: UserId::from_i64(7),
            action: UserAction::LoggedIn,
            occurred_at: Utc.timestamp_opt(1_700_000_000, 0).single().unwrap_or_default(),
            performed_by: Some("ada@example.com".to_owned()),
            details: None,
        };

        let json = serde_json::to_string(&UserLogResponse::from(record)).unwrap_or_default();

        assert!(json.contains("\"action\":\"logged_in\""));
        assert!(json.contains("\"user_id\":7"));
    }

    #[test]
    fn login_request_defaults_missing_fields_to_blank() {
        let request: LoginRequest = match serde_json::from_str("{}") {
            Ok(request) => request,
            Err(error) => panic!("empty object must deserialize: {error}"),
        };

        assert!(request.email.is_empty());
        assert!(request.password.is_empty());
    }
}
