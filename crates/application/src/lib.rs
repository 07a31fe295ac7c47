//! Application services and the ports they depend on.

#![forbid(unsafe_code)]

mod audit_log;
mod auth;
mod user_directory;

pub use audit_log::{
    AuditLogRepository, AuditLogService, DEFAULT_PAGE_SIZE, DETAILS_MAX_LENGTH, LogPage,
    LogSearch, NewLogEntry, PERFORMED_BY_MAX_LENGTH, UserLogRecord,
};
pub use auth::{AuthService, IdentityClaims, LoginSession, PasswordHasher, TokenIssuer};
pub use user_directory::{
    CreateUserParams, NewUserRow, UpdateUserParams, UserDirectoryService, UserRecord,
    UserRepository,
};
