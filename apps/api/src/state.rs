use userdeck_application::{AuditLogService, AuthService, UserDirectoryService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_directory: UserDirectoryService,
    pub audit_log: AuditLogService,
    pub auth_service: AuthService,
}
