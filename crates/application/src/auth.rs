//! Authentication ports and login service.
//!
//! Login failures are deliberately indistinguishable to the caller: unknown
//! email, inactive account, and wrong password all surface the same
//! `Unauthorized` message so credentials cannot be enumerated.

use std::sync::Arc;

use userdeck_core::{AppError, AppResult};
use userdeck_domain::{UserAction, UserId};

use crate::{AuditLogService, UserDirectoryService};

/// Generic failure message shared by every rejected credential check.
const INVALID_CREDENTIALS: &str = "invalid credentials";

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Port for password hashing operations. Keeps the application layer free of
/// direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password for storage.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

/// Identity payload carried by a signed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaims {
    /// Token subject, the user id.
    pub user_id: UserId,
    /// Canonical email address.
    pub email: String,
    /// Given name.
    pub given_name: String,
    /// Family name.
    pub family_name: String,
    /// Combined display name, `"{forename} {surname}"`.
    pub display_name: String,
}

/// Port for signing and verifying identity tokens.
pub trait TokenIssuer: Send + Sync {
    /// Signs a token carrying the given claims.
    fn issue(&self, claims: &IdentityClaims) -> AppResult<String>;

    /// Verifies a token and returns its identity claims.
    fn verify(&self, token: &str) -> AppResult<IdentityClaims>;
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginSession {
    /// Signed bearer token for subsequent requests.
    pub token: String,
    /// Authenticated user's identifier.
    pub user_id: UserId,
    /// Authenticated user's given name.
    pub forename: String,
    /// Authenticated user's email.
    pub email: String,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service issuing signed identity tokens for valid credentials.
#[derive(Clone)]
pub struct AuthService {
    users: UserDirectoryService,
    audit_log: AuditLogService,
    password_hasher: Arc<dyn PasswordHasher>,
    token_issuer: Arc<dyn TokenIssuer>,
}

impl AuthService {
    /// Creates a new authentication service.
    #[must_use]
    pub fn new(
        users: UserDirectoryService,
        audit_log: AuditLogService,
        password_hasher: Arc<dyn PasswordHasher>,
        token_issuer: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            users,
            audit_log,
            password_hasher,
            token_issuer,
        }
    }

    /// Authenticates with email and password and issues a signed token.
    ///
    /// Blank input is a validation error surfaced before any store access.
    /// Every credential failure returns the same `Unauthorized` message; a
    /// dummy hash is computed on the paths that skip verification so the
    /// response time does not reveal which check failed.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginSession> {
        if email.trim().is_empty() || password.trim().is_empty() {
            return Err(AppError::Validation(
                "email and password are required".to_owned(),
            ));
        }

        let Some(user) = self.users.get_by_email(email).await? else {
            let _ = self.password_hasher.hash_password(password);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_owned()));
        };

        if !user.is_active {
            let _ = self.password_hasher.hash_password(password);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_owned()));
        }

        let password_valid = self
            .password_hasher
            .verify_password(password, &user.password_hash)?;

        if !password_valid {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_owned()));
        }

        self.audit_log
            .record(
                user.id,
                UserAction::LoggedIn,
                Some("user logged in".to_owned()),
                Some(user.email.clone()),
            )
            .await?;

        let claims = IdentityClaims {
            user_id: user.id,
            email: user.email.clone(),
            given_name: user.forename.clone(),
            family_name: user.surname.clone(),
            display_name: user.display_name(),
        };

        let token = self.token_issuer.issue(&claims)?;

        Ok(LoginSession {
            token,
            user_id: user.id,
            forename: user.forename,
            email: user.email,
        })
    }

    /// Verifies a bearer token and returns the identity it carries.
    pub fn verify_token(&self, token: &str) -> AppResult<IdentityClaims> {
        self.token_issuer.verify(token)
    }
}
