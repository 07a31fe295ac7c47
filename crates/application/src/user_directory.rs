//! User directory ports and application service.
//!
//! Owns the user lifecycle: listing, active-flag filtering, point lookups,
//! create, partial update, and delete. Every operation is a single round
//! trip to the repository; the service holds no state between calls.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use userdeck_core::AppResult;
use userdeck_domain::{EmailAddress, PersonName, UserId, validate_password};

use crate::PasswordHasher;

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// User record returned by repository queries.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Store-assigned identifier.
    pub id: UserId,
    /// Given name.
    pub forename: String,
    /// Family name.
    pub surname: String,
    /// Canonical lowercase email address.
    pub email: String,
    /// Whether the account may log in and appears in the active listing.
    pub is_active: bool,
    /// Optional date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Argon2id password hash.
    pub password_hash: String,
}

impl UserRecord {
    /// Returns the combined display name, `"{forename} {surname}"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.forename, self.surname)
    }
}

/// Column values for a new user row. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUserRow {
    /// Given name.
    pub forename: String,
    /// Family name.
    pub surname: String,
    /// Canonical lowercase email address.
    pub email: String,
    /// Active flag.
    pub is_active: bool,
    /// Optional date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Argon2id password hash.
    pub password_hash: String,
}

/// Repository port for user persistence.
///
/// `update` and `delete` are silent no-ops when no row matches; the service
/// pre-checks existence so callers see an explicit not-found outcome.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns all users in store order.
    async fn list_all(&self) -> AppResult<Vec<UserRecord>>;

    /// Returns users whose active flag equals `is_active`.
    async fn list_by_active(&self, is_active: bool) -> AppResult<Vec<UserRecord>>;

    /// Finds a user by their identifier.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>>;

    /// Finds a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    /// Inserts a new row and returns the store-assigned identifier.
    async fn insert(&self, row: NewUserRow) -> AppResult<UserId>;

    /// Persists all scalar fields of `record` over the row with the same id.
    async fn update(&self, record: &UserRecord) -> AppResult<()>;

    /// Removes the row with the given id.
    async fn delete(&self, user_id: UserId) -> AppResult<()>;
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Parameters for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserParams {
    /// Given name (required, at most 50 characters).
    pub forename: String,
    /// Family name (required, at most 50 characters).
    pub surname: String,
    /// Email address (required, validated, at most 100 characters).
    pub email: String,
    /// Plaintext password, hashed before storage.
    pub password: String,
    /// Active flag.
    pub is_active: bool,
    /// Optional date of birth.
    pub date_of_birth: Option<NaiveDate>,
}

/// Parameters for updating a user.
#[derive(Debug, Clone)]
pub struct UpdateUserParams {
    /// Identifier of the row to overwrite.
    pub id: UserId,
    /// Given name.
    pub forename: String,
    /// Family name.
    pub surname: String,
    /// Email address.
    pub email: String,
    /// Active flag.
    pub is_active: bool,
    /// Optional date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// New plaintext password. Blank or absent keeps the stored hash.
    pub password: Option<String>,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for user CRUD and lookups.
#[derive(Clone)]
pub struct UserDirectoryService {
    repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl UserDirectoryService {
    /// Creates a new user directory service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            repository,
            password_hasher,
        }
    }

    /// Returns all users, unfiltered, in store order.
    pub async fn get_all(&self) -> AppResult<Vec<UserRecord>> {
        self.repository.list_all().await
    }

    /// Returns users whose active flag equals `is_active`.
    pub async fn filter_by_active(&self, is_active: bool) -> AppResult<Vec<UserRecord>> {
        self.repository.list_by_active(is_active).await
    }

    /// Returns a user by id, if it exists.
    pub async fn get_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        self.repository.find_by_id(user_id).await
    }

    /// Returns a user by email (case-insensitive), if it exists.
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        self.repository.find_by_email(email).await
    }

    /// Validates and creates a user, returning the stored record with its
    /// store-assigned id.
    pub async fn create(&self, params: CreateUserParams) -> AppResult<UserRecord> {
        let forename = PersonName::new(params.forename)?;
        let surname = PersonName::new(params.surname)?;
        let email = EmailAddress::new(params.email)?;
        validate_password(&params.password)?;

        let password_hash = self.password_hasher.hash_password(&params.password)?;

        let row = NewUserRow {
            forename: forename.into(),
            surname: surname.into(),
            email: email.into(),
            is_active: params.is_active,
            date_of_birth: params.date_of_birth,
            password_hash,
        };

        let id = self.repository.insert(row.clone()).await?;

        Ok(UserRecord {
            id,
            forename: row.forename,
            surname: row.surname,
            email: row.email,
            is_active: row.is_active,
            date_of_birth: row.date_of_birth,
            password_hash: row.password_hash,
        })
    }

    /// Overwrites an existing user row.
    ///
    /// Returns `false` without writing when no row has the given id. The
    /// stored password hash is preserved unless a non-blank new password is
    /// supplied, in which case it is re-hashed and overwritten. All other
    /// fields are overwritten unconditionally.
    pub async fn update(&self, params: UpdateUserParams) -> AppResult<bool> {
        let Some(existing) = self.repository.find_by_id(params.id).await? else {
            return Ok(false);
        };

        let forename = PersonName::new(params.forename)?;
        let surname = PersonName::new(params.surname)?;
        let email = EmailAddress::new(params.email)?;

        let password_hash = match params.password {
            Some(ref password) if !password.trim().is_empty() => {
                validate_password(password)?;
                self.password_hasher.hash_password(password)?
            }
            _ => existing.password_hash,
        };

        let record = UserRecord {
            id: params.id,
            forename: forename.into(),
            surname: surname.into(),
            email: email.into(),
            is_active: params.is_active,
            date_of_birth: params.date_of_birth,
            password_hash,
        };

        self.repository.update(&record).await?;
        Ok(true)
    }

    /// Deletes a user by id.
    ///
    /// Returns `false` without touching the store when no row has the id.
    pub async fn delete(&self, user_id: UserId) -> AppResult<bool> {
        if self.repository.find_by_id(user_id).await?.is_none() {
            return Ok(false);
        }

        self.repository.delete(user_id).await?;
        Ok(true)
    }
}
