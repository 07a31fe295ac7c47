//! Domain value types and invariants.

#![forbid(unsafe_code)]

mod audit;
mod user;

pub use audit::{LogEntryId, UserAction};
pub use user::{
    EMAIL_MAX_LENGTH, EmailAddress, NAME_MAX_LENGTH, PASSWORD_MAX_LENGTH, PersonName, UserId,
    validate_password,
};
