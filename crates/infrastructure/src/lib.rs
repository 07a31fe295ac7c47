//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_audit_log_repository;
mod in_memory_user_repository;
mod jwt_token_issuer;
mod postgres_audit_log_repository;
mod postgres_user_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_audit_log_repository::InMemoryAuditLogRepository;
pub use in_memory_user_repository::InMemoryUserRepository;
pub use jwt_token_issuer::JwtTokenIssuer;
pub use postgres_audit_log_repository::PostgresAuditLogRepository;
pub use postgres_user_repository::PostgresUserRepository;
