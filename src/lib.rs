//! snippetd - a small file snippet backend.
//!
//! Users register and log in with email and password; passwords are
//! stored as Argon2id hashes and sessions travel as HS256 JWTs in a
//! cookie. Authenticated users upload files, manage their metadata, and
//! organize them with tags. SQLite holds the metadata, a flat directory
//! holds the bytes.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod storage;
pub mod web;

pub use auth::{
    hash_password, validate_password, verify_password, PasswordError, SessionClaims, TokenError,
    TokenService, DEFAULT_ROLE, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH, TOKEN_ISSUER,
    TOKEN_TTL_SECS,
};
pub use config::Config;
pub use db::Database;
pub use error::{AppError, Result};
pub use storage::FileStorage;
pub use web::{ApiError, WebServer};
