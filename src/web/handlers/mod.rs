//! API handlers for the Web API.

pub mod auth;
pub mod file;
pub mod tag;

pub use auth::*;
pub use file::*;
pub use tag::*;

use std::sync::Arc;

use crate::auth::TokenService;
use crate::db::{User, UserRepository};
use crate::storage::FileStorage;
use crate::web::error::ApiError;
use crate::Database;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle (pool-backed, cheap to clone).
    pub db: Database,
    /// Session token issuer/validator.
    pub tokens: Arc<TokenService>,
    /// Uploaded file storage.
    pub storage: FileStorage,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Database, tokens: Arc<TokenService>, storage: FileStorage) -> Self {
        Self {
            db,
            tokens,
            storage,
        }
    }

    /// Look up the user record behind a token subject.
    ///
    /// A valid token whose subject no longer exists (account removed
    /// since issuance) is treated as unauthorized.
    pub async fn current_user(&self, subject: &str) -> Result<User, ApiError> {
        UserRepository::new(self.db.pool())
            .get_by_email(subject)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Unknown user"))
    }
}
