//! Web API for snippetd.
//!
//! An axum HTTP layer over the credential, token, database, and storage
//! modules: registration and login issue session tokens in a cookie, and
//! authenticated clients manage uploaded file metadata and tags.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::{ApiError, ErrorCode};
pub use router::{create_health_router, create_router};
pub use server::WebServer;
