//! Web server setup and lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::auth::TokenService;
use crate::storage::FileStorage;
use crate::web::handlers::AppState;
use crate::web::router::{create_health_router, create_router};
use crate::{AppError, Config, Database, Result};

/// The HTTP server wrapping the API router.
///
/// Construction resolves the signing secret and fails fast when it is
/// missing, so a misconfigured deployment never binds a socket.
pub struct WebServer {
    addr: SocketAddr,
    router: axum::Router,
}

impl WebServer {
    /// Build a server from configuration and an open database.
    pub fn new(config: &Config, db: Database) -> Result<Self> {
        let secret = config.auth.resolve_secret().ok_or_else(|| {
            AppError::Config(
                "no signing secret: set JWT_SECRET or [auth] jwt_secret".to_string(),
            )
        })?;

        let tokens = Arc::new(
            TokenService::new(&secret, config.auth.roles.clone())
                .map_err(|e| AppError::Config(e.to_string()))?,
        );

        let storage = FileStorage::new(&config.files.storage_path)?;

        let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid bind address: {e}")))?;

        let state = AppState::new(db, tokens, storage);
        let router = create_router(
            state,
            &config.server.cors_origins,
            config.files.max_upload_bytes(),
        )
        .merge(create_health_router());

        Ok(Self { addr, router })
    }

    /// The address the server will bind to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Bind and serve until the process is stopped.
    pub async fn run(self) -> Result<()> {
        info!("Listening on {}", self.addr);
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}

impl std::fmt::Debug for WebServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebServer").field("addr", &self.addr).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(storage_path: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.auth.jwt_secret = "test-secret".to_string();
        config.files.storage_path = storage_path.to_string_lossy().into_owned();
        config
    }

    #[tokio::test]
    async fn test_new_with_secret() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_in_memory().await.unwrap();

        let server = WebServer::new(&test_config(dir.path()), db).unwrap();
        assert_eq!(server.addr().port(), 8080);
    }

    #[tokio::test]
    async fn test_new_rejects_bad_bind_address() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_in_memory().await.unwrap();

        let mut config = test_config(dir.path());
        config.server.host = "not an address".to_string();

        let err = WebServer::new(&config, db).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
