//! Router setup for the Web API.

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    middleware::{self, Next},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::web::handlers::{self, AppState};
use crate::web::middleware::{create_cors_layer, token_auth};

/// Create the API router with all routes and middleware.
pub fn create_router(
    state: AppState,
    cors_origins: &[String],
    max_upload_bytes: usize,
) -> Router {
    let tokens = state.tokens.clone();
    let state = Arc::new(state);

    let auth_routes = Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/me", get(handlers::me));

    let file_routes = Router::new()
        .route("/", get(handlers::list_files).post(handlers::upload_file))
        .route(
            "/:id",
            get(handlers::get_file)
                .patch(handlers::update_file)
                .delete(handlers::delete_file),
        );

    let tag_routes = Router::new().route("/", get(handlers::list_tags).post(handlers::create_tag));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/files", file_routes)
        .nest("/api/tags", tag_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(
                    move |request: Request<Body>, next: Next| {
                        token_auth(tokens.clone(), request, next)
                    },
                )),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

/// Create the health check router. Kept outside the API middleware stack
/// so probes never touch auth or CORS.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(|| async { "OK" }))
}
