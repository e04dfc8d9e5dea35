//! Tag handlers.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

use crate::db::TagRepository;
use crate::web::dto::{ApiResponse, TagCreateRequest, TagInfo};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// GET /api/tags - List all tags, sorted by name.
pub async fn list_tags(
    State(state): State<Arc<AppState>>,
    AuthUser(_claims): AuthUser,
) -> Result<Json<ApiResponse<Vec<TagInfo>>>, ApiError> {
    let tags = TagRepository::new(state.db.pool()).list().await?;
    let tags = tags.iter().map(TagInfo::from).collect();
    Ok(Json(ApiResponse::new(tags)))
}

/// POST /api/tags - Create a tag.
pub async fn create_tag(
    State(state): State<Arc<AppState>>,
    AuthUser(_claims): AuthUser,
    Json(req): Json<TagCreateRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TagInfo>>), ApiError> {
    req.validate().map_err(ApiError::from_validation_errors)?;

    let repo = TagRepository::new(state.db.pool());
    let tag = repo.create(&req.name).await.map_err(|e| {
        if e.to_string().contains("UNIQUE") {
            ApiError::conflict("Tag already exists")
        } else {
            tracing::error!("Tag creation failed: {}", e);
            ApiError::internal("Failed to create tag")
        }
    })?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(TagInfo::from(&tag)))))
}
