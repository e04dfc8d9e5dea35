//! File metadata handlers.

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{FileRecord, FileRepository, FileUpdate, NewFile, TagRepository};
use crate::web::dto::{
    ApiResponse, FileInfo, FileUpdateRequest, PaginatedResponse, PaginationQuery,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;
use crate::SessionClaims;

/// Generate a stored name that is not yet taken.
///
/// UUIDv4 collisions are not really expected; the loop re-rolls against
/// the files table just in case.
async fn generate_unique_name(repo: &FileRepository<'_>) -> Result<String, ApiError> {
    let mut candidate = Uuid::new_v4().to_string();
    while repo.path_exists(&candidate).await? {
        candidate = Uuid::new_v4().to_string();
    }
    Ok(candidate)
}

/// Reject callers that neither own the file nor carry the admin role.
async fn authorize_owner(
    state: &AppState,
    claims: &SessionClaims,
    file: &FileRecord,
) -> Result<(), ApiError> {
    if claims.is_admin() {
        return Ok(());
    }
    let user = state.current_user(&claims.sub).await?;
    if file.user_id != user.id {
        return Err(ApiError::forbidden("Not the file owner"));
    }
    Ok(())
}

/// Assemble the response DTO for a record, loading its tags.
async fn file_response(state: &AppState, record: FileRecord) -> Result<FileInfo, ApiError> {
    let tags = TagRepository::new(state.db.pool())
        .for_file(record.id)
        .await?;
    Ok(FileInfo::from_record(record, &tags))
}

/// GET /api/files - List file metadata, paginated.
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    AuthUser(_claims): AuthUser,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<PaginatedResponse<FileInfo>>, ApiError> {
    let repo = FileRepository::new(state.db.pool());
    let (page, per_page) = pagination.clamp();
    let (limit, offset) = pagination.limit_offset();

    let records = repo.list(limit, offset).await?;
    let total = repo.count().await?;

    let mut files = Vec::with_capacity(records.len());
    for record in records {
        files.push(file_response(&state, record).await?);
    }

    Ok(Json(PaginatedResponse::new(files, page, per_page, total)))
}

/// POST /api/files - Upload a file with its metadata.
///
/// Multipart fields: `file` (required), `name` (required), `description`
/// (optional), `tags` (optional JSON array of tag names).
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<FileInfo>>, ApiError> {
    let mut name: Option<String> = None;
    let mut description = String::new();
    let mut tag_names: Vec<String> = Vec::new();
    let mut content: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart request: {e}")))?
    {
        match field.name() {
            Some("name") => {
                name = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(format!("Invalid name field: {e}")))?,
                );
            }
            Some("description") => {
                description = field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Invalid description field: {e}"))
                })?;
            }
            Some("tags") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid tags field: {e}")))?;
                tag_names = serde_json::from_str(&raw)
                    .map_err(|_| ApiError::bad_request("tags must be a JSON array of strings"))?;
            }
            Some("file") => {
                content = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::bad_request(format!("Invalid file field: {e}")))?
                        .to_vec(),
                );
            }
            _ => {}
        }
    }

    let name = name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::bad_request("name is required"))?;
    let content = content.ok_or_else(|| ApiError::bad_request("file is required"))?;

    let user = state.current_user(&claims.sub).await?;

    let file_repo = FileRepository::new(state.db.pool());
    let stored_name = generate_unique_name(&file_repo).await?;

    state.storage.save(&content, &stored_name).map_err(|e| {
        tracing::error!("Failed to store uploaded file: {}", e);
        ApiError::internal("Failed to store uploaded file")
    })?;

    let record = file_repo
        .create(&NewFile {
            name,
            description,
            file_path: stored_name,
            user_id: user.id,
        })
        .await?;

    let tag_repo = TagRepository::new(state.db.pool());
    for tag_name in &tag_names {
        let tag = tag_repo.get_or_create(tag_name).await?;
        tag_repo.attach(record.id, tag.id).await?;
    }

    tracing::info!(file_id = record.id, user_id = user.id, "File uploaded");

    let response = file_response(&state, record).await?;
    Ok(Json(ApiResponse::new(response)))
}

/// GET /api/files/:id - Get file metadata.
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    AuthUser(_claims): AuthUser,
    Path(file_id): Path<i64>,
) -> Result<Json<ApiResponse<FileInfo>>, ApiError> {
    let record = FileRepository::new(state.db.pool())
        .get_by_id(file_id)
        .await?
        .ok_or_else(|| ApiError::not_found("File not found"))?;

    let response = file_response(&state, record).await?;
    Ok(Json(ApiResponse::new(response)))
}

/// PATCH /api/files/:id - Update file metadata.
pub async fn update_file(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(file_id): Path<i64>,
    Json(req): Json<FileUpdateRequest>,
) -> Result<Json<ApiResponse<FileInfo>>, ApiError> {
    let repo = FileRepository::new(state.db.pool());
    let record = repo
        .get_by_id(file_id)
        .await?
        .ok_or_else(|| ApiError::not_found("File not found"))?;

    authorize_owner(&state, &claims, &record).await?;

    let update = FileUpdate {
        name: req.name,
        description: req.description,
    };
    let updated = repo
        .update(file_id, &update)
        .await?
        .ok_or_else(|| ApiError::not_found("File not found"))?;

    let response = file_response(&state, updated).await?;
    Ok(Json(ApiResponse::new(response)))
}

/// DELETE /api/files/:id - Delete a file and its stored bytes.
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(file_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let repo = FileRepository::new(state.db.pool());
    let record = repo
        .get_by_id(file_id)
        .await?
        .ok_or_else(|| ApiError::not_found("File not found"))?;

    authorize_owner(&state, &claims, &record).await?;

    // Metadata first; orphaned bytes are preferable to a dangling row
    repo.delete(file_id).await?;

    if let Err(e) = state.storage.delete(&record.file_path) {
        tracing::warn!(file_id, "Failed to delete stored bytes: {}", e);
    }

    tracing::info!(file_id, "File deleted");

    Ok(Json(ApiResponse::new(())))
}
