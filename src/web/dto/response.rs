//! Response DTOs for the Web API.

use serde::Serialize;

use crate::db::{FileRecord, Tag, User};

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    /// Response data.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PaginationMeta,
}

impl<T: Serialize> PaginatedResponse<T> {
    /// Create a new paginated response.
    pub fn new(data: Vec<T>, page: i64, per_page: i64, total: i64) -> Self {
        Self {
            data,
            meta: PaginationMeta {
                page,
                per_page,
                total,
            },
        }
    }
}

/// Pagination metadata.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: i64,
    /// Items per page.
    pub per_page: i64,
    /// Total number of items.
    pub total: i64,
}

/// User information in responses. Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: i64,
    /// Login email.
    pub email: String,
    /// Account creation timestamp.
    pub created_at: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            created_at: user.created_at.clone(),
        }
    }
}

/// Login/registration response. The session token itself travels in the
/// `token` cookie, not in the body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// User information.
    pub user: UserInfo,
    /// Session lifetime in seconds.
    pub expires_in: u64,
}

/// Current session response (for /api/auth/me).
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// User information.
    pub user: UserInfo,
    /// Role carried by the presented token.
    pub role: String,
}

/// Tag information.
#[derive(Debug, Serialize)]
pub struct TagInfo {
    /// Tag ID.
    pub id: i64,
    /// Tag name.
    pub name: String,
}

impl From<&Tag> for TagInfo {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name.clone(),
        }
    }
}

/// File metadata in responses.
#[derive(Debug, Serialize)]
pub struct FileInfo {
    /// File ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Stored name in the upload directory.
    pub file_path: String,
    /// Uploading user ID.
    pub user_id: i64,
    /// Linked tags.
    pub tags: Vec<TagInfo>,
    /// Creation timestamp.
    pub created_at: String,
    /// Last modification timestamp.
    pub updated_at: String,
}

impl FileInfo {
    /// Assemble a response from a record and its tags.
    pub fn from_record(record: FileRecord, tags: &[Tag]) -> Self {
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            file_path: record.file_path,
            user_id: record.user_id,
            tags: tags.iter().map(TagInfo::from).collect(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
