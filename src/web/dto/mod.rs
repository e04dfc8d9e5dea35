//! Request and response DTOs for the Web API.

mod request;
mod response;

pub use request::{
    FileUpdateRequest, LoginRequest, PaginationQuery, RegisterRequest, TagCreateRequest,
};
pub use response::{
    ApiResponse, FileInfo, LoginResponse, MeResponse, PaginatedResponse, PaginationMeta, TagInfo,
    UserInfo,
};
