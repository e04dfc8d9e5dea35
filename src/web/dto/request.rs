//! Request DTOs for the Web API.

use serde::Deserialize;
use validator::{Validate, ValidationError};

/// User registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login email.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Password.
    #[validate(custom(function = password_bounds))]
    pub password: String,
}

/// Password length rule, counted in bytes to match the credential store.
fn password_bounds(password: &str) -> Result<(), ValidationError> {
    if crate::validate_password(password).is_err() {
        let mut error = ValidationError::new("length");
        error.message = Some("Password must be between 8 and 128 bytes".into());
        return Err(error);
    }
    Ok(())
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Partial file metadata update.
#[derive(Debug, Deserialize)]
pub struct FileUpdateRequest {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Tag creation request.
#[derive(Debug, Deserialize, Validate)]
pub struct TagCreateRequest {
    /// Tag name.
    #[validate(length(min = 1, max = 64, message = "Tag name must be 1-64 characters"))]
    pub name: String,
}

/// Pagination query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationQuery {
    /// Page number (1-based).
    pub page: Option<i64>,
    /// Items per page.
    pub page_size: Option<i64>,
}

impl PaginationQuery {
    /// Clamp the raw query values into a usable (page, per_page) pair.
    ///
    /// page <= 0 becomes 1; page_size <= 0 becomes 10, above 100 becomes 100.
    pub fn clamp(&self) -> (i64, i64) {
        let page = match self.page.unwrap_or(1) {
            p if p <= 0 => 1,
            p => p,
        };
        let per_page = match self.page_size.unwrap_or(10) {
            s if s <= 0 => 10,
            s if s > 100 => 100,
            s => s,
        };
        (page, per_page)
    }

    /// The LIMIT/OFFSET pair for the clamped values.
    pub fn limit_offset(&self) -> (i64, i64) {
        let (page, per_page) = self.clamp();
        (per_page, (page - 1) * per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn query(page: Option<i64>, page_size: Option<i64>) -> PaginationQuery {
        PaginationQuery { page, page_size }
    }

    #[test]
    fn test_pagination_defaults() {
        assert_eq!(query(None, None).clamp(), (1, 10));
    }

    #[test]
    fn test_pagination_clamps_page() {
        assert_eq!(query(Some(0), None).clamp(), (1, 10));
        assert_eq!(query(Some(-5), None).clamp(), (1, 10));
        assert_eq!(query(Some(3), None).clamp(), (3, 10));
    }

    #[test]
    fn test_pagination_clamps_page_size() {
        assert_eq!(query(None, Some(0)).clamp(), (1, 10));
        assert_eq!(query(None, Some(-1)).clamp(), (1, 10));
        assert_eq!(query(None, Some(101)).clamp(), (1, 100));
        assert_eq!(query(None, Some(25)).clamp(), (1, 25));
    }

    #[test]
    fn test_limit_offset() {
        assert_eq!(query(Some(1), Some(20)).limit_offset(), (20, 0));
        assert_eq!(query(Some(3), Some(20)).limit_offset(), (20, 40));
    }

    #[test]
    fn test_register_request_validation() {
        let req = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
        };
        assert!(req.validate().is_err());

        let req = RegisterRequest {
            email: "test@test.com".to_string(),
            password: "short".to_string(),
        };
        assert!(req.validate().is_err());

        let req = RegisterRequest {
            email: "test@test.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_password_bounds_count_bytes() {
        // 100 two-byte characters: passes a character count, fails in bytes
        let req = RegisterRequest {
            email: "test@test.com".to_string(),
            password: "ü".repeat(100),
        };
        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("password"));

        // 64 two-byte characters fit within 128 bytes
        let req = RegisterRequest {
            email: "test@test.com".to_string(),
            password: "ü".repeat(64),
        };
        assert!(req.validate().is_ok());
    }
}
