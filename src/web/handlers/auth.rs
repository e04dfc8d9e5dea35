//! Authentication handlers.

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;
use validator::Validate;

use crate::auth::TOKEN_TTL_SECS;
use crate::db::{NewUser, UserRepository};
use crate::web::dto::{ApiResponse, LoginRequest, LoginResponse, MeResponse, RegisterRequest, UserInfo};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::{AuthUser, TOKEN_COOKIE};

/// Build the session cookie carrying a freshly issued token.
fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Issue a token for the given subject and add it to the jar.
fn issue_session(state: &AppState, subject: &str, jar: CookieJar) -> Result<CookieJar, ApiError> {
    let token = state.tokens.issue(subject).map_err(|e| {
        tracing::error!("Failed to issue session token: {}", e);
        ApiError::internal("Failed to create session")
    })?;
    Ok(jar.add(session_cookie(token)))
}

/// POST /api/auth/register - User registration.
pub async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<ApiResponse<LoginResponse>>), ApiError> {
    req.validate().map_err(ApiError::from_validation_errors)?;

    let password_hash = crate::hash_password(&req.password)
        .map_err(|e| ApiError::unprocessable(format!("Password error: {e}")))?;

    let repo = UserRepository::new(state.db.pool());
    let user = repo
        .create(&NewUser::new(&req.email, password_hash))
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                ApiError::conflict("Email already registered")
            } else {
                tracing::error!("User creation failed: {}", e);
                ApiError::internal("Failed to create user")
            }
        })?;

    let jar = issue_session(&state, &user.email, jar)?;

    let response = LoginResponse {
        user: UserInfo::from(&user),
        expires_in: TOKEN_TTL_SECS,
    };

    Ok((StatusCode::CREATED, jar, Json(ApiResponse::new(response))))
}

/// POST /api/auth/login - User login.
///
/// Looks up the stored credential by the submitted email and verifies the
/// submitted password against the stored hash. Unknown email and wrong
/// password produce the same response.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<LoginResponse>>), ApiError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let repo = UserRepository::new(state.db.pool());
    let user = repo
        .get_by_email(&req.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    let verified = match crate::verify_password(&req.password, &user.password) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!(user_id = user.id, "Stored password hash is invalid: {}", e);
            false
        }
    };
    if !verified {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let jar = issue_session(&state, &user.email, jar)?;

    let response = LoginResponse {
        user: UserInfo::from(&user),
        expires_in: TOKEN_TTL_SECS,
    };

    Ok((jar, Json(ApiResponse::new(response))))
}

/// POST /api/auth/logout - User logout.
///
/// Invalidation is client-side only: the cookie is cleared and the token
/// simply runs out. There is no server-side revocation store.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<ApiResponse<()>>) {
    let jar = jar.remove(Cookie::build(TOKEN_COOKIE).path("/").build());
    (jar, Json(ApiResponse::new(())))
}

/// GET /api/auth/me - Current session info.
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ApiResponse<MeResponse>>, ApiError> {
    let user = state.current_user(&claims.sub).await?;

    let response = MeResponse {
        user: UserInfo::from(&user),
        role: claims.role().to_string(),
    };

    Ok(Json(ApiResponse::new(response)))
}
