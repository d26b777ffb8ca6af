//! Auth API Endpoints
//!
//! Session-based authentication:
//! - POST /api/login - Password login, establishes a session
//! - POST /api/logout - Revokes the session
//! - GET /api/admin/user - Current user with resolved permissions

use axum::{
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::auth::password_service::PasswordService;
use crate::auth::session_service::SessionStore;
use crate::role::entity::Role;
use crate::shared::api_common::SuccessResponse;
use crate::shared::authorization_service::AuthorizationService;
use crate::shared::error::PortalError;
use crate::shared::middleware::{extract_bearer_token, Authenticated, SESSION_COOKIE_NAME};
use crate::user::entity::UserWithRole;
use crate::user::repository::UserRepository;

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login name
    pub username: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserWithRole,
}

/// Current user info response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
    pub id: String,
    pub username: String,

    /// The user's role, if one is assigned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// Resolved permission names. carte_blanche stays a single entry.
    pub permissions: Vec<String>,
}

/// Auth service state
#[derive(Clone)]
pub struct AuthState {
    pub sessions: Arc<SessionStore>,
    pub user_repo: Arc<UserRepository>,
    pub password_service: Arc<PasswordService>,
    pub authz: Arc<AuthorizationService>,
    /// Whether to set Secure flag on the session cookie
    pub cookie_secure: bool,
    /// SameSite policy for the session cookie
    pub cookie_same_site: String,
    /// Session cookie max-age in seconds
    pub cookie_max_age_secs: i64,
}

impl AuthState {
    /// Create with default cookie settings
    pub fn new(
        sessions: Arc<SessionStore>,
        user_repo: Arc<UserRepository>,
        password_service: Arc<PasswordService>,
        authz: Arc<AuthorizationService>,
    ) -> Self {
        Self {
            sessions,
            user_repo,
            password_service,
            authz,
            cookie_secure: false,
            cookie_same_site: "Lax".to_string(),
            cookie_max_age_secs: 28800,
        }
    }

    /// Configure session cookie settings
    pub fn with_cookie_settings(mut self, secure: bool, same_site: &str, max_age_secs: i64) -> Self {
        self.cookie_secure = secure;
        self.cookie_same_site = same_site.to_string();
        self.cookie_max_age_secs = max_age_secs;
        self
    }

    fn same_site(&self) -> SameSite {
        match self.cookie_same_site.to_lowercase().as_str() {
            "strict" => SameSite::Strict,
            "none" => SameSite::None,
            _ => SameSite::Lax,
        }
    }
}

/// Login with username and password
///
/// Establishes a server-side session and sets the session cookie. The
/// failure response does not reveal whether the username exists.
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    operation_id = "postLogin",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, PortalError> {
    let invalid = || PortalError::unauthorized("Invalid credentials");

    let user = state
        .user_repo
        .find_by_username(&req.username)
        .await?
        .ok_or_else(invalid)?;

    if !state.password_service.verify_password(&req.password, &user.password_hash)? {
        return Err(invalid());
    }

    let token = state.sessions.create(&user.id, &user.username);

    let cookie = Cookie::build((SESSION_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .secure(state.cookie_secure)
        .same_site(state.same_site())
        .max_age(time::Duration::seconds(state.cookie_max_age_secs))
        .build();

    let jar = jar.add(cookie);

    let user = state
        .user_repo
        .find_with_role(&user.id)
        .await?
        .ok_or_else(invalid)?;

    tracing::info!(username = %user.username, "User logged in");

    Ok((jar, Json(LoginResponse { user })))
}

/// Logout
///
/// Revokes the server-side session and clears the session cookie.
#[utoipa::path(
    post,
    path = "/logout",
    tag = "auth",
    operation_id = "postLogout",
    responses(
        (status = 200, description = "Logout successful", body = SuccessResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn logout(
    State(state): State<AuthState>,
    headers: HeaderMap,
    jar: CookieJar,
    _auth: Authenticated,
) -> impl IntoResponse {
    if let Some(token) = session_token(&headers, &jar) {
        state.sessions.revoke(&token);
    }

    // Expire the cookie immediately
    let cookie = Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::ZERO)
        .build();

    let jar = jar.add(cookie);

    (jar, Json(SuccessResponse::ok()))
}

/// Get current user info
///
/// Returns the authenticated user together with its role and resolved
/// permission names.
#[utoipa::path(
    get,
    path = "/admin/user",
    tag = "auth",
    operation_id = "getAdminUser",
    responses(
        (status = 200, description = "Current user info", body = CurrentUserResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "User no longer exists")
    )
)]
pub async fn current_user(
    State(state): State<AuthState>,
    auth: Authenticated,
) -> Result<Json<CurrentUserResponse>, PortalError> {
    let user = state
        .user_repo
        .find_with_role(&auth.user_id)
        .await?
        .ok_or_else(|| PortalError::not_found("User", &auth.user_id))?;

    let permissions = state.authz.permissions_for_user(&auth.user_id).await?;

    Ok(Json(CurrentUserResponse {
        id: user.id,
        username: user.username,
        role: user.role,
        permissions,
    }))
}

fn session_token(headers: &HeaderMap, jar: &CookieJar) -> Option<String> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(extract_bearer_token)
        .map(String::from)
        .or_else(|| jar.get(SESSION_COOKIE_NAME).map(|c| c.value().to_string()))
}

/// Create the auth router
pub fn auth_router(state: AuthState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(login))
        .routes(routes!(logout))
        .routes(routes!(current_user))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_deserialization() {
        let json = r#"{"username":"admin","password":"secret"}"#;
        let req: LoginRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.username, "admin");
        assert_eq!(req.password, "secret");
    }

    #[test]
    fn test_current_user_response_serialization() {
        let response = CurrentUserResponse {
            id: "u-1".to_string(),
            username: "admin".to_string(),
            role: None,
            permissions: vec!["view_forms".to_string()],
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["username"], "admin");
        assert_eq!(json["permissions"][0], "view_forms");
        assert!(json.get("role").is_none());
    }
}
