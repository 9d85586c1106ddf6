//! Client-side token storage strategies (v5)
//!
//! The localStorage and sessionStorage logins hand the token to the client
//! in the body. The cookie login keeps it in an HttpOnly cookie that the
//! protected routes read back.

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;

use crate::{
    error::AppResult,
    models::{user::LoginRequest, UserPublic},
    AppState,
};

use super::{
    auth::{ClaimsResponse, ProtectedData, TokenResponse},
    ApiJson, ApiResponse, CookieClaims,
};

#[derive(Serialize)]
pub struct StoredTokenResponse {
    pub storage_method: &'static str,
    #[serde(flatten)]
    pub token: TokenResponse,
}

#[derive(Serialize)]
pub struct CookieLoginResponse {
    pub success: bool,
    pub message: String,
    pub storage_method: &'static str,
    pub expires_in: i64,
    pub user: UserPublic,
}

/// HttpOnly auth cookie scoped to the whole site
fn auth_cookie(name: String, value: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

async fn login_with_body_token(
    state: AppState,
    request: LoginRequest,
    storage_method: &'static str,
) -> AppResult<Json<StoredTokenResponse>> {
    let user = state
        .services
        .users
        .authenticate(request.username, request.password)
        .await?;
    let tokens = &state.services.tokens;
    let issued = tokens.issue(&user)?;
    Ok(Json(StoredTokenResponse {
        storage_method,
        token: TokenResponse::new("Login successful", issued, tokens.expires_in(), Some(user)),
    }))
}

pub async fn login_local_storage(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> AppResult<Json<StoredTokenResponse>> {
    login_with_body_token(state, request, "localStorage").await
}

pub async fn login_session_storage(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> AppResult<Json<StoredTokenResponse>> {
    login_with_body_token(state, request, "sessionStorage").await
}

/// Login that stores the token in an HttpOnly cookie living as long as the token
pub async fn login_cookie(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(request): ApiJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<CookieLoginResponse>)> {
    let user = state
        .services
        .users
        .authenticate(request.username, request.password)
        .await?;
    let tokens = &state.services.tokens;
    let issued = tokens.issue(&user)?;

    let cookie = auth_cookie(
        state.config.auth.cookie_name.clone(),
        issued.token,
        tokens.expires_in(),
    );
    let body = Json(CookieLoginResponse {
        success: true,
        message: "Login successful".to_string(),
        storage_method: "HTTP-Only Cookie",
        expires_in: tokens.expires_in(),
        user,
    });
    Ok((jar.add(cookie), body))
}

pub async fn verify(CookieClaims(claims): CookieClaims) -> Json<ClaimsResponse> {
    Json(ClaimsResponse::new("Token is valid", claims))
}

/// Expire the auth cookie
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<ApiResponse<()>>) {
    let expired = auth_cookie(state.config.auth.cookie_name.clone(), String::new(), 0);
    (jar.add(expired), ApiResponse::message("Logout successful"))
}

pub async fn protected(CookieClaims(claims): CookieClaims) -> Json<ApiResponse<ProtectedData>> {
    ApiResponse::with_message(
        ProtectedData {
            current_user: claims,
            server_time: chrono::Utc::now(),
        },
        "Access granted to protected route",
    )
}
