//! Authentication endpoints: v1 password login and v3 stateless JWT

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{user::LoginRequest, UserClaims, UserPublic},
    services::tokens::IssuedToken,
    AppState,
};

use super::{ApiJson, ApiResponse, BearerClaims};

pub const TOKEN_TYPE: &str = "Bearer";

/// Check credentials and return the account, without issuing a token (v1)
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<UserPublic>>> {
    let user = state
        .services
        .users
        .authenticate(request.username, request.password)
        .await?;
    Ok(ApiResponse::with_message(user, "Login successful"))
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub token_type: &'static str,
    /// Seconds until expiry
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserPublic>,
}

impl TokenResponse {
    pub fn new(message: &str, issued: IssuedToken, expires_in: i64, user: Option<UserPublic>) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            expires_at: timestamp(issued.claims.exp),
            token: issued.token,
            token_type: TOKEN_TYPE,
            expires_in,
            user,
        }
    }
}

/// Claims plus their instants rendered as dates
#[derive(Serialize)]
pub struct ClaimsResponse {
    pub success: bool,
    pub message: String,
    pub user: UserClaims,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl ClaimsResponse {
    pub fn new(message: &str, claims: UserClaims) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            issued_at: timestamp(claims.iat),
            expires_at: timestamp(claims.exp),
            user: claims,
        }
    }
}

#[derive(Serialize)]
pub struct ProtectedData {
    pub current_user: UserClaims,
    pub server_time: DateTime<Utc>,
}

fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

/// Password login returning a bearer token (v3)
pub async fn token_login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let user = state
        .services
        .users
        .authenticate(request.username, request.password)
        .await?;
    let tokens = &state.services.tokens;
    let issued = tokens.issue(&user)?;
    Ok(Json(TokenResponse::new(
        "Login successful",
        issued,
        tokens.expires_in(),
        Some(user),
    )))
}

pub async fn verify(BearerClaims(claims): BearerClaims) -> Json<ClaimsResponse> {
    Json(ClaimsResponse::new("Token is valid", claims))
}

#[derive(Deserialize)]
pub struct DecodeRequest {
    pub token: Option<String>,
}

/// Inspect a token without authorizing anything; failures are 400 with the reason
pub async fn decode(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<DecodeRequest>,
) -> AppResult<Json<ClaimsResponse>> {
    let token = request
        .token
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Token is required".to_string()))?;

    let claims = state
        .services
        .tokens
        .decode(token.trim())
        .map_err(|reason| AppError::Validation(reason.to_string()))?;
    Ok(Json(ClaimsResponse::new("Token decoded successfully", claims)))
}

pub async fn protected(BearerClaims(claims): BearerClaims) -> Json<ApiResponse<ProtectedData>> {
    ApiResponse::with_message(
        ProtectedData {
            current_user: claims,
            server_time: Utc::now(),
        },
        "Access granted to protected route",
    )
}

/// New token for the same identity
pub async fn refresh(
    State(state): State<AppState>,
    BearerClaims(claims): BearerClaims,
) -> AppResult<Json<TokenResponse>> {
    let tokens = &state.services.tokens;
    let issued = tokens.refresh(&claims)?;
    Ok(Json(TokenResponse::new(
        "Token refreshed successfully",
        issued,
        tokens.expires_in(),
        None,
    )))
}
