//! User endpoints (v1)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        user::{CreateUser, UpdateUser},
        ListQuery, Page, UserPublic,
    },
    AppState,
};

use super::{ApiJson, ApiResponse};

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Page<UserPublic>>>> {
    let page = state.services.users.search(&query).await?;
    Ok(ApiResponse::ok(page))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<UserPublic>>> {
    let user = state.services.users.get_by_id(&id).await?;
    Ok(ApiResponse::ok(user))
}

/// Register a new account
pub async fn register_user(
    State(state): State<AppState>,
    ApiJson(user): ApiJson<CreateUser>,
) -> AppResult<(StatusCode, Json<ApiResponse<UserPublic>>)> {
    let created = state.services.users.register(user).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(created, "User registered successfully"),
    ))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(changes): ApiJson<UpdateUser>,
) -> AppResult<Json<ApiResponse<UserPublic>>> {
    let updated = state.services.users.update(&id, changes).await?;
    Ok(ApiResponse::with_message(updated, "User updated successfully"))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.users.delete(&id).await?;
    Ok(ApiResponse::message("User deleted successfully"))
}
