//! Book endpoints (v1)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{Book, CreateBook, ListQuery, Page, UpdateBook},
    AppState,
};

use super::{ApiJson, ApiResponse};

/// List books with search and pagination
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Page<Book>>>> {
    let page = state.services.catalog.search(&query).await?;
    Ok(ApiResponse::ok(page))
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Book>>> {
    let book = state.services.catalog.get_by_id(&id).await?;
    Ok(ApiResponse::ok(book))
}

pub async fn create_book(
    State(state): State<AppState>,
    ApiJson(book): ApiJson<CreateBook>,
) -> AppResult<(StatusCode, Json<ApiResponse<Book>>)> {
    let created = state.services.catalog.create(book).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(created, "Book created successfully"),
    ))
}

/// Merge the supplied fields over the stored book
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(changes): ApiJson<UpdateBook>,
) -> AppResult<Json<ApiResponse<Book>>> {
    let updated = state.services.catalog.update(&id, changes).await?;
    Ok(ApiResponse::with_message(updated, "Book updated successfully"))
}

/// Delete a book and its borrows
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.catalog.delete(&id).await?;
    Ok(ApiResponse::message("Book deleted successfully"))
}
