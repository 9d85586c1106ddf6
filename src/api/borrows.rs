//! Borrow endpoints (v1)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        borrow::{BorrowQuery, CreateBorrow, HistoryQuery},
        Borrow,
    },
    AppState,
};

use super::{ApiJson, ApiResponse};

/// List borrows, optionally by user and only the open ones
pub async fn list_borrows(
    State(state): State<AppState>,
    Query(query): Query<BorrowQuery>,
) -> AppResult<Json<ApiResponse<Vec<Borrow>>>> {
    let borrows = state.services.loans.list(&query).await?;
    Ok(ApiResponse::ok(borrows))
}

pub async fn get_borrow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Borrow>>> {
    let borrow = state.services.loans.get_by_id(&id).await?;
    Ok(ApiResponse::ok(borrow))
}

pub async fn borrow_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<ApiResponse<Vec<Borrow>>>> {
    let borrows = state.services.loans.history(&query).await?;
    Ok(ApiResponse::ok(borrows))
}

/// Borrow one copy of a book
pub async fn create_borrow(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateBorrow>,
) -> AppResult<(StatusCode, Json<ApiResponse<Borrow>>)> {
    let borrow = state.services.loans.borrow(request).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(borrow, "Book borrowed successfully"),
    ))
}

pub async fn return_borrow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Borrow>>> {
    let borrow = state.services.loans.return_borrow(&id).await?;
    Ok(ApiResponse::with_message(borrow, "Book returned successfully"))
}
