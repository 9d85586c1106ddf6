//! Book endpoints validated by Cache-Control and Last-Modified (v4)

use axum::{
    extract::{Path, State},
    http::{
        header::{CACHE_CONTROL, IF_MODIFIED_SINCE, LAST_MODIFIED, LOCATION},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};

use crate::{
    cache::{self, Resource, COLLECTION_POLICY, ITEM_REVALIDATE_POLICY, NO_CACHE},
    error::{AppError, AppResult},
    models::{CreateBook, UpdateBook},
    AppState,
};

use super::{ApiJson, ApiResponse};

const COLLECTION: &str = "/api/v4/cache-control/books";

/// Mark any response, success or error, as not cacheable
pub(super) fn uncached(result: AppResult<Response>) -> Response {
    let mut response = result.unwrap_or_else(IntoResponse::into_response);
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
    response
}

pub(super) fn location(response: &mut Response, href: String) {
    if let Ok(value) = HeaderValue::from_str(&href) {
        response.headers_mut().insert(LOCATION, value);
    }
}

fn validated(mut response: Response, policy: &'static str, last_modified: DateTime<Utc>) -> Response {
    let headers = response.headers_mut();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(policy));
    if let Ok(value) = HeaderValue::from_str(&cache::http_date(last_modified)) {
        headers.insert(LAST_MODIFIED, value);
    }
    response
}

fn not_modified(policy: &'static str, last_modified: DateTime<Utc>) -> Response {
    validated(StatusCode::NOT_MODIFIED.into_response(), policy, last_modified)
}

/// Every book, cacheable for 60 seconds
pub async fn list_books(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    let last_modified = state.services.freshness.get(&Resource::books());
    if cache::not_modified_since(last_modified, headers.get(IF_MODIFIED_SINCE)) {
        return Ok(not_modified(COLLECTION_POLICY, last_modified));
    }

    let books = state.services.catalog.all().await?;
    Ok(validated(
        ApiResponse::ok(books).into_response(),
        COLLECTION_POLICY,
        last_modified,
    ))
}

/// One book, cacheable for 120 seconds with mandatory revalidation.
///
/// A known timestamp is checked before the store is read. Books are only
/// stamped once they have been found.
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let resource = Resource::book(&id);
    if let Some(last_modified) = state.services.freshness.peek(&resource) {
        if cache::not_modified_since(last_modified, headers.get(IF_MODIFIED_SINCE)) {
            return not_modified(ITEM_REVALIDATE_POLICY, last_modified);
        }
    }

    match state.services.catalog.get_by_id(&id).await {
        Ok(book) => {
            let last_modified = state.services.freshness.get(&resource);
            if cache::not_modified_since(last_modified, headers.get(IF_MODIFIED_SINCE)) {
                return not_modified(ITEM_REVALIDATE_POLICY, last_modified);
            }
            validated(
                ApiResponse::ok(book).into_response(),
                ITEM_REVALIDATE_POLICY,
                last_modified,
            )
        }
        Err(e) => uncached(Err(e)),
    }
}

pub async fn create_book(
    State(state): State<AppState>,
    ApiJson(book): ApiJson<CreateBook>,
) -> Response {
    uncached(async {
        let created = state.services.catalog.create(book).await?;
        let href = format!("{}/{}", COLLECTION, created.id);
        let mut response = (
            StatusCode::CREATED,
            ApiResponse::with_message(created, "Book created successfully"),
        )
            .into_response();
        location(&mut response, href);
        Ok::<_, AppError>(response)
    }
    .await)
}

pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(changes): ApiJson<UpdateBook>,
) -> Response {
    uncached(
        state
            .services
            .catalog
            .update(&id, changes)
            .await
            .map(|book| ApiResponse::with_message(book, "Book updated successfully").into_response()),
    )
}

pub async fn delete_book(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    uncached(
        state
            .services
            .catalog
            .delete(&id)
            .await
            .map(|_| ApiResponse::message("Book deleted successfully").into_response()),
    )
}
