//! Book endpoints validated by entity tags (v4)
//!
//! Collections carry a weak tag, single books a strong one. `If-None-Match`
//! short-circuits reads with 304; `If-Match` guards updates and deletes
//! against lost updates with 412.

use axum::{
    extract::{Path, State},
    http::{
        header::{CACHE_CONTROL, ETAG, IF_MATCH, IF_NONE_MATCH},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};

use crate::{
    cache::{etag, EntityTag, COLLECTION_POLICY, ITEM_POLICY},
    error::{AppError, AppResult},
    models::{Book, CreateBook, UpdateBook},
    AppState,
};

use super::{
    books_cache::{location, uncached},
    ApiJson, ApiResponse,
};

const COLLECTION: &str = "/api/v4/etag/books";

fn tagged(mut response: Response, tag: &EntityTag, policy: Option<&'static str>) -> Response {
    let headers = response.headers_mut();
    headers.insert(ETAG, tag.header_value());
    if let Some(policy) = policy {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static(policy));
    }
    response
}

/// `If-Match` against the stored book; a mismatch carries the current state
fn precondition(header: Option<&HeaderValue>, book: &Book) -> AppResult<()> {
    let current = EntityTag::strong(book)?;
    if etag::if_match_passes(header, &current) {
        return Ok(());
    }
    Err(AppError::PreconditionFailed {
        message: "Resource has been modified by another request".to_string(),
        current_etag: current.to_string(),
        current: serde_json::to_value(book)?,
    })
}

pub async fn list_books(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    let books = state.services.catalog.all().await?;
    let tag = EntityTag::weak(&books)?;
    if etag::none_match_hit(headers.get(IF_NONE_MATCH), &tag) {
        return Ok(tagged(
            StatusCode::NOT_MODIFIED.into_response(),
            &tag,
            Some(COLLECTION_POLICY),
        ));
    }
    Ok(tagged(
        ApiResponse::ok(books).into_response(),
        &tag,
        Some(COLLECTION_POLICY),
    ))
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let result = async {
        let book = state.services.catalog.get_by_id(&id).await?;
        let tag = EntityTag::strong(&book)?;
        Ok::<_, AppError>((book, tag))
    }
    .await;

    match result {
        Ok((_, tag)) if etag::none_match_hit(headers.get(IF_NONE_MATCH), &tag) => tagged(
            StatusCode::NOT_MODIFIED.into_response(),
            &tag,
            Some(ITEM_POLICY),
        ),
        Ok((book, tag)) => tagged(ApiResponse::ok(book).into_response(), &tag, Some(ITEM_POLICY)),
        Err(e) => uncached(Err(e)),
    }
}

pub async fn create_book(
    State(state): State<AppState>,
    ApiJson(book): ApiJson<CreateBook>,
) -> Response {
    uncached(async {
        let created = state.services.catalog.create(book).await?;
        let tag = EntityTag::strong(&created)?;
        let href = format!("{}/{}", COLLECTION, created.id);
        let mut response = (
            StatusCode::CREATED,
            ApiResponse::with_message(created, "Book created successfully"),
        )
            .into_response();
        location(&mut response, href);
        Ok::<_, AppError>(tagged(response, &tag, None))
    }
    .await)
}

/// Conditional update; a stale `If-Match` is rejected before anything is written
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    ApiJson(changes): ApiJson<UpdateBook>,
) -> Response {
    let if_match = headers.get(IF_MATCH).cloned();
    uncached(async {
        let updated = state
            .services
            .catalog
            .update_where(&id, changes, |book| precondition(if_match.as_ref(), book))
            .await?;
        let tag = EntityTag::strong(&updated)?;
        Ok::<_, AppError>(tagged(
            ApiResponse::with_message(updated, "Book updated successfully").into_response(),
            &tag,
            None,
        ))
    }
    .await)
}

pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let if_match = headers.get(IF_MATCH).cloned();
    uncached(
        state
            .services
            .catalog
            .delete_where(&id, |book| precondition(if_match.as_ref(), book))
            .await
            .map(|_| ApiResponse::message("Book deleted successfully").into_response()),
    )
}
