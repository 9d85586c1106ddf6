//! Book endpoints with hypermedia links (v2)

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::{
    error::AppResult,
    models::{Book, CreateBook, UpdateBook},
    AppState,
};

use super::ApiJson;

const COLLECTION: &str = "/api/v2/books";
const BORROWS: &str = "/api/v1/borrows";

#[derive(Debug, Serialize)]
pub struct Link {
    pub href: String,
    pub method: &'static str,
}

fn link(href: impl Into<String>, method: &'static str) -> Link {
    Link {
        href: href.into(),
        method,
    }
}

pub type Links = BTreeMap<&'static str, Link>;

/// A book with its `_links`
#[derive(Debug, Serialize)]
pub struct BookResource {
    #[serde(flatten)]
    pub book: Book,
    pub _links: Links,
}

impl BookResource {
    /// `borrow` is only offered while a copy is available
    pub fn new(book: Book, include_collection: bool) -> Self {
        let href = format!("{}/{}", COLLECTION, book.id);
        let mut links = Links::new();
        links.insert("self", link(href.clone(), "GET"));
        links.insert("update", link(href.clone(), "PUT"));
        links.insert("delete", link(href, "DELETE"));
        if include_collection {
            links.insert("collection", link(COLLECTION, "GET"));
        }
        if book.available > 0 {
            links.insert("borrow", link(BORROWS, "POST"));
        }
        Self { book, _links: links }
    }
}

#[derive(Debug, Serialize)]
pub struct Resource<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    pub _links: Links,
}

fn collection_links() -> Links {
    let mut links = Links::new();
    links.insert("collection", link(COLLECTION, "GET"));
    links
}

pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Resource<Vec<BookResource>>>> {
    let books: Vec<BookResource> = state
        .services
        .catalog
        .all()
        .await?
        .into_iter()
        .map(|b| BookResource::new(b, false))
        .collect();

    let mut links = Links::new();
    links.insert("self", link(COLLECTION, "GET"));
    links.insert("create", link(COLLECTION, "POST"));

    Ok(Json(Resource {
        success: true,
        total: Some(books.len()),
        data: Some(books),
        message: None,
        _links: links,
    }))
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Resource<BookResource>>> {
    let book = state.services.catalog.get_by_id(&id).await?;
    Ok(Json(Resource {
        success: true,
        data: Some(BookResource::new(book, true)),
        message: None,
        total: None,
        _links: collection_links(),
    }))
}

pub async fn create_book(
    State(state): State<AppState>,
    ApiJson(book): ApiJson<CreateBook>,
) -> AppResult<(StatusCode, Json<Resource<BookResource>>)> {
    let created = state.services.catalog.create(book).await?;
    Ok((
        StatusCode::CREATED,
        Json(Resource {
            success: true,
            data: Some(BookResource::new(created, true)),
            message: Some("Book created successfully".to_string()),
            total: None,
            _links: collection_links(),
        }),
    ))
}

pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(changes): ApiJson<UpdateBook>,
) -> AppResult<Json<Resource<BookResource>>> {
    let updated = state.services.catalog.update(&id, changes).await?;
    Ok(Json(Resource {
        success: true,
        data: Some(BookResource::new(updated, true)),
        message: Some("Book updated successfully".to_string()),
        total: None,
        _links: collection_links(),
    }))
}

pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Resource<()>>> {
    state.services.catalog.delete(&id).await?;
    Ok(Json(Resource {
        success: true,
        data: None,
        message: Some("Book deleted successfully".to_string()),
        total: None,
        _links: collection_links(),
    }))
}
