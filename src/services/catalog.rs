//! Book catalog service

use std::sync::Arc;

use crate::{
    cache::LastModifiedRegistry,
    error::AppResult,
    models::{Book, CreateBook, ListQuery, Page, UpdateBook},
    repository::Repository,
    services::webhooks::{events, WebhookService},
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    freshness: Arc<LastModifiedRegistry>,
    webhooks: WebhookService,
}

impl CatalogService {
    pub fn new(
        repository: Repository,
        freshness: Arc<LastModifiedRegistry>,
        webhooks: WebhookService,
    ) -> Self {
        Self {
            repository,
            freshness,
            webhooks,
        }
    }

    /// Search and paginate; invalid paging input is a validation error
    pub async fn search(&self, query: &ListQuery) -> AppResult<Page<Book>> {
        let page = query.page_request()?;
        self.repository.books.search(query.search(), page).await
    }

    pub async fn all(&self) -> AppResult<Vec<Book>> {
        self.repository.books.all().await
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn create(&self, book: CreateBook) -> AppResult<Book> {
        let book = self.repository.books.create(book).await?;
        self.freshness.touch_book(&book.id);
        self.webhooks.notify(events::BOOK_CREATED, &book);
        Ok(book)
    }

    pub async fn update(&self, id: &str, changes: UpdateBook) -> AppResult<Book> {
        self.update_where(id, changes, |_| Ok(())).await
    }

    /// Update guarded by a check on the stored book (e.g. `If-Match`)
    pub async fn update_where<F>(&self, id: &str, changes: UpdateBook, precondition: F) -> AppResult<Book>
    where
        F: FnOnce(&Book) -> AppResult<()>,
    {
        let book = self
            .repository
            .books
            .update_where(id, changes, precondition)
            .await?;
        self.freshness.touch_book(&book.id);
        self.webhooks.notify(events::BOOK_UPDATED, &book);
        Ok(book)
    }

    /// Delete a book together with every borrow that references it
    pub async fn delete(&self, id: &str) -> AppResult<Book> {
        self.delete_where(id, |_| Ok(())).await
    }

    pub async fn delete_where<F>(&self, id: &str, precondition: F) -> AppResult<Book>
    where
        F: FnOnce(&Book) -> AppResult<()>,
    {
        let book = self.repository.books.delete_where(id, precondition).await?;
        let removed = self.repository.borrows.delete_by_book(id).await?;
        if removed > 0 {
            tracing::info!("Deleted {} borrow(s) of book {}", removed, id);
        }
        self.freshness.forget_book(id);
        self.webhooks.notify(events::BOOK_DELETED, &book);
        Ok(book)
    }
}
