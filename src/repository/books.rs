//! Books repository

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Book, CreateBook, Page, PageRequest, UpdateBook},
    storage::{JsonCollection, Mutation},
};

#[derive(Clone)]
pub struct BooksRepository {
    collection: Arc<JsonCollection<Book>>,
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Book with id {} not found", id))
}

impl BooksRepository {
    pub fn new(collection: Arc<JsonCollection<Book>>) -> Self {
        Self { collection }
    }

    /// Every book in storage order
    pub async fn all(&self) -> AppResult<Vec<Book>> {
        self.collection.read().await
    }

    /// Search title/author and paginate
    pub async fn search(&self, search: Option<&str>, page: PageRequest) -> AppResult<Page<Book>> {
        let mut books = self.collection.read().await?;
        if let Some(needle) = search {
            books.retain(|b| b.matches(needle));
        }
        Ok(page.paginate(books))
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Book> {
        self.collection
            .read()
            .await?
            .into_iter()
            .find(|b| b.id == id)
            .ok_or_else(|| not_found(id))
    }

    pub async fn create(&self, book: CreateBook) -> AppResult<Book> {
        self.collection
            .mutate(|books| {
                let book = book.into_book(JsonCollection::<Book>::next_id(books))?;
                books.push(book.clone());
                Ok(Mutation::Changed(book))
            })
            .await
    }

    pub async fn update(&self, id: &str, changes: UpdateBook) -> AppResult<Book> {
        self.update_where(id, changes, |_| Ok(())).await
    }

    /// Update only if `precondition` accepts the stored book; the check and
    /// the write share one lock acquisition
    pub async fn update_where<F>(&self, id: &str, changes: UpdateBook, precondition: F) -> AppResult<Book>
    where
        F: FnOnce(&Book) -> AppResult<()>,
    {
        self.collection
            .mutate(|books| {
                let book = books.iter_mut().find(|b| b.id == id).ok_or_else(|| not_found(id))?;
                precondition(book)?;
                changes.apply(book)?;
                Ok(Mutation::Changed(book.clone()))
            })
            .await
    }

    /// Remove a book and return it
    pub async fn delete(&self, id: &str) -> AppResult<Book> {
        self.delete_where(id, |_| Ok(())).await
    }

    pub async fn delete_where<F>(&self, id: &str, precondition: F) -> AppResult<Book>
    where
        F: FnOnce(&Book) -> AppResult<()>,
    {
        self.collection
            .mutate(|books| {
                let index = books.iter().position(|b| b.id == id).ok_or_else(|| not_found(id))?;
                precondition(&books[index])?;
                Ok(Mutation::Changed(books.remove(index)))
            })
            .await
    }

    /// Apply `delta` to `available` if the result stays within `0..=quantity`.
    ///
    /// Read, check and write happen under one lock acquisition, so two
    /// callers racing for the last copy cannot both succeed. Returns
    /// `Ok(false)` without writing when the bound would be crossed.
    pub async fn adjust_availability(&self, id: &str, delta: i64) -> AppResult<bool> {
        self.collection
            .mutate(|books| {
                let book = books.iter_mut().find(|b| b.id == id).ok_or_else(|| not_found(id))?;
                let available = book.available + delta;
                if (0..=book.quantity).contains(&available) {
                    book.available = available;
                    Ok(Mutation::Changed(true))
                } else {
                    Ok(Mutation::Unchanged(false))
                }
            })
            .await
    }
}
