//! Borrows repository

use std::sync::Arc;

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{Borrow, BorrowStatus},
    storage::{JsonCollection, Mutation},
};

#[derive(Clone)]
pub struct BorrowsRepository {
    collection: Arc<JsonCollection<Borrow>>,
}

fn not_found() -> AppError {
    AppError::NotFound("Borrow record not found".to_string())
}

impl BorrowsRepository {
    pub fn new(collection: Arc<JsonCollection<Borrow>>) -> Self {
        Self { collection }
    }

    /// Borrows filtered by user, optionally only those not yet returned
    pub async fn list(&self, user_id: Option<&str>, active_only: bool) -> AppResult<Vec<Borrow>> {
        let mut borrows = self.collection.read().await?;
        borrows.retain(|b| {
            user_id.map_or(true, |u| b.user_id == u) && (!active_only || b.is_active())
        });
        Ok(borrows)
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Borrow> {
        self.collection
            .read()
            .await?
            .into_iter()
            .find(|b| b.id == id)
            .ok_or_else(not_found)
    }

    /// Every borrow, returned or not, matching the optional filters
    pub async fn history(&self, user_id: Option<&str>, book_id: Option<&str>) -> AppResult<Vec<Borrow>> {
        let mut borrows = self.collection.read().await?;
        borrows.retain(|b| {
            user_id.map_or(true, |u| b.user_id == u) && book_id.map_or(true, |k| b.book_id == k)
        });
        Ok(borrows)
    }

    /// Append a new open loan
    pub async fn create(&self, user_id: &str, book_id: &str, period_days: i64) -> AppResult<Borrow> {
        self.collection
            .mutate(|borrows| {
                let borrow = Borrow::open(
                    JsonCollection::<Borrow>::next_id(borrows),
                    user_id.to_string(),
                    book_id.to_string(),
                    period_days,
                );
                borrows.push(borrow.clone());
                Ok(Mutation::Changed(borrow))
            })
            .await
    }

    /// Transition `borrowed -> returned`; a second attempt is a conflict
    pub async fn mark_returned(&self, id: &str) -> AppResult<Borrow> {
        self.collection
            .mutate(|borrows| {
                let borrow = borrows.iter_mut().find(|b| b.id == id).ok_or_else(not_found)?;
                if !borrow.is_active() {
                    return Err(AppError::Conflict("Book already returned".to_string()));
                }
                // never earlier than the borrow date, even if the clock stepped back
                borrow.return_date = Some(Utc::now().max(borrow.borrow_date));
                borrow.status = BorrowStatus::Returned;
                Ok(Mutation::Changed(borrow.clone()))
            })
            .await
    }

    /// Drop every borrow of a book; returns how many were removed
    pub async fn delete_by_book(&self, book_id: &str) -> AppResult<usize> {
        self.collection
            .mutate(|borrows| {
                let before = borrows.len();
                borrows.retain(|b| b.book_id != book_id);
                let removed = before - borrows.len();
                if removed == 0 {
                    Ok(Mutation::Unchanged(0))
                } else {
                    Ok(Mutation::Changed(removed))
                }
            })
            .await
    }
}
