//! Borrow and return of books

use std::sync::Arc;

use crate::{
    cache::LastModifiedRegistry,
    error::{AppError, AppResult},
    models::{
        borrow::{BorrowQuery, CreateBorrow, HistoryQuery},
        Borrow,
    },
    repository::Repository,
    services::webhooks::{events, WebhookService},
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    freshness: Arc<LastModifiedRegistry>,
    webhooks: WebhookService,
    period_days: i64,
}

impl LoansService {
    pub fn new(
        repository: Repository,
        freshness: Arc<LastModifiedRegistry>,
        webhooks: WebhookService,
        period_days: i64,
    ) -> Self {
        Self {
            repository,
            freshness,
            webhooks,
            period_days,
        }
    }

    /// `status=active` keeps only loans not yet returned
    pub async fn list(&self, query: &BorrowQuery) -> AppResult<Vec<Borrow>> {
        let active_only = query.status.as_deref() == Some("active");
        self.repository
            .borrows
            .list(non_blank(&query.user_id), active_only)
            .await
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Borrow> {
        self.repository.borrows.get_by_id(id).await
    }

    pub async fn history(&self, query: &HistoryQuery) -> AppResult<Vec<Borrow>> {
        self.repository
            .borrows
            .history(non_blank(&query.user_id), non_blank(&query.book_id))
            .await
    }

    /// Reserve one copy, then record the loan.
    ///
    /// If the loan cannot be recorded the reservation is released so the
    /// book's availability keeps matching its open borrows.
    pub async fn borrow(&self, request: CreateBorrow) -> AppResult<Borrow> {
        let (user_id, book_id) = match (non_blank(&request.user_id), non_blank(&request.book_id)) {
            (Some(u), Some(b)) => (u, b),
            _ => {
                return Err(AppError::Validation(
                    "User ID and book ID are required".to_string(),
                ))
            }
        };

        let reserved = self
            .repository
            .books
            .adjust_availability(book_id, -1)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::NotFound("Book not found".to_string()),
                other => other,
            })?;
        if !reserved {
            return Err(AppError::Conflict("Book not available".to_string()));
        }

        let borrow = match self
            .repository
            .borrows
            .create(user_id, book_id, self.period_days)
            .await
        {
            Ok(borrow) => borrow,
            Err(e) => {
                self.release(book_id).await;
                return Err(e);
            }
        };

        self.freshness.touch_book(book_id);
        tracing::info!("Book {} borrowed by user {} (borrow {})", book_id, user_id, borrow.id);
        self.webhooks.notify(events::BORROW_CREATED, &borrow);
        Ok(borrow)
    }

    /// Close an open loan and give its copy back
    pub async fn return_borrow(&self, id: &str) -> AppResult<Borrow> {
        let borrow = self.repository.borrows.mark_returned(id).await?;
        self.release(&borrow.book_id).await;
        tracing::info!("Borrow {} returned", borrow.id);
        self.webhooks.notify(events::BORROW_RETURNED, &borrow);
        Ok(borrow)
    }

    async fn release(&self, book_id: &str) {
        match self.repository.books.adjust_availability(book_id, 1).await {
            Ok(true) => self.freshness.touch_book(book_id),
            Ok(false) => tracing::warn!("Book {} already at full availability", book_id),
            Err(e) => tracing::warn!("Could not release copy of book {}: {}", book_id, e),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
