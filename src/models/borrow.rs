//! Borrow (loan) model and related types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorrowStatus {
    Borrowed,
    Returned,
}

/// Borrow record as stored in `borrows.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borrow {
    pub id: String,
    pub user_id: String,
    pub book_id: String,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: BorrowStatus,
}

impl Record for Borrow {
    const COLLECTION: &'static str = "borrows";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Borrow {
    /// New loan starting now, due after `period_days`
    pub fn open(id: String, user_id: String, book_id: String, period_days: i64) -> Self {
        let borrow_date = Utc::now();
        Self {
            id,
            user_id,
            book_id,
            borrow_date,
            due_date: borrow_date + Duration::days(period_days),
            return_date: None,
            status: BorrowStatus::Borrowed,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == BorrowStatus::Borrowed
    }
}

/// Create borrow request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBorrow {
    pub user_id: Option<String>,
    pub book_id: Option<String>,
}

/// Query for `GET /borrows`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BorrowQuery {
    pub user_id: Option<String>,
    /// `active` restricts to loans not yet returned
    pub status: Option<String>,
}

/// Query for `GET /borrows/history`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub user_id: Option<String>,
    pub book_id: Option<String>,
}
