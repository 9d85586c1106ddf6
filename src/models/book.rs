//! Book model and related types

use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    storage::Record,
};

/// Book record as stored in `books.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub isbn: Option<String>,
    /// Total copies owned
    pub quantity: i64,
    /// Copies currently loanable, always within `0..=quantity`
    pub available: i64,
}

impl Record for Book {
    const COLLECTION: &'static str = "books";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Book {
    /// Case-insensitive substring match over title and author
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle) || self.author.to_lowercase().contains(&needle)
    }
}

/// Create book request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub quantity: Option<i64>,
    /// Defaults to `quantity`
    pub available: Option<i64>,
}

impl CreateBook {
    /// Build the stored record, checking required fields and copy counts
    pub fn into_book(self, id: String) -> AppResult<Book> {
        let title = self.title.filter(|t| !t.trim().is_empty());
        let author = self.author.filter(|a| !a.trim().is_empty());
        let (Some(title), Some(author)) = (title, author) else {
            return Err(AppError::Validation("Title and author are required".to_string()));
        };

        let quantity = self.quantity.unwrap_or(1);
        if quantity < 0 {
            return Err(AppError::Validation("Quantity must not be negative".to_string()));
        }
        let available = self.available.unwrap_or(quantity);
        check_copies(quantity, available)?;

        Ok(Book {
            id,
            title,
            author,
            isbn: self.isbn,
            quantity,
            available,
        })
    }
}

/// Partial update; absent fields keep their current value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub quantity: Option<i64>,
    pub available: Option<i64>,
}

impl UpdateBook {
    /// Merge over `book`.
    ///
    /// Changing `quantity` without an explicit `available` shifts `available`
    /// by the same amount so outstanding loans stay reserved.
    pub fn apply(self, book: &mut Book) -> AppResult<()> {
        if let Some(title) = self.title {
            if title.trim().is_empty() {
                return Err(AppError::Validation("Title must not be empty".to_string()));
            }
            book.title = title;
        }
        if let Some(author) = self.author {
            if author.trim().is_empty() {
                return Err(AppError::Validation("Author must not be empty".to_string()));
            }
            book.author = author;
        }
        if self.isbn.is_some() {
            book.isbn = self.isbn;
        }

        let quantity = self.quantity.unwrap_or(book.quantity);
        let available = match self.available {
            Some(available) => available,
            None => quantity
                .checked_sub(book.quantity)
                .and_then(|delta| book.available.checked_add(delta))
                .ok_or_else(|| AppError::Validation("Quantity must not be negative".to_string()))?,
        };
        check_copies(quantity, available)?;
        book.quantity = quantity;
        book.available = available;

        Ok(())
    }
}

fn check_copies(quantity: i64, available: i64) -> AppResult<()> {
    if quantity < 0 {
        return Err(AppError::Validation("Quantity must not be negative".to_string()));
    }
    if !(0..=quantity).contains(&available) {
        return Err(AppError::Validation(format!(
            "Available copies must be between 0 and {}",
            quantity
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean_code() -> Book {
        CreateBook {
            title: Some("Clean Code".into()),
            author: Some("R. Martin".into()),
            quantity: Some(2),
            ..Default::default()
        }
        .into_book("1".into())
        .unwrap()
    }

    #[test]
    fn available_defaults_to_quantity() {
        let book = clean_code();
        assert_eq!(book.quantity, 2);
        assert_eq!(book.available, 2);
        assert_eq!(book.isbn, None);
    }

    #[test]
    fn title_and_author_are_required() {
        let err = CreateBook {
            title: Some("  ".into()),
            author: Some("Someone".into()),
            ..Default::default()
        }
        .into_book("1".into())
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Title and author are required"));
    }

    #[test]
    fn quantity_change_shifts_available() {
        let mut book = clean_code();
        book.available = 1; // one copy out

        UpdateBook {
            quantity: Some(5),
            ..Default::default()
        }
        .apply(&mut book)
        .unwrap();

        assert_eq!((book.quantity, book.available), (5, 4));
    }

    #[test]
    fn shrinking_below_outstanding_loans_is_rejected() {
        let mut book = clean_code();
        book.available = 0;

        let err = UpdateBook {
            quantity: Some(1),
            ..Default::default()
        }
        .apply(&mut book)
        .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!((book.quantity, book.available), (2, 0));
    }

    #[test]
    fn extreme_quantity_is_rejected_not_overflowed() {
        let mut book = clean_code();

        for quantity in [i64::MIN, -1] {
            let err = UpdateBook {
                quantity: Some(quantity),
                ..Default::default()
            }
            .apply(&mut book)
            .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
        assert_eq!((book.quantity, book.available), (2, 2));
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_author() {
        let book = clean_code();
        assert!(book.matches("clean"));
        assert!(book.matches("MARTIN"));
        assert!(!book.matches("refactoring"));
    }
}
