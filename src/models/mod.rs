//! Data models for Restlib

pub mod book;
pub mod borrow;
pub mod pagination;
pub mod user;
pub mod webhook;

// Re-export commonly used types
pub use book::{Book, CreateBook, UpdateBook};
pub use borrow::{Borrow, BorrowStatus};
pub use pagination::{ListQuery, Page, PageRequest, Pagination};
pub use user::{Role, User, UserClaims, UserPublic};
pub use webhook::{Webhook, WebhookInfo};
