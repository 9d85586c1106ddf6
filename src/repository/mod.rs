//! Repository layer over the JSON record store

pub mod books;
pub mod borrows;
pub mod users;
pub mod webhooks;

use crate::{models::User, storage::RecordStore};

/// Main repository struct holding one repository per collection
#[derive(Clone)]
pub struct Repository {
    pub books: books::BooksRepository,
    pub users: users::UsersRepository,
    pub borrows: borrows::BorrowsRepository,
    pub webhooks: webhooks::WebhooksRepository,
}

impl Repository {
    /// Open every collection of `store`; `seed_users` is written when the
    /// users file does not exist yet
    pub fn new(store: &RecordStore, seed_users: Vec<User>) -> Self {
        Self {
            books: books::BooksRepository::new(store.collection(Vec::new())),
            users: users::UsersRepository::new(store.collection(seed_users)),
            borrows: borrows::BorrowsRepository::new(store.collection(Vec::new())),
            webhooks: webhooks::WebhooksRepository::new(store.collection(Vec::new())),
        }
    }
}
