//! Restlib Library Management REST API
//!
//! Books, users, borrows and webhook registrations kept in flat JSON files,
//! served through progressively richer API versions (plain CRUD, hypermedia,
//! stateless tokens, cache validators, client-side token storage).

use std::sync::Arc;

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod storage;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use models::User;
use repository::Repository;
use services::{users::hash_password, Services};
use storage::RecordStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<Services>,
}

impl AppState {
    /// Open the record store and wire every service.
    ///
    /// The default admin account only lands on disk when no users file exists.
    pub fn build(config: AppConfig) -> AppResult<Self> {
        let store = RecordStore::new(&config.storage);
        let admin = User::default_admin(hash_password(&config.auth.default_admin_password)?);
        let repository = Repository::new(&store, vec![admin]);
        let services = Services::new(repository, &config)?;

        Ok(Self {
            config: Arc::new(config),
            services: Arc::new(services),
        })
    }
}
