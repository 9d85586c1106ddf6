//! Business logic services

pub mod catalog;
pub mod loans;
pub mod tokens;
pub mod users;
pub mod webhooks;

use std::sync::Arc;

use crate::{cache::LastModifiedRegistry, config::AppConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub users: users::UsersService,
    pub loans: loans::LoansService,
    pub tokens: tokens::TokenService,
    pub webhooks: webhooks::WebhookService,
    pub freshness: Arc<LastModifiedRegistry>,
}

impl Services {
    /// Create all services with the given repository.
    ///
    /// Spawns the webhook delivery worker, so it must run inside a tokio runtime.
    pub fn new(repository: Repository, config: &AppConfig) -> AppResult<Self> {
        let freshness = Arc::new(LastModifiedRegistry::new());
        let webhooks = webhooks::WebhookService::new(repository.webhooks.clone(), &config.webhooks)?;

        Ok(Self {
            catalog: catalog::CatalogService::new(repository.clone(), freshness.clone(), webhooks.clone()),
            users: users::UsersService::new(repository.clone(), webhooks.clone()),
            loans: loans::LoansService::new(
                repository,
                freshness.clone(),
                webhooks.clone(),
                config.loans.period_days,
            ),
            tokens: tokens::TokenService::new(&config.auth)?,
            webhooks,
            freshness,
        })
    }
}
