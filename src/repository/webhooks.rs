//! Webhook registrations repository

use std::sync::Arc;

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::Webhook,
    storage::{JsonCollection, Mutation},
};

/// A registration that passed request validation
#[derive(Debug, Clone)]
pub struct NewWebhook {
    pub url: String,
    pub event_type: String,
    pub secret: String,
    pub active: bool,
    pub description: String,
}

#[derive(Clone)]
pub struct WebhooksRepository {
    collection: Arc<JsonCollection<Webhook>>,
}

fn not_found() -> AppError {
    AppError::NotFound("Webhook not found".to_string())
}

impl WebhooksRepository {
    pub fn new(collection: Arc<JsonCollection<Webhook>>) -> Self {
        Self { collection }
    }

    /// Active registrations, restricted to those receiving `event_type` when given
    pub async fn list(&self, event_type: Option<&str>) -> AppResult<Vec<Webhook>> {
        let mut hooks = self.collection.read().await?;
        hooks.retain(|w| w.active && event_type.map_or(true, |e| w.subscribes_to(e)));
        Ok(hooks)
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Webhook> {
        self.collection
            .read()
            .await?
            .into_iter()
            .find(|w| w.id == id)
            .ok_or_else(not_found)
    }

    pub async fn register(&self, hook: NewWebhook) -> AppResult<Webhook> {
        self.collection
            .mutate(|hooks| {
                if hooks
                    .iter()
                    .any(|w| w.url == hook.url && w.event_type == hook.event_type)
                {
                    return Err(AppError::Conflict(
                        "Webhook already registered for this URL and event type".to_string(),
                    ));
                }
                let webhook = Webhook {
                    id: JsonCollection::<Webhook>::next_id(hooks),
                    url: hook.url,
                    event_type: hook.event_type,
                    secret: hook.secret,
                    active: hook.active,
                    created_at: Utc::now(),
                    description: hook.description,
                };
                hooks.push(webhook.clone());
                Ok(Mutation::Changed(webhook))
            })
            .await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.collection
            .mutate(|hooks| {
                let index = hooks.iter().position(|w| w.id == id).ok_or_else(not_found)?;
                hooks.remove(index);
                Ok(Mutation::Changed(()))
            })
            .await
    }
}
