//! Webhook registrations and background delivery

use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::mpsc;
use validator::Validate;

use crate::{
    cache::etag::canonical_json,
    config::WebhooksConfig,
    error::{AppError, AppResult},
    models::{
        webhook::{RegisterWebhook, WebhookEvent, ALL_EVENTS},
        Webhook,
    },
    repository::webhooks::{NewWebhook, WebhooksRepository},
};

/// Event names emitted by the services
pub mod events {
    pub const BOOK_CREATED: &str = "book.created";
    pub const BOOK_UPDATED: &str = "book.updated";
    pub const BOOK_DELETED: &str = "book.deleted";
    pub const BORROW_CREATED: &str = "borrow.created";
    pub const BORROW_RETURNED: &str = "borrow.returned";
    pub const USER_REGISTERED: &str = "user.registered";
}

pub const SIGNATURE_HEADER: &str = "X-Webhook-Signature";
pub const DELIVERY_HEADER: &str = "X-Webhook-Delivery";

#[derive(Clone)]
pub struct WebhookService {
    repository: WebhooksRepository,
    queue: mpsc::UnboundedSender<WebhookEvent>,
}

impl WebhookService {
    /// Build the HTTP client and spawn the delivery worker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(repository: WebhooksRepository, config: &WebhooksConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build webhook client: {}", e)))?;

        let (queue, receiver) = mpsc::unbounded_channel();
        tokio::spawn(deliver_events(receiver, repository.clone(), client));

        Ok(Self { repository, queue })
    }

    pub async fn register(&self, request: RegisterWebhook) -> AppResult<Webhook> {
        request.validate()?;
        let url = request
            .url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .ok_or_else(|| AppError::Validation("Webhook URL is required".to_string()))?;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::Validation("Invalid webhook URL format".to_string()));
        }

        let webhook = self
            .repository
            .register(NewWebhook {
                url,
                event_type: request
                    .event_type
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| ALL_EVENTS.to_string()),
                secret: request.secret.unwrap_or_default(),
                active: request.active.unwrap_or(true),
                description: request.description.unwrap_or_default(),
            })
            .await?;

        tracing::info!(
            "Registered webhook id={} url={} event_type={}",
            webhook.id,
            webhook.url,
            webhook.event_type
        );
        Ok(webhook)
    }

    pub async fn list(&self, event_type: Option<&str>) -> AppResult<Vec<Webhook>> {
        self.repository.list(event_type).await
    }

    pub async fn get(&self, id: &str) -> AppResult<Webhook> {
        self.repository.get_by_id(id).await
    }

    pub async fn unregister(&self, id: &str) -> AppResult<()> {
        self.repository.delete(id).await?;
        tracing::info!("Unregistered webhook id={}", id);
        Ok(())
    }

    /// Queue `event_type` for delivery; never blocks and never fails the caller
    pub fn notify<T: Serialize>(&self, event_type: &str, data: &T) {
        let data = match serde_json::to_value(data) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Dropping {} event: {}", event_type, e);
                return;
            }
        };
        let event = WebhookEvent {
            event_type: event_type.to_string(),
            timestamp: Utc::now(),
            data,
        };
        if self.queue.send(event).is_err() {
            tracing::debug!("Webhook worker stopped, {} event dropped", event_type);
        }
    }
}

/// Hex sha256 of the payload immediately followed by the secret
pub fn sign(payload: &[u8], secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload);
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

async fn deliver_events(
    mut receiver: mpsc::UnboundedReceiver<WebhookEvent>,
    repository: WebhooksRepository,
    client: reqwest::Client,
) {
    while let Some(event) = receiver.recv().await {
        let hooks = match repository.list(Some(&event.event_type)).await {
            Ok(hooks) => hooks,
            Err(e) => {
                tracing::error!("Cannot load webhooks for {}: {}", event.event_type, e);
                continue;
            }
        };
        if hooks.is_empty() {
            tracing::debug!("No webhooks registered for event_type={}", event.event_type);
            continue;
        }

        let payload = match serde_json::to_value(&event)
            .map(|v| canonical_json(&v))
            .and_then(|v| serde_json::to_vec(&v))
        {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("Cannot serialize {} event: {}", event.event_type, e);
                continue;
            }
        };

        tracing::info!(
            "Delivering webhook event_type={} webhooks={}",
            event.event_type,
            hooks.len()
        );
        for hook in &hooks {
            deliver(&client, hook, &payload).await;
        }
    }
}

async fn deliver(client: &reqwest::Client, hook: &Webhook, payload: &[u8]) {
    let mut request = client
        .post(&hook.url)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .header(DELIVERY_HEADER, uuid::Uuid::new_v4().to_string());
    if !hook.secret.is_empty() {
        request = request.header(SIGNATURE_HEADER, sign(payload, &hook.secret));
    }

    match request.body(payload.to_vec()).send().await.and_then(|r| r.error_for_status()) {
        Ok(response) => tracing::info!(
            "Webhook sent id={} url={} status={}",
            hook.id,
            hook.url,
            response.status().as_u16()
        ),
        Err(e) => tracing::error!("Failed to send webhook id={} url={}: {}", hook.id, hook.url, e),
    }
}
