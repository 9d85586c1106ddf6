//! Webhook registration model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::storage::Record;

/// Event type a webhook subscribes to when none is given
pub const ALL_EVENTS: &str = "all";

/// Webhook record as stored in `webhooks.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Webhook {
    pub id: String,
    pub url: String,
    pub event_type: String,
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
}

fn default_active() -> bool {
    true
}

impl Record for Webhook {
    const COLLECTION: &'static str = "webhooks";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Webhook {
    pub fn subscribes_to(&self, event_type: &str) -> bool {
        self.event_type == event_type || self.event_type == ALL_EVENTS
    }
}

/// Webhook as returned to clients (secret withheld)
#[derive(Debug, Clone, Serialize)]
pub struct WebhookInfo {
    pub id: String,
    pub url: String,
    pub event_type: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub description: String,
}

impl From<Webhook> for WebhookInfo {
    fn from(w: Webhook) -> Self {
        Self {
            id: w.id,
            url: w.url,
            event_type: w.event_type,
            active: w.active,
            created_at: w.created_at,
            description: w.description,
        }
    }
}

/// Registration request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterWebhook {
    #[validate(url(message = "Invalid webhook URL"))]
    pub url: Option<String>,
    pub event_type: Option<String>,
    pub secret: Option<String>,
    pub active: Option<bool>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookQuery {
    pub event_type: Option<String>,
}

/// Body POSTed to subscribers
#[derive(Debug, Clone, Serialize)]
pub struct WebhookEvent {
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub data: serde_json::Value,
}
