//! Webhook registration endpoints (v1); secrets are never returned

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        webhook::{RegisterWebhook, WebhookQuery},
        WebhookInfo,
    },
    AppState,
};

use super::{ApiJson, ApiResponse};

pub async fn list_webhooks(
    State(state): State<AppState>,
    Query(query): Query<WebhookQuery>,
) -> AppResult<Json<ApiResponse<Vec<WebhookInfo>>>> {
    let event_type = query.event_type.as_deref().filter(|e| !e.is_empty());
    let hooks = state.services.webhooks.list(event_type).await?;
    Ok(ApiResponse::ok(hooks.into_iter().map(WebhookInfo::from).collect()))
}

pub async fn get_webhook(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<WebhookInfo>>> {
    let hook = state.services.webhooks.get(&id).await?;
    Ok(ApiResponse::ok(hook.into()))
}

pub async fn register_webhook(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterWebhook>,
) -> AppResult<(StatusCode, Json<ApiResponse<WebhookInfo>>)> {
    let hook = state.services.webhooks.register(request).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(hook.into(), "Webhook registered successfully"),
    ))
}

pub async fn unregister_webhook(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.webhooks.unregister(&id).await?;
    Ok(ApiResponse::message("Webhook unregistered successfully"))
}
