//! HTTP handlers for every API version
//!
//! Each version is a thin adapter over the shared services: v1 plain CRUD,
//! v2 hypermedia links, v3 bearer tokens, v4 cache validators and v5 cookie
//! or client-side token storage.

pub mod auth;
pub mod auth_storage;
pub mod books;
pub mod books_cache;
pub mod books_etag;
pub mod books_hateoas;
pub mod borrows;
pub mod health;
pub mod users;
pub mod webhooks;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::CookieJar;
use serde::{de::DeserializeOwned, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::UserClaims, AppState};

/// Success envelope `{success: true, data?, message?}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            message: None,
        })
    }

    pub fn with_message(data: T, message: &str) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            message: Some(message.to_string()),
        })
    }
}

impl ApiResponse<()> {
    pub fn message(message: &str) -> Json<Self> {
        Json(Self {
            success: true,
            data: None,
            message: Some(message.to_string()),
        })
    }
}

/// `Json` extractor whose rejections keep the error envelope
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| AppError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Claims of a valid `Authorization: Bearer <token>` header
pub struct BearerClaims(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for BearerClaims {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Authentication token is required".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::Authentication("Token format should be: Bearer <token>".to_string())
            })?;

        let claims = state
            .services
            .tokens
            .verify(token)
            .ok_or_else(|| AppError::Authentication("Invalid or expired token".to_string()))?;

        Ok(BearerClaims(claims))
    }
}

/// Claims of a valid token carried in the auth cookie
pub struct CookieClaims(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for CookieClaims {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(&state.config.auth.cookie_name)
            .map(|cookie| cookie.value().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::Authentication("Authentication token cookie is required".to_string())
            })?;

        let claims = state
            .services
            .tokens
            .verify(&token)
            .ok_or_else(|| AppError::Authentication("Invalid or expired token".to_string()))?;

        Ok(CookieClaims(claims))
    }
}

/// Build the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // v1: client-server
    let api_v1 = Router::new()
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book).put(books::update_book).delete(books::delete_book),
        )
        .route("/users", get(users::list_users).post(users::register_user))
        .route(
            "/users/:id",
            get(users::get_user).put(users::update_user).delete(users::delete_user),
        )
        .route("/auth/login", post(auth::login))
        .route("/borrows", get(borrows::list_borrows).post(borrows::create_borrow))
        .route("/borrows/history", get(borrows::borrow_history))
        .route("/borrows/:id", get(borrows::get_borrow))
        .route("/borrows/:id/return", post(borrows::return_borrow))
        .route(
            "/webhooks",
            get(webhooks::list_webhooks).post(webhooks::register_webhook),
        )
        .route(
            "/webhooks/:id",
            get(webhooks::get_webhook).delete(webhooks::unregister_webhook),
        );

    // v2: uniform interface
    let api_v2 = Router::new()
        .route(
            "/books",
            get(books_hateoas::list_books).post(books_hateoas::create_book),
        )
        .route(
            "/books/:id",
            get(books_hateoas::get_book)
                .put(books_hateoas::update_book)
                .delete(books_hateoas::delete_book),
        );

    // v3: stateless tokens
    let api_v3 = Router::new()
        .route("/auth/login", post(auth::token_login))
        .route("/auth/verify", get(auth::verify))
        .route("/auth/decode", post(auth::decode))
        .route("/auth/protected", get(auth::protected))
        .route("/auth/refresh", post(auth::refresh));

    // v4: cacheable
    let api_v4 = Router::new()
        .route(
            "/cache-control/books",
            get(books_cache::list_books).post(books_cache::create_book),
        )
        .route(
            "/cache-control/books/:id",
            get(books_cache::get_book)
                .put(books_cache::update_book)
                .delete(books_cache::delete_book),
        )
        .route(
            "/etag/books",
            get(books_etag::list_books).post(books_etag::create_book),
        )
        .route(
            "/etag/books/:id",
            get(books_etag::get_book)
                .put(books_etag::update_book)
                .delete(books_etag::delete_book),
        );

    // v5: client-side token storage
    let api_v5 = Router::new()
        .route("/auth/login/localstorage", post(auth_storage::login_local_storage))
        .route("/auth/login/sessionstorage", post(auth_storage::login_session_storage))
        .route("/auth/login/cookie", post(auth_storage::login_cookie))
        .route("/auth/verify", get(auth_storage::verify))
        .route("/auth/logout", post(auth_storage::logout))
        .route("/auth/protected", get(auth_storage::protected));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/api", get(health::api_index))
        .nest("/api/v1", api_v1)
        .nest("/api/v2", api_v2)
        .nest("/api/v3", api_v3)
        .nest("/api/v4", api_v4)
        .nest("/api/v5", api_v5)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
