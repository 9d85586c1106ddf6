//! API integration tests
//!
//! Every test drives the full router in-process against its own data directory.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use restlib_server::{api, cache::Resource, config::AppConfig, AppState};

struct TestApp {
    router: Router,
    state: AppState,
    data_dir: std::path::PathBuf,
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

impl TestResponse {
    fn header(&self, name: header::HeaderName) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}

fn test_app() -> TestApp {
    let mut config = AppConfig::default();
    config.storage.data_dir = std::env::temp_dir().join(format!("restlib-api-{}", uuid::Uuid::new_v4()));
    config.auth.jwt_secret = "integration-secret".to_string();
    let data_dir = config.storage.data_dir.clone();
    let state = AppState::build(config).expect("state");
    TestApp {
        router: api::router(state.clone()),
        state,
        data_dir,
    }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse { status, headers, body }
    }

    async fn get(&self, uri: &str) -> TestResponse {
        self.send(request(Method::GET, uri, &[], None)).await
    }

    async fn get_with(&self, uri: &str, headers: &[(&str, &str)]) -> TestResponse {
        self.send(request(Method::GET, uri, headers, None)).await
    }

    async fn json(&self, method: Method, uri: &str, body: Value) -> TestResponse {
        self.send(request(method, uri, &[], Some(body))).await
    }

    async fn create_book(&self, title: &str, quantity: i64) -> Value {
        let response = self
            .json(
                Method::POST,
                "/api/v1/books",
                json!({"title": title, "author": "R. Martin", "quantity": quantity}),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.body["data"].clone()
    }

    async fn borrow(&self, user_id: &str, book_id: &str) -> TestResponse {
        self.json(
            Method::POST,
            "/api/v1/borrows",
            json!({"user_id": user_id, "book_id": book_id}),
        )
        .await
    }
}

fn request(method: Method, uri: &str, headers: &[(&str, &str)], body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn json_request(method: Method, uri: &str, headers: &[(&str, &str)], body: Value) -> Request<Body> {
    request(method, uri, headers, Some(body))
}

#[tokio::test]
async fn test_health_and_index() {
    let app = test_app();

    let health = app.get("/health").await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "healthy");

    let ready = app.get("/ready").await;
    assert_eq!(ready.status, StatusCode::OK);
    assert!(app.data_dir.join("books.json").exists());

    let index = app.get("/api").await;
    assert_eq!(index.body["versions"]["v1"]["href"], "/api/v1/books");
}

#[tokio::test]
async fn test_borrow_lifecycle_keeps_availability() {
    let app = test_app();
    let book = app.create_book("Clean Code", 2).await;
    assert_eq!(book["available"], 2);
    let book_id = book["id"].as_str().unwrap();

    let first = app.borrow("2", book_id).await;
    let second = app.borrow("3", book_id).await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(second.status, StatusCode::CREATED);
    assert_eq!(first.body["data"]["status"], "borrowed");
    assert_eq!(app.get(&format!("/api/v1/books/{}", book_id)).await.body["data"]["available"], 0);

    let third = app.borrow("4", book_id).await;
    assert_eq!(third.status, StatusCode::BAD_REQUEST);
    assert_eq!(third.body["success"], false);
    assert_eq!(third.body["message"], "Book not available");

    let borrow_id = first.body["data"]["id"].as_str().unwrap();
    let returned = app
        .json(Method::POST, &format!("/api/v1/borrows/{}/return", borrow_id), json!({}))
        .await;
    assert_eq!(returned.status, StatusCode::OK);
    assert_eq!(returned.body["data"]["status"], "returned");
    assert!(returned.body["data"]["return_date"].is_string());
    assert_eq!(app.get(&format!("/api/v1/books/{}", book_id)).await.body["data"]["available"], 1);

    let again = app
        .json(Method::POST, &format!("/api/v1/borrows/{}/return", borrow_id), json!({}))
        .await;
    assert_eq!(again.status, StatusCode::BAD_REQUEST);
    assert_eq!(again.body["message"], "Book already returned");

    let active = app.get("/api/v1/borrows?status=active").await;
    assert_eq!(active.body["data"].as_array().unwrap().len(), 1);
    let history = app.get(&format!("/api/v1/borrows/history?book_id={}", book_id)).await;
    assert_eq!(history.body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_borrow_of_last_copy() {
    let app = Arc::new(test_app());
    let book = app.create_book("Refactoring", 1).await;
    let book_id = book["id"].as_str().unwrap().to_string();

    let handles: Vec<_> = (0..8)
        .map(|n| {
            let app = app.clone();
            let book_id = book_id.clone();
            tokio::spawn(async move { app.borrow(&(n + 2).to_string(), &book_id).await.status })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        let status = handle.await.unwrap();
        if status == StatusCode::CREATED {
            created += 1;
        } else {
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }
    assert_eq!(created, 1);
    assert_eq!(app.get(&format!("/api/v1/books/{}", book_id)).await.body["data"]["available"], 0);
    let active = app.get("/api/v1/borrows?status=active").await;
    assert_eq!(active.body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_borrow_unknown_book() {
    let app = test_app();
    let response = app.borrow("2", "999").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");

    let missing = app.json(Method::POST, "/api/v1/borrows", json!({"user_id": "2"})).await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_book_cascades_to_borrows() {
    let app = test_app();
    let book = app.create_book("Clean Code", 1).await;
    let book_id = book["id"].as_str().unwrap();
    app.borrow("2", book_id).await;

    let deleted = app.send(request(Method::DELETE, &format!("/api/v1/books/{}", book_id), &[], None)).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert!(app.get("/api/v1/borrows").await.body["data"].as_array().unwrap().is_empty());
    assert_eq!(app.get(&format!("/api/v1/books/{}", book_id)).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_and_login() {
    let app = test_app();

    let registered = app
        .json(Method::POST, "/api/v1/users", json!({"username": "alice", "password": "pw123"}))
        .await;
    assert_eq!(registered.status, StatusCode::CREATED);
    assert!(registered.body["data"].get("password").is_none());

    let login = app
        .json(Method::POST, "/api/v1/auth/login", json!({"username": "alice", "password": "pw123"}))
        .await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["data"]["username"], "alice");
    assert!(login.body["data"].get("password").is_none());
    assert!(login.body.get("token").is_none());

    let duplicate = app
        .json(Method::POST, "/api/v1/users", json!({"username": "alice", "password": "other"}))
        .await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
    assert_eq!(duplicate.body["message"], "Username already exists");

    let wrong = app
        .json(Method::POST, "/api/v1/auth/login", json!({"username": "alice", "password": "nope"}))
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body["error"], "UNAUTHORIZED");

    let users = app.get("/api/v1/users?search=ali").await;
    assert_eq!(users.body["data"]["pagination"]["total"], 1);
}

#[tokio::test]
async fn test_pagination_validation_and_clamping() {
    let app = test_app();
    for title in ["A", "B", "C", "D", "E"] {
        app.create_book(title, 1).await;
    }

    for query in ["per_page=0", "per_page=101", "page=0", "page=abc"] {
        let response = app.get(&format!("/api/v1/books?{}", query)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", query);
        assert_eq!(response.body["error"], "VALIDATION_ERROR");
    }

    let last = app.get("/api/v1/books?page=99&per_page=2").await;
    assert_eq!(last.status, StatusCode::OK);
    let pagination = &last.body["data"]["pagination"];
    assert_eq!(pagination["page"], 3);
    assert_eq!(pagination["total_pages"], 3);
    assert_eq!(pagination["has_next"], false);
    assert_eq!(pagination["has_prev"], true);
    assert_eq!(last.body["data"]["items"][0]["title"], "E");
}

#[tokio::test]
async fn test_extreme_quantity_is_a_validation_error() {
    let app = test_app();
    let book = app.create_book("Clean Code", 2).await;
    let uri = format!("/api/v1/books/{}", book["id"].as_str().unwrap());

    let response = app.json(Method::PUT, &uri, json!({"quantity": i64::MIN})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert_eq!(app.get(&uri).await.body["data"]["quantity"], 2);
}

#[tokio::test]
async fn test_malformed_json_keeps_envelope() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/books")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");

    let missing = app.json(Method::POST, "/api/v1/books", json!({"title": "No author"})).await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.body["message"], "Title and author are required");
}

#[tokio::test]
async fn test_etag_changes_after_update() {
    let app = test_app();
    let book = app.create_book("Clean Code", 2).await;
    let uri = format!("/api/v4/etag/books/{}", book["id"].as_str().unwrap());

    let first = app.get(&uri).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.header(header::CACHE_CONTROL), "public, max-age=120");
    let etag = first.header(header::ETAG).to_string();
    assert!(etag.starts_with('"'));

    let cached = app.get_with(&uri, &[("if-none-match", &etag)]).await;
    assert_eq!(cached.status, StatusCode::NOT_MODIFIED);
    assert_eq!(cached.body, Value::Null);

    app.json(
        Method::PUT,
        &format!("/api/v1/books/{}", book["id"].as_str().unwrap()),
        json!({"isbn": "978-0132350884"}),
    )
    .await;

    let fresh = app.get_with(&uri, &[("if-none-match", &etag)]).await;
    assert_eq!(fresh.status, StatusCode::OK);
    assert_eq!(fresh.body["data"]["isbn"], "978-0132350884");
    assert_ne!(fresh.header(header::ETAG), etag);
}

#[tokio::test]
async fn test_collection_etag_is_weak() {
    let app = test_app();
    app.create_book("Clean Code", 1).await;

    let list = app.get("/api/v4/etag/books").await;
    let etag = list.header(header::ETAG).to_string();
    assert!(etag.starts_with("W/\""));
    assert_eq!(list.header(header::CACHE_CONTROL), "public, max-age=60");

    let cached = app.get_with("/api/v4/etag/books", &[("if-none-match", &etag)]).await;
    assert_eq!(cached.status, StatusCode::NOT_MODIFIED);

    app.create_book("Refactoring", 1).await;
    let changed = app.get_with("/api/v4/etag/books", &[("if-none-match", &etag)]).await;
    assert_eq!(changed.status, StatusCode::OK);
}

#[tokio::test]
async fn test_stale_if_match_is_rejected() {
    let app = test_app();
    let book = app.create_book("Clean Code", 2).await;
    let uri = format!("/api/v4/etag/books/{}", book["id"].as_str().unwrap());

    let stale = app
        .send(json_request(
            Method::PUT,
            &uri,
            &[("if-match", "\"0000\"")],
            json!({"title": "Dirty Code"}),
        ))
        .await;
    assert_eq!(stale.status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(stale.body["current_data"], book);
    assert_eq!(stale.header(header::CACHE_CONTROL), "no-cache");
    let current_etag = stale.body["current_etag"].as_str().unwrap().to_string();
    assert_eq!(stale.header(header::ETAG), current_etag);
    assert_eq!(app.get(&uri).await.body["data"]["title"], "Clean Code");

    let fresh = app
        .send(json_request(
            Method::PUT,
            &uri,
            &[("if-match", &current_etag)],
            json!({"title": "Cleaner Code"}),
        ))
        .await;
    assert_eq!(fresh.status, StatusCode::OK);
    assert_eq!(fresh.body["data"]["title"], "Cleaner Code");

    let stale_delete = app
        .send(request(Method::DELETE, &uri, &[("if-match", &current_etag)], None))
        .await;
    assert_eq!(stale_delete.status, StatusCode::PRECONDITION_FAILED);

    let any = app.send(request(Method::DELETE, &uri, &[("if-match", "*")], None)).await;
    assert_eq!(any.status, StatusCode::OK);
}

#[tokio::test]
async fn test_etag_create_sets_location() {
    let app = test_app();
    let created = app
        .json(Method::POST, "/api/v4/etag/books", json!({"title": "T", "author": "A"}))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.header(header::LOCATION), "/api/v4/etag/books/1");
    assert_eq!(created.header(header::CACHE_CONTROL), "no-cache");
    assert!(!created.header(header::ETAG).is_empty());
}

#[tokio::test]
async fn test_last_modified_validation() {
    let app = test_app();
    let book = app.create_book("Clean Code", 1).await;
    let uri = format!("/api/v4/cache-control/books/{}", book["id"].as_str().unwrap());

    let first = app.get(&uri).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.header(header::CACHE_CONTROL), "public, max-age=120, must-revalidate");
    let last_modified = first.header(header::LAST_MODIFIED).to_string();
    assert!(last_modified.ends_with(" GMT"));

    let cached = app.get_with(&uri, &[("if-modified-since", &last_modified)]).await;
    assert_eq!(cached.status, StatusCode::NOT_MODIFIED);

    let old = app
        .get_with(&uri, &[("if-modified-since", "Sat, 01 Jan 2000 00:00:00 GMT")])
        .await;
    assert_eq!(old.status, StatusCode::OK);

    let garbage = app.get_with(&uri, &[("if-modified-since", "last tuesday")]).await;
    assert_eq!(garbage.status, StatusCode::OK);

    let list = app.get("/api/v4/cache-control/books").await;
    assert_eq!(list.header(header::CACHE_CONTROL), "public, max-age=60");
    assert!(!list.header(header::LAST_MODIFIED).is_empty());

    let missing = app.get("/api/v4/cache-control/books/999").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.header(header::CACHE_CONTROL), "no-cache");

    let created = app
        .json(Method::POST, "/api/v4/cache-control/books", json!({"title": "T", "author": "A"}))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.header(header::CACHE_CONTROL), "no-cache");
    assert_eq!(created.header(header::LOCATION), "/api/v4/cache-control/books/2");
}

#[tokio::test]
async fn test_unknown_books_are_not_timestamped() {
    let app = test_app();
    let freshness = &app.state.services.freshness;

    for n in 0..50 {
        let uri = format!("/api/v4/cache-control/books/missing-{}", n);
        assert_eq!(app.get(&uri).await.status, StatusCode::NOT_FOUND);
        assert_eq!(freshness.peek(&Resource::book(&format!("missing-{}", n))), None);
    }

    let book = app.create_book("Clean Code", 1).await;
    let id = book["id"].as_str().unwrap();
    let uri = format!("/api/v1/books/{}", id);
    assert!(freshness.peek(&Resource::book(id)).is_some());

    app.send(request(Method::DELETE, &uri, &[], None)).await;
    assert_eq!(freshness.peek(&Resource::book(id)), None);
    let missing = app
        .get(&format!("/api/v4/cache-control/books/{}", id))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(freshness.peek(&Resource::book(id)), None);
}

#[tokio::test]
async fn test_hateoas_links() {
    let app = test_app();
    let book = app.create_book("Clean Code", 1).await;
    let id = book["id"].as_str().unwrap();

    let item = app.get(&format!("/api/v2/books/{}", id)).await;
    assert_eq!(item.body["data"]["_links"]["self"]["href"], format!("/api/v2/books/{}", id));
    assert_eq!(item.body["data"]["_links"]["borrow"]["method"], "POST");
    assert_eq!(item.body["data"]["_links"]["collection"]["href"], "/api/v2/books");

    app.borrow("2", id).await;
    let exhausted = app.get(&format!("/api/v2/books/{}", id)).await;
    assert!(exhausted.body["data"]["_links"].get("borrow").is_none());

    let list = app.get("/api/v2/books").await;
    assert_eq!(list.body["_links"]["create"]["method"], "POST");
    assert_eq!(list.body["total"], 1);
}

async fn admin_token(app: &TestApp) -> String {
    let login = app
        .json(Method::POST, "/api/v3/auth/login", json!({"username": "admin", "password": "admin123"}))
        .await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["token_type"], "Bearer");
    assert_eq!(login.body["expires_in"], 24 * 3600);
    login.body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_jwt_flow() {
    let app = test_app();
    let token = admin_token(&app).await;
    let bearer = format!("Bearer {}", token);

    let verify = app.get_with("/api/v3/auth/verify", &[("authorization", &bearer)]).await;
    assert_eq!(verify.status, StatusCode::OK);
    assert_eq!(verify.body["user"]["username"], "admin");
    assert_eq!(verify.body["user"]["role"], "admin");

    let protected = app.get_with("/api/v3/auth/protected", &[("authorization", &bearer)]).await;
    assert_eq!(protected.status, StatusCode::OK);
    assert_eq!(protected.body["data"]["current_user"]["user_id"], "1");

    let refreshed = app
        .send(json_request(Method::POST, "/api/v3/auth/refresh", &[("authorization", &bearer)], json!({})))
        .await;
    assert_eq!(refreshed.status, StatusCode::OK);
    assert!(refreshed.body["token"].is_string());

    let decoded = app.json(Method::POST, "/api/v3/auth/decode", json!({"token": token})).await;
    assert_eq!(decoded.status, StatusCode::OK);
    assert_eq!(decoded.body["user"]["username"], "admin");
}

#[tokio::test]
async fn test_jwt_rejections() {
    let app = test_app();

    let missing = app.get("/api/v3/auth/verify").await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let bad_format = app.get_with("/api/v3/auth/verify", &[("authorization", "Token abc")]).await;
    assert_eq!(bad_format.status, StatusCode::UNAUTHORIZED);

    let garbage = app
        .get_with("/api/v3/auth/protected", &[("authorization", "Bearer not.a.token")])
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.body["message"], "Invalid or expired token");

    let decode = app.json(Method::POST, "/api/v3/auth/decode", json!({"token": "garbage"})).await;
    assert_eq!(decode.status, StatusCode::BAD_REQUEST);
    assert_eq!(decode.body["message"], "Token is malformed");

    let no_password = app
        .json(Method::POST, "/api/v3/auth/login", json!({"username": "admin"}))
        .await;
    assert_eq!(no_password.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cookie_storage_flow() {
    let app = test_app();
    let credentials = json!({"username": "admin", "password": "admin123"});

    let login = app.json(Method::POST, "/api/v5/auth/login/cookie", credentials.clone()).await;
    assert_eq!(login.status, StatusCode::OK);
    assert!(login.body.get("token").is_none());
    let set_cookie = login.header(header::SET_COOKIE).to_string();
    assert!(set_cookie.starts_with("auth_token="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("Max-Age=86400"));

    let cookie = set_cookie.split(';').next().unwrap().to_string();
    let verify = app.get_with("/api/v5/auth/verify", &[("cookie", &cookie)]).await;
    assert_eq!(verify.status, StatusCode::OK);
    assert_eq!(verify.body["user"]["username"], "admin");

    let protected = app.get_with("/api/v5/auth/protected", &[("cookie", &cookie)]).await;
    assert_eq!(protected.status, StatusCode::OK);

    let anonymous = app.get("/api/v5/auth/protected").await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let logout = app.json(Method::POST, "/api/v5/auth/logout", json!({})).await;
    assert_eq!(logout.status, StatusCode::OK);
    assert!(logout.header(header::SET_COOKIE).contains("Max-Age=0"));

    let local = app.json(Method::POST, "/api/v5/auth/login/localstorage", credentials.clone()).await;
    assert_eq!(local.body["storage_method"], "localStorage");
    assert!(local.body["token"].is_string());

    let session = app.json(Method::POST, "/api/v5/auth/login/sessionstorage", credentials).await;
    assert_eq!(session.body["storage_method"], "sessionStorage");
}

#[tokio::test]
async fn test_webhook_registration() {
    let app = test_app();
    let hook = json!({
        "url": "http://127.0.0.1:9/hook",
        "event_type": "book.created",
        "secret": "s3cret"
    });

    let created = app.json(Method::POST, "/api/v1/webhooks", hook.clone()).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert!(created.body["data"].get("secret").is_none());
    assert_eq!(created.body["data"]["active"], true);

    let duplicate = app.json(Method::POST, "/api/v1/webhooks", hook).await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);

    let invalid = app.json(Method::POST, "/api/v1/webhooks", json!({"url": "nope"})).await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

    let listed = app.get("/api/v1/webhooks?event_type=book.created").await;
    assert_eq!(listed.body["data"].as_array().unwrap().len(), 1);
    assert!(listed.body["data"][0].get("secret").is_none());

    let id = created.body["data"]["id"].as_str().unwrap();
    let removed = app.send(request(Method::DELETE, &format!("/api/v1/webhooks/{}", id), &[], None)).await;
    assert_eq!(removed.status, StatusCode::OK);
    assert_eq!(app.get(&format!("/api/v1/webhooks/{}", id)).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_corrupted_collection_is_reset() {
    let app = test_app();
    std::fs::create_dir_all(&app.data_dir).unwrap();
    std::fs::write(app.data_dir.join("books.json"), "{ definitely not json").unwrap();

    let response = app.get("/api/v1/books").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["pagination"]["total"], 0);
}
