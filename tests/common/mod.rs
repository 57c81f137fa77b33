use axum::{
    extract::State,
    http::{ header::SET_COOKIE, HeaderMap, StatusCode },
    response::{ Html, IntoResponse, Response },
    routing::{ get, post },
    Json,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::{ Arc, Mutex };
use tokio::net::TcpListener;

pub const TOKEN: &str = "c3JmLXRva2Vu";
pub const COOKIE: &str = "_app_session=logged-in";
pub const ROTATED_COOKIE: &str = "_app_session=rotated";

/// What the fake registry saw, in arrival order.
#[derive(Clone, Default)]
pub struct Registry {
    pub received: Arc<Mutex<Vec<String>>>,
    pub cookies: Arc<Mutex<Vec<String>>>,
}

#[derive(Deserialize)]
struct Entry {
    domain: String,
}

// Renders the token and rotates the session cookie in the same response.
async fn page(headers: HeaderMap) -> Response {
    if headers.get("cookie").and_then(|v| v.to_str().ok()) != Some(COOKIE) {
        return (StatusCode::UNAUTHORIZED, Html("<html><head></head></html>")).into_response();
    }
    (
        [(SET_COOKIE, format!("{ROTATED_COOKIE}; Path=/"))],
        Html(
            format!(r#"<html><head><meta name="csrf-token" content="{TOKEN}"></head><body></body></html>"#)
        ),
    ).into_response()
}

async fn blocklist(
    State(registry): State<Registry>,
    headers: HeaderMap,
    Json(entry): Json<Entry>
) -> impl IntoResponse {
    let cookie = headers
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    registry.received.lock().unwrap().push(entry.domain.clone());
    registry.cookies.lock().unwrap().push(cookie.clone());

    if headers.get("x-csrf-token").and_then(|v| v.to_str().ok()) != Some(TOKEN) {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "error": "bad token" })));
    }
    if cookie != ROTATED_COOKIE {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "stale session" })));
    }
    if entry.domain.ends_with(".forbidden") {
        return (StatusCode::FORBIDDEN, Json(json!({ "error": "not allowed" })));
    }
    (StatusCode::CREATED, Json(json!({ "domain": entry.domain, "blocked": true })))
}

// Spawns the fake web application on a random port and returns its base url.
pub async fn spawn_registry() -> (String, Registry) {
    let registry = Registry::default();
    let app = Router::new()
        .route("/", get(page))
        .route("/api/source_preference/blocklist.json", post(blocklist))
        .with_state(registry.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("failed to run registry");
    });

    (format!("http://{addr}"), registry)
}
