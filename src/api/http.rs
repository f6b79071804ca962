//! `reqwest`-backed implementation of [`ApiBackend`].
//!
//! On WASM this rides the browser `fetch` API; credentialed calls opt in to
//! cookie transmission with `fetch_credentials_include()`. On native builds
//! (desktop feature) the client keeps an in-process cookie store instead,
//! so the same session flow works without a browser.

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::types::{
    AlertFeed, BookPage, FavoriteBook, FavoriteCheck, FavoriteCount, LogFeed, LoginRequest,
    MonitorStatus, SignupRequest, SimilarBook, SystemStatus, User,
};
use super::ApiBackend;
use crate::error::ApiError;

/// HTTP client for the Bookwise backend.
#[derive(Clone)]
pub struct HttpApi {
    base: String,
    client: Client,
}

impl HttpApi {
    /// Creates a client for the backend at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base = base_url.into().trim_end_matches('/').to_string();
        Self {
            base,
            client: build_client(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        credentialed(self.client.get(self.url(path)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        credentialed(self.client.post(self.url(path)))
    }

    fn delete(&self, path: &str) -> RequestBuilder {
        credentialed(self.client.delete(self.url(path)))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .unwrap_or_default()
}

#[cfg(target_arch = "wasm32")]
fn build_client() -> Client {
    Client::new()
}

/// Marks a request as cookie-carrying.
///
/// The session token lives in an HTTP-only cookie the client never reads;
/// all it can do is ask the browser to send it along.
#[cfg(target_arch = "wasm32")]
fn credentialed(builder: RequestBuilder) -> RequestBuilder {
    builder.fetch_credentials_include()
}

#[cfg(not(target_arch = "wasm32"))]
fn credentialed(builder: RequestBuilder) -> RequestBuilder {
    // Native builds use the client-level cookie store instead.
    builder
}

/// Pulls the FastAPI-style `{"detail": "..."}` message out of an error
/// body, falling back to the raw text.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str().map(String::from)))
        .unwrap_or_else(|| body.trim().to_string())
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.as_u16() == 401 {
        return Err(ApiError::Unauthorized);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            code: status.as_u16(),
            detail: error_detail(&body),
        });
    }
    Ok(response)
}

async fn read_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
    let response = builder
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    let response = check_status(response).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

async fn read_empty(builder: RequestBuilder) -> Result<(), ApiError> {
    let response = builder
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    check_status(response).await?;
    Ok(())
}

#[async_trait::async_trait(?Send)]
impl ApiBackend for HttpApi {
    async fn books(&self, page: u32, page_size: u32) -> Result<BookPage, ApiError> {
        read_json(
            self.get("/api/books")
                .query(&[("page", page), ("page_size", page_size)]),
        )
        .await
    }

    async fn similar_books(&self, book_id: u32, limit: usize) -> Result<Vec<SimilarBook>, ApiError> {
        read_json(
            self.get(&format!("/api/books/{book_id}/similar"))
                .query(&[("limit", limit)]),
        )
        .await
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        read_json(self.get("/api/auth/me")).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        read_json(self.post("/api/auth/login").json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }))
        .await
    }

    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<User, ApiError> {
        read_json(self.post("/api/auth/signup").json(&SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }))
        .await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        read_empty(self.post("/api/auth/logout")).await
    }

    async fn favorites(&self) -> Result<Vec<FavoriteBook>, ApiError> {
        read_json(self.get("/api/favorites")).await
    }

    async fn add_favorite(&self, book_id: u32) -> Result<(), ApiError> {
        read_empty(self.post(&format!("/api/favorites/{book_id}"))).await
    }

    async fn remove_favorite(&self, book_id: u32) -> Result<(), ApiError> {
        read_empty(self.delete(&format!("/api/favorites/{book_id}"))).await
    }

    async fn check_favorite(&self, book_id: u32) -> Result<FavoriteCheck, ApiError> {
        read_json(self.get(&format!("/api/favorites/{book_id}/check"))).await
    }

    async fn favorites_count(&self) -> Result<FavoriteCount, ApiError> {
        read_json(self.get("/api/favorites/count")).await
    }

    async fn system_status(&self) -> Result<SystemStatus, ApiError> {
        read_json(self.get("/admin/api/status")).await
    }

    async fn monitor_status(&self) -> Result<MonitorStatus, ApiError> {
        read_json(self.get("/admin/api/monitor/status")).await
    }

    async fn alerts(&self) -> Result<AlertFeed, ApiError> {
        read_json(self.get("/admin/api/alerts")).await
    }

    async fn logs(&self, lines: u32, level: Option<&str>) -> Result<LogFeed, ApiError> {
        let mut query = vec![("lines".to_string(), lines.to_string())];
        if let Some(level) = level {
            query.push(("level".to_string(), level.to_string()));
        }
        read_json(self.get("/admin/api/logs").query(&query)).await
    }

    async fn resolve_alert(&self, alert_id: u32) -> Result<(), ApiError> {
        read_empty(self.post(&format!("/admin/api/alerts/{alert_id}/resolve"))).await
    }
}
