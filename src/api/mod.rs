//! REST boundary for the Bookwise backend.
//!
//! The backend is an external collaborator: all the client knows is a set
//! of JSON endpoints behind an HTTP-only session cookie. This module keeps
//! that boundary behind the [`ApiBackend`] trait so the state layers
//! (cache, session, search, favorites) can be exercised in tests against a
//! scripted fake instead of a live server.
//!
//! - `types`: wire payloads, field-for-field with the backend's JSON
//! - `http`: the `reqwest`-based implementation used in the running app
//!
//! The trait is `?Send` on purpose: on WASM everything runs on the single
//! browser thread, and holding `Rc` handles across awaits is the normal
//! calling convention here.

pub mod http;
pub mod types;

use crate::error::ApiError;
use types::{
    AlertFeed, BookPage, FavoriteBook, FavoriteCheck, FavoriteCount, LogFeed, MonitorStatus,
    SimilarBook, SystemStatus, User,
};

pub use http::HttpApi;

/// Operations the Bookwise client needs from the backend.
///
/// Credentialed endpoints rely on the browser-managed session cookie; the
/// client never sees the token value. A 401 anywhere surfaces as
/// [`ApiError::Unauthorized`].
#[async_trait::async_trait(?Send)]
pub trait ApiBackend {
    /// `GET /api/books?page&page_size`
    async fn books(&self, page: u32, page_size: u32) -> Result<BookPage, ApiError>;

    /// `GET /api/books/{id}/similar?limit`
    async fn similar_books(&self, book_id: u32, limit: usize) -> Result<Vec<SimilarBook>, ApiError>;

    /// `GET /api/auth/me` (credentialed)
    async fn current_user(&self) -> Result<User, ApiError>;

    /// `POST /api/auth/login`
    async fn login(&self, email: &str, password: &str) -> Result<User, ApiError>;

    /// `POST /api/auth/signup`
    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<User, ApiError>;

    /// `POST /api/auth/logout`
    async fn logout(&self) -> Result<(), ApiError>;

    /// `GET /api/favorites`
    async fn favorites(&self) -> Result<Vec<FavoriteBook>, ApiError>;

    /// `POST /api/favorites/{id}`
    async fn add_favorite(&self, book_id: u32) -> Result<(), ApiError>;

    /// `DELETE /api/favorites/{id}`
    async fn remove_favorite(&self, book_id: u32) -> Result<(), ApiError>;

    /// `GET /api/favorites/{id}/check`
    async fn check_favorite(&self, book_id: u32) -> Result<FavoriteCheck, ApiError>;

    /// `GET /api/favorites/count`
    async fn favorites_count(&self) -> Result<FavoriteCount, ApiError>;

    /// `GET /admin/api/status`
    async fn system_status(&self) -> Result<SystemStatus, ApiError>;

    /// `GET /admin/api/monitor/status`
    async fn monitor_status(&self) -> Result<MonitorStatus, ApiError>;

    /// `GET /admin/api/alerts`
    async fn alerts(&self) -> Result<AlertFeed, ApiError>;

    /// `GET /admin/api/logs?lines&level`
    async fn logs(&self, lines: u32, level: Option<&str>) -> Result<LogFeed, ApiError>;

    /// `POST /admin/api/alerts/{id}/resolve`
    async fn resolve_alert(&self, alert_id: u32) -> Result<(), ApiError>;
}
