//! Wire types for the Bookwise REST backend.
//!
//! Field names mirror the backend's JSON exactly; every type derives
//! `serde` traits plus `Clone`/`PartialEq` so it can flow through signals
//! and component props unchanged.

use serde::{Deserialize, Serialize};

/// A catalog book as returned by `GET /api/books`.
///
/// Immutable from the client's perspective; the catalog endpoint is the
/// single source for these records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: u32,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub author_nationality: String,
    pub genre: String,
    #[serde(default)]
    pub subgenre: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub pub_year: i32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub series: Option<String>,
    #[serde(default)]
    pub series_number: u32,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub awards: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub cover_image_url: String,
}

/// One page of the paginated catalog listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookPage {
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
    pub books: Vec<Book>,
}

/// A recommendation row from `GET /api/books/{id}/similar`.
///
/// Reduced projection of [`Book`] plus the similarity score (0..1) against
/// the query book. Transient: recomputed per query, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarBook {
    pub id: u32,
    pub title: String,
    pub author: String,
    pub genre: String,
    #[serde(default)]
    pub subgenre: String,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub cover_image_url: String,
    pub similarity_score: f32,
}

/// A favorited book with the timestamp the user saved it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteBook {
    pub id: u32,
    pub title: String,
    pub author: String,
    pub genre: String,
    #[serde(default)]
    pub subgenre: String,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub cover_image_url: String,
    pub favorited_at: String,
}

/// Membership answer from `GET /api/favorites/{id}/check`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteCheck {
    pub is_favorite: bool,
    pub book_id: u32,
}

/// Count answer from `GET /api/favorites/count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteCount {
    pub count: usize,
}

/// The authenticated account as returned by `GET /api/auth/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub created_at: String,
}

fn default_true() -> bool {
    true
}

/// Body for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body for `POST /api/auth/signup`.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Overall health answer from `GET /admin/api/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub status: String,
    pub message: String,
    #[serde(default)]
    pub timestamp: String,
}

impl SystemStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Background-monitor statistics from `GET /admin/api/monitor/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorStatus {
    pub monitor: MonitorStats,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorStats {
    pub running: bool,
    #[serde(default)]
    pub interval_seconds: u32,
    #[serde(default)]
    pub last_alert_at: Option<String>,
}

/// One unresolved alert row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: u32,
    pub severity: String,
    #[serde(default)]
    pub source: String,
    pub message: String,
    #[serde(default)]
    pub timestamp: String,
}

impl Alert {
    pub fn is_critical(&self) -> bool {
        self.severity.eq_ignore_ascii_case("critical")
    }
}

/// Alert listing from `GET /admin/api/alerts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertFeed {
    pub count: usize,
    pub critical_count: usize,
    pub alerts: Vec<Alert>,
}

/// One parsed log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub timestamp: String,
    pub level: String,
    pub message: String,
}

/// Log tail from `GET /admin/api/logs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogFeed {
    pub count: usize,
    pub logs: Vec<LogEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_book_page_deserializes_backend_shape() {
        let payload = json!({
            "total": 2,
            "page": 1,
            "page_size": 20,
            "books": [{
                "id": 1,
                "title": "Dune",
                "author": "Frank Herbert",
                "author_nationality": "American",
                "genre": "Science Fiction",
                "subgenre": "Space Opera",
                "language": "English",
                "pub_year": 1965,
                "pages": 412,
                "publisher": "Chilton Books",
                "isbn": "9780441013593",
                "series": "Dune",
                "series_number": 1,
                "rating": 4.6,
                "awards": "Hugo Award",
                "description": "Desert planet politics.",
                "keywords": "sand, spice",
                "cover_image_url": "https://covers.example/dune.jpg"
            }, {
                "id": 2,
                "title": "Foundation",
                "author": "Isaac Asimov",
                "genre": "Science Fiction"
            }]
        });

        let page: BookPage = serde_json::from_value(payload).unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.books[0].title, "Dune");
        assert_eq!(page.books[0].series.as_deref(), Some("Dune"));
        // Sparse records fall back to defaults instead of failing the page.
        assert_eq!(page.books[1].pages, 0);
        assert!(page.books[1].series.is_none());
    }

    #[test]
    fn test_similar_book_carries_score() {
        let payload = json!({
            "id": 7,
            "title": "Hyperion",
            "author": "Dan Simmons",
            "genre": "Science Fiction",
            "subgenre": "Space Opera",
            "rating": 4.4,
            "cover_image_url": "",
            "similarity_score": 0.83
        });

        let similar: SimilarBook = serde_json::from_value(payload).unwrap();
        assert!((similar.similarity_score - 0.83).abs() < f32::EPSILON);
    }

    #[test]
    fn test_user_defaults() {
        let payload = json!({
            "id": 42,
            "name": "Ada",
            "email": "ada@example.com"
        });

        let user: User = serde_json::from_value(payload).unwrap();
        assert!(user.is_active);
        assert!(!user.is_admin);
    }

    #[test]
    fn test_alert_feed_and_severity() {
        let payload = json!({
            "count": 3,
            "critical_count": 1,
            "alerts": [
                {"id": 1, "severity": "critical", "source": "monitor", "message": "High error rate", "timestamp": "2026-01-01T00:00:00"},
                {"id": 2, "severity": "warning", "source": "monitor", "message": "Slow responses", "timestamp": "2026-01-01T00:01:00"},
                {"id": 3, "severity": "warning", "source": "system", "message": "Disk filling", "timestamp": "2026-01-01T00:02:00"}
            ]
        });

        let feed: AlertFeed = serde_json::from_value(payload).unwrap();
        assert_eq!(feed.alerts.len(), 3);
        assert!(feed.alerts[0].is_critical());
        assert!(!feed.alerts[1].is_critical());
    }

    #[test]
    fn test_log_feed_deserializes() {
        let payload = json!({
            "count": 1,
            "logs": [{"timestamp": "2026-01-01 12:00:00", "level": "ERROR", "message": "boom"}]
        });

        let feed: LogFeed = serde_json::from_value(payload).unwrap();
        assert_eq!(feed.logs[0].level, "ERROR");
    }
}
