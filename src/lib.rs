//! Bookwise - book discovery web client.
//!
//! A Dioxus web application over a book-recommendation REST backend:
//! search-as-you-type across the catalog, similarity-based
//! recommendations for a selected book, cookie-session authentication,
//! favorites with optimistic toggling, and an admin dashboard that polls
//! status, alerts, and logs.
//!
//! # Architecture
//!
//! - **api**: the REST boundary (`ApiBackend` trait + `reqwest` client);
//!   session identity rides an HTTP-only cookie
//! - **cache**: process-wide request cache (de-duplication, staleness
//!   windows, stale-while-error, logout purge)
//! - **session**: the auth state machine consumed by the whole tree
//! - **search**: query/candidates/selection coordination with
//!   last-selection-wins ordering and URL deep-linking
//! - **favorites**: two-phase optimistic toggle state
//! - **components**: the Dioxus component tree wiring it all together
//!
//! # Concurrency model
//!
//! Everything runs on the single browser thread; suspension points are
//! network calls and polling sleeps. Shared state lives in `Rc`-backed
//! handles injected through Dioxus context, never in module-level
//! globals.

pub mod api;
pub mod cache;
pub mod components;
pub mod error;
pub mod favorites;
pub mod search;
pub mod session;
pub mod utils;
