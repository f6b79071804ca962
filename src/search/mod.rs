//! Catalog search and recommendation coordination.
//!
//! This module owns the client-side search state machine:
//! - `coordinator`: query text, the derived candidate list, the selected
//!   book, and its similarity results, with last-selection-wins ordering
//!   for in-flight fetches
//! - `location`: the URL-parameter seam (`bookId`, `search`) that makes a
//!   selection deep-linkable, behind a trait so tests never touch the
//!   browser
//!
//! The actual similarity computation is the backend's business; the
//! coordinator only decides *when* to ask and *which* response is still
//! interesting by the time it arrives.

mod coordinator;
mod location;

pub use coordinator::{filter_candidates, FetchTicket, SearchCoordinator, MAX_CANDIDATES, SIMILAR_LIMIT};
pub use location::{LocationSync, MemoryLocation, SearchParams};

#[cfg(target_arch = "wasm32")]
pub use location::BrowserLocation;
