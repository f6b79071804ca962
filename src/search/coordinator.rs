//! Search state machine: query, candidates, selection, similarity results.

use crate::api::types::{Book, SimilarBook};

use super::location::SearchParams;

/// Maximum candidates shown in the dropdown.
pub const MAX_CANDIDATES: usize = 10;

/// How many similar books to request for a selection.
pub const SIMILAR_LIMIT: usize = 12;

/// Derives the dropdown candidate list for a query.
///
/// Case-insensitive substring match against title OR author, in collection
/// order (not relevance-ranked), truncated to [`MAX_CANDIDATES`]. An empty
/// or whitespace query yields no candidates.
pub fn filter_candidates<'a>(books: &'a [Book], query: &str) -> Vec<&'a Book> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    books
        .iter()
        .filter(|book| {
            book.title.to_lowercase().contains(&needle)
                || book.author.to_lowercase().contains(&needle)
        })
        .take(MAX_CANDIDATES)
        .collect()
}

/// Tags a similarity fetch with the selection that requested it.
///
/// When the response arrives the coordinator only accepts it if the ticket
/// still matches the current selection generation; a newer selection makes
/// older tickets stale, regardless of response arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    pub book_id: u32,
}

/// Client-side search state for the catalog view.
///
/// Plain data: components hold it inside a signal and route asynchronous
/// completions back through [`apply_results`](Self::apply_results) /
/// [`apply_failure`](Self::apply_failure).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchCoordinator {
    query: String,
    selected: Option<Book>,
    results: Vec<SimilarBook>,
    fetching: bool,
    generation: u64,
}

impl SearchCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selected(&self) -> Option<&Book> {
        self.selected.as_ref()
    }

    pub fn results(&self) -> &[SimilarBook] {
        &self.results
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    /// Updates the raw query text (search-as-you-type). The current
    /// selection and its results stay visible until a new selection or a
    /// reset replaces them.
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
    }

    /// Selects a book: the query snaps to the book's exact title and a
    /// similarity fetch is due. Selecting the same book twice yields the
    /// same displayed state (the new ticket re-fetches, which the cache
    /// absorbs).
    pub fn select(&mut self, book: &Book) -> FetchTicket {
        self.query = book.title.clone();
        self.selected = Some(book.clone());
        self.results.clear();
        self.fetching = true;
        self.generation += 1;
        FetchTicket {
            generation: self.generation,
            book_id: book.id,
        }
    }

    /// Enter pressed without picking from the dropdown: fall back to the
    /// first candidate, if any.
    pub fn submit(&mut self, books: &[Book]) -> Option<FetchTicket> {
        if self.selected.is_some() {
            return None;
        }
        let first = filter_candidates(books, &self.query).first().cloned()?.clone();
        Some(self.select(&first))
    }

    /// Accepts similarity results if the ticket is still current. Stale
    /// tickets (an older selection's response arriving late) are dropped.
    pub fn apply_results(&mut self, ticket: FetchTicket, results: Vec<SimilarBook>) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.results = results;
        self.fetching = false;
        true
    }

    /// A failed similarity fetch leaves the selection in place with zero
    /// recommendations; there is no rollback to a previous selection.
    pub fn apply_failure(&mut self, ticket: FetchTicket) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.results.clear();
        self.fetching = false;
        true
    }

    /// Clears query, selection, and results. The caller also clears the
    /// URL parameters (see [`params`](Self::params), which now returns
    /// `None`).
    pub fn reset(&mut self) {
        self.query.clear();
        self.selected = None;
        self.results.clear();
        self.fetching = false;
        self.generation += 1;
    }

    /// URL parameters encoding the current selection, if any.
    pub fn params(&self) -> Option<SearchParams> {
        self.selected.as_ref().map(|book| SearchParams {
            book_id: book.id,
            search: self.query.clone(),
        })
    }

    /// Restores a deep-linked selection against the loaded collection.
    ///
    /// Returns the similarity fetch to issue, or `None` when the encoded
    /// book no longer exists in the catalog (the search text is still
    /// restored so the user sees what the link meant). The caller must not
    /// re-write the URL for a restore.
    pub fn restore(&mut self, params: &SearchParams, books: &[Book]) -> Option<FetchTicket> {
        match books.iter().find(|book| book.id == params.book_id) {
            Some(book) => {
                let book = book.clone();
                Some(self.select(&book))
            }
            None => {
                self.query = params.search.clone();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: u32, title: &str, author: &str) -> Book {
        Book {
            id,
            title: title.to_string(),
            author: author.to_string(),
            author_nationality: String::new(),
            genre: "Science Fiction".to_string(),
            subgenre: String::new(),
            language: "English".to_string(),
            pub_year: 1965,
            pages: 400,
            publisher: String::new(),
            isbn: String::new(),
            series: None,
            series_number: 0,
            rating: 4.5,
            awards: None,
            description: String::new(),
            keywords: String::new(),
            cover_image_url: String::new(),
        }
    }

    fn similar(id: u32, title: &str, score: f32) -> SimilarBook {
        SimilarBook {
            id,
            title: title.to_string(),
            author: String::new(),
            genre: String::new(),
            subgenre: String::new(),
            rating: 0.0,
            cover_image_url: String::new(),
            similarity_score: score,
        }
    }

    fn collection() -> Vec<Book> {
        vec![
            book(1, "Dune", "Frank Herbert"),
            book(2, "Foundation", "Isaac Asimov"),
            book(3, "Dune Messiah", "Frank Herbert"),
        ]
    }

    #[test]
    fn test_filter_is_case_insensitive_on_title_and_author() {
        let books = collection();

        let by_title: Vec<u32> = filter_candidates(&books, "dUnE")
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(by_title, vec![1, 3]);

        let by_author: Vec<u32> = filter_candidates(&books, "asimov")
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(by_author, vec![2]);
    }

    #[test]
    fn test_filter_preserves_collection_order_and_caps_at_ten() {
        let books: Vec<Book> = (1..=25)
            .map(|i| book(i, &format!("Book {i}"), "Same Author"))
            .collect();

        let hits = filter_candidates(&books, "same author");
        assert_eq!(hits.len(), MAX_CANDIDATES);
        let ids: Vec<u32> = hits.iter().map(|b| b.id).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<u32>>());
    }

    #[test]
    fn test_empty_query_yields_no_candidates() {
        let books = collection();
        assert!(filter_candidates(&books, "").is_empty());
        assert!(filter_candidates(&books, "   ").is_empty());
    }

    #[test]
    fn test_select_snaps_query_to_exact_title() {
        let books = collection();
        let mut coordinator = SearchCoordinator::new();
        coordinator.set_query("du");

        let ticket = coordinator.select(&books[0]);

        assert_eq!(coordinator.query(), "Dune");
        assert_eq!(ticket.book_id, 1);
        assert!(coordinator.is_fetching());

        // Selecting the same book again yields the same displayed state.
        coordinator.select(&books[0]);
        assert_eq!(coordinator.query(), "Dune");
        assert_eq!(coordinator.selected().map(|b| b.id), Some(1));
    }

    #[test]
    fn test_submit_selects_first_candidate() {
        // Spec scenario: "du" matches only "Dune"; Enter selects it.
        let books = collection();
        let mut coordinator = SearchCoordinator::new();
        coordinator.set_query("du");

        let candidates = filter_candidates(&books, "dun");
        assert_eq!(candidates.len(), 2);

        coordinator.set_query("dune m");
        let ticket = coordinator.submit(&books).expect("a candidate exists");
        assert_eq!(ticket.book_id, 3);
        assert_eq!(coordinator.query(), "Dune Messiah");
    }

    #[test]
    fn test_enter_with_single_candidate_selects_it() {
        let books = vec![
            book(1, "Dune", "Frank Herbert"),
            book(2, "Foundation", "Isaac Asimov"),
        ];
        let mut coordinator = SearchCoordinator::new();
        coordinator.set_query("du");

        let candidates = filter_candidates(&books, "du");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Dune");

        let ticket = coordinator.submit(&books).expect("one candidate");
        assert_eq!(ticket.book_id, 1);
        assert_eq!(coordinator.query(), "Dune");
        // The similarity fetch issued for a selection is capped at 12.
        assert_eq!(SIMILAR_LIMIT, 12);
    }

    #[test]
    fn test_submit_without_candidates_or_with_selection_is_noop() {
        let books = collection();
        let mut coordinator = SearchCoordinator::new();

        coordinator.set_query("zzzz");
        assert!(coordinator.submit(&books).is_none());

        coordinator.set_query("dune");
        coordinator.select(&books[0]);
        assert!(coordinator.submit(&books).is_none());
    }

    #[test]
    fn test_late_response_for_old_selection_is_dropped() {
        // Select A, then B before A's fetch resolves; A's response arrives
        // last but must not win.
        let books = collection();
        let mut coordinator = SearchCoordinator::new();

        let ticket_a = coordinator.select(&books[0]);
        let ticket_b = coordinator.select(&books[1]);

        assert!(coordinator.apply_results(ticket_b, vec![similar(9, "Hyperion", 0.9)]));
        assert!(!coordinator.apply_results(ticket_a, vec![similar(8, "Dune Messiah", 0.8)]));

        assert_eq!(coordinator.selected().map(|b| b.id), Some(2));
        assert_eq!(coordinator.results().len(), 1);
        assert_eq!(coordinator.results()[0].title, "Hyperion");
        assert!(!coordinator.is_fetching());
    }

    #[test]
    fn test_late_response_order_reversed() {
        let books = collection();
        let mut coordinator = SearchCoordinator::new();

        let ticket_a = coordinator.select(&books[0]);
        let ticket_b = coordinator.select(&books[1]);

        // A's response arrives first this time; still dropped.
        assert!(!coordinator.apply_results(ticket_a, vec![similar(8, "Dune Messiah", 0.8)]));
        assert!(coordinator.is_fetching(), "still waiting for B");
        assert!(coordinator.apply_results(ticket_b, vec![similar(9, "Hyperion", 0.9)]));
        assert_eq!(coordinator.results()[0].title, "Hyperion");
    }

    #[test]
    fn test_failure_keeps_selection_with_empty_results() {
        let books = collection();
        let mut coordinator = SearchCoordinator::new();
        let ticket = coordinator.select(&books[0]);

        assert!(coordinator.apply_failure(ticket));

        assert_eq!(coordinator.selected().map(|b| b.id), Some(1));
        assert!(coordinator.results().is_empty());
        assert!(!coordinator.is_fetching());
    }

    #[test]
    fn test_reset_clears_everything() {
        let books = collection();
        let mut coordinator = SearchCoordinator::new();
        let ticket = coordinator.select(&books[0]);
        coordinator.apply_results(ticket, vec![similar(9, "Hyperion", 0.9)]);

        coordinator.reset();

        assert_eq!(coordinator.query(), "");
        assert!(coordinator.selected().is_none());
        assert!(coordinator.results().is_empty());
        assert!(coordinator.params().is_none());
    }

    #[test]
    fn test_reset_invalidates_outstanding_tickets() {
        let books = collection();
        let mut coordinator = SearchCoordinator::new();
        let ticket = coordinator.select(&books[0]);

        coordinator.reset();

        assert!(!coordinator.apply_results(ticket, vec![similar(9, "Hyperion", 0.9)]));
        assert!(coordinator.results().is_empty());
    }

    #[test]
    fn test_params_roundtrip_through_selection() {
        let books = collection();
        let mut coordinator = SearchCoordinator::new();
        coordinator.select(&books[0]);

        let params = coordinator.params().expect("selection encodes params");
        assert_eq!(params.book_id, 1);
        assert_eq!(params.search, "Dune");
    }

    #[test]
    fn test_restore_resolves_against_collection() {
        let books = collection();
        let mut coordinator = SearchCoordinator::new();

        let params = SearchParams {
            book_id: 2,
            search: "Foundation".to_string(),
        };
        let ticket = coordinator.restore(&params, &books).expect("book exists");

        assert_eq!(ticket.book_id, 2);
        assert_eq!(coordinator.selected().map(|b| b.id), Some(2));
        assert_eq!(coordinator.query(), "Foundation");
    }

    #[test]
    fn test_restore_unknown_book_keeps_search_text_only() {
        let books = collection();
        let mut coordinator = SearchCoordinator::new();

        let params = SearchParams {
            book_id: 999,
            search: "vanished".to_string(),
        };
        assert!(coordinator.restore(&params, &books).is_none());
        assert_eq!(coordinator.query(), "vanished");
        assert!(coordinator.selected().is_none());
    }
}
