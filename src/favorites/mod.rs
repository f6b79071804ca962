//! Optimistic favorite toggling.
//!
//! The toggle is modeled as an explicit two-phase state machine instead of
//! ad-hoc boolean flipping, so both phases are assertable in tests:
//!
//! ```text
//! Settled(a) ── begin() ──▶ Tentative { shown: !a, prior: a }
//!                               │                │
//!                           confirm()        rollback()
//!                               ▼                ▼
//!                        Settled(!a)        Settled(a)
//! ```
//!
//! While a request is in flight (`Tentative`), further `begin()` calls are
//! refused: concurrent toggles on the same book serialize by ignoring
//! re-entry, so the displayed state always matches the last settled
//! request.

/// Two-phase optimistic toggle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleState {
    /// No request in flight; the boolean is what the server last confirmed
    /// (or the initial hint).
    Settled(bool),
    /// Optimistically flipped; awaiting the add/remove response.
    Tentative { shown: bool, prior: bool },
}

/// Favorite state for a single book id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FavoriteToggle {
    state: ToggleState,
}

impl FavoriteToggle {
    /// Starts settled on the given hint (`false` until the membership
    /// check resolves).
    pub fn new(favorited: bool) -> Self {
        Self {
            state: ToggleState::Settled(favorited),
        }
    }

    /// What the UI displays right now.
    pub fn shown(&self) -> bool {
        match self.state {
            ToggleState::Settled(value) => value,
            ToggleState::Tentative { shown, .. } => shown,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, ToggleState::Tentative { .. })
    }

    pub fn state(&self) -> ToggleState {
        self.state
    }

    /// Replaces the settled value from a resolved membership check.
    /// Ignored while a toggle is in flight; the in-flight request is the
    /// fresher intent.
    pub fn sync(&mut self, favorited: bool) {
        if let ToggleState::Settled(_) = self.state {
            self.state = ToggleState::Settled(favorited);
        }
    }

    /// Optimistically flips and returns the state the server should be
    /// asked to make true, or `None` when a toggle is already in flight.
    pub fn begin(&mut self) -> Option<bool> {
        match self.state {
            ToggleState::Settled(prior) => {
                let shown = !prior;
                self.state = ToggleState::Tentative { shown, prior };
                Some(shown)
            }
            ToggleState::Tentative { .. } => None,
        }
    }

    /// The request succeeded: the tentative value becomes settled.
    pub fn confirm(&mut self) {
        if let ToggleState::Tentative { shown, .. } = self.state {
            self.state = ToggleState::Settled(shown);
        }
    }

    /// The request failed: restore the pre-toggle value.
    pub fn rollback(&mut self) {
        if let ToggleState::Tentative { prior, .. } = self.state {
            self.state = ToggleState::Settled(prior);
        }
    }
}
