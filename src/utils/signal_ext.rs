//! Extension trait for Dioxus signals to reduce mutation boilerplate.
//!
//! Updating a struct inside a signal otherwise takes three steps (read,
//! mutate the clone, write back). `SignalExt` collapses that:
//!
//! ```ignore
//! favorites.mutate(|list| list.retain(|book| book.id != removed_id));
//! logs.update(|feed| filter_by_level(feed, level));
//! ```

use dioxus::prelude::*;

/// Mutation helpers for `Signal<T>` where `T: Clone`.
pub trait SignalExt<T: Clone + 'static> {
    /// Reads the current value, lets the closure mutate it, writes it back.
    fn mutate<F>(&mut self, f: F)
    where
        F: FnOnce(&mut T);

    /// Replaces the value with a transformation of the current one.
    fn update_with<F>(&mut self, f: F)
    where
        F: FnOnce(T) -> T;
}

impl<T: Clone + 'static> SignalExt<T> for Signal<T> {
    fn mutate<F>(&mut self, f: F)
    where
        F: FnOnce(&mut T),
    {
        let mut value = self.read().clone();
        f(&mut value);
        self.set(value);
    }

    fn update_with<F>(&mut self, f: F)
    where
        F: FnOnce(T) -> T,
    {
        let old = self.read().clone();
        self.set(f(old));
    }
}

// No unit tests here: the methods are thin wrappers over Signal::read and
// Signal::set, which need a live Dioxus runtime to exercise.
