//! The memoized async store behind [`RequestCache`].

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use dioxus::logger::tracing::warn;
use futures_channel::oneshot;
use instant::Instant;

use super::{CacheKey, CachePolicy};
use crate::error::ApiError;

type Stored = Rc<dyn Any>;
type Waiter = oneshot::Sender<Result<Stored, ApiError>>;

/// An in-flight fetch for one key.
///
/// The id ties a completion back to the flight that started it: if the
/// entry was evicted (or re-fetched under a new flight) while the request
/// was awaited, the completion must not write into the map.
struct Flight {
    id: u64,
    waiters: Vec<Waiter>,
}

struct Entry {
    value: Option<(Stored, Instant)>,
    flight: Option<Flight>,
}

impl Entry {
    fn empty() -> Self {
        Self {
            value: None,
            flight: None,
        }
    }
}

enum Claim {
    /// Another caller already owns the fetch; wait for its result.
    Joined(oneshot::Receiver<Result<Stored, ApiError>>),
    /// This caller owns the fetch under the given flight id.
    Claimed(u64),
}

/// Process-wide memoized async data source.
///
/// Cheap to clone; clones share the same entry map. See the module docs in
/// [`crate::cache`] for the guarantees.
#[derive(Clone, Default)]
pub struct RequestCache {
    entries: Rc<RefCell<HashMap<CacheKey, Entry>>>,
    next_flight: Rc<Cell<u64>>,
}

impl RequestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value if fresh, otherwise fetches (joining any
    /// in-flight request for the same key).
    pub async fn get<T, F, Fut>(
        &self,
        key: CacheKey,
        policy: CachePolicy,
        fetch: F,
    ) -> Result<T, ApiError>
    where
        T: Clone + 'static,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if let Some(value) = self.fresh(&key, policy) {
            return Ok(value);
        }
        self.run(key, policy, fetch).await
    }

    /// Fetches regardless of freshness, still de-duplicated.
    ///
    /// Pollers call this on their interval: the cached value is replaced
    /// in place once the new one is ready, and kept as-is when the fetch
    /// fails, so consumers never flash to empty.
    pub async fn refresh<T, F, Fut>(
        &self,
        key: CacheKey,
        policy: CachePolicy,
        fetch: F,
    ) -> Result<T, ApiError>
    where
        T: Clone + 'static,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        self.run(key, policy, fetch).await
    }

    /// Non-blocking read of whatever is cached under `key`, fresh or not.
    /// Used for initial render hints while the real fetch runs.
    pub fn peek<T: Clone + 'static>(&self, key: &CacheKey) -> Option<T> {
        let entries = self.entries.borrow();
        let (stored, _) = entries.get(key)?.value.as_ref()?;
        downcast(stored)
    }

    /// Removes every entry matching the predicate. In-flight requests for
    /// removed entries are cancelled: their waiters observe
    /// [`ApiError::Cancelled`] and their results are discarded.
    pub fn invalidate<F: Fn(&CacheKey) -> bool>(&self, predicate: F) {
        self.entries.borrow_mut().retain(|key, _| !predicate(key));
    }

    /// Purges everything tied to the signed-in account.
    pub fn invalidate_user_scoped(&self) {
        self.invalidate(CacheKey::is_user_scoped);
    }

    /// Drops every entry. Called on logout and on account switch.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn fresh<T: Clone + 'static>(&self, key: &CacheKey, policy: CachePolicy) -> Option<T> {
        let entries = self.entries.borrow();
        let (stored, fetched_at) = entries.get(key)?.value.as_ref()?;
        if fetched_at.elapsed() < policy.max_age {
            downcast(stored)
        } else {
            None
        }
    }

    async fn run<T, F, Fut>(&self, key: CacheKey, policy: CachePolicy, fetch: F) -> Result<T, ApiError>
    where
        T: Clone + 'static,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let claim = {
            let mut entries = self.entries.borrow_mut();
            let entry = entries.entry(key.clone()).or_insert_with(Entry::empty);
            match entry.flight.as_mut() {
                Some(flight) => {
                    let (tx, rx) = oneshot::channel();
                    flight.waiters.push(tx);
                    Claim::Joined(rx)
                }
                None => {
                    let id = self.next_flight.get();
                    self.next_flight.set(id + 1);
                    entry.flight = Some(Flight {
                        id,
                        waiters: Vec::new(),
                    });
                    Claim::Claimed(id)
                }
            }
        };

        let flight_id = match claim {
            Claim::Joined(rx) => return join_flight::<T>(rx).await,
            Claim::Claimed(id) => id,
        };

        let mut outcome = fetch().await;
        let mut attempt = 1;
        while outcome.is_err() && attempt < policy.attempts {
            attempt += 1;
            outcome = fetch().await;
        }

        // Re-check entry state after the awaited gap: the entry may have
        // been evicted or re-claimed while the request was outstanding.
        let mut entries = self.entries.borrow_mut();
        let entry = match entries.get_mut(&key) {
            Some(entry) if entry.flight.as_ref().is_some_and(|f| f.id == flight_id) => entry,
            _ => return outcome,
        };
        let waiters = match entry.flight.take() {
            Some(flight) => flight.waiters,
            None => Vec::new(),
        };

        match outcome {
            Ok(value) => {
                let stored: Stored = Rc::new(value.clone());
                entry.value = Some((stored.clone(), Instant::now()));
                for waiter in waiters {
                    let _ = waiter.send(Ok(stored.clone()));
                }
                Ok(value)
            }
            Err(err) => match entry.value.as_ref().map(|(stored, _)| stored.clone()) {
                // Stale-while-error: the previous value stays visible.
                Some(stale) => {
                    warn!("fetch failed, serving stale entry: {}", err);
                    for waiter in waiters {
                        let _ = waiter.send(Ok(stale.clone()));
                    }
                    match downcast::<T>(&stale) {
                        Some(value) => Ok(value),
                        None => Err(err),
                    }
                }
                None => {
                    for waiter in waiters {
                        let _ = waiter.send(Err(err.clone()));
                    }
                    Err(err)
                }
            },
        }
    }
}

fn downcast<T: Clone + 'static>(stored: &Stored) -> Option<T> {
    stored.downcast_ref::<T>().cloned()
}

async fn join_flight<T: Clone + 'static>(
    rx: oneshot::Receiver<Result<Stored, ApiError>>,
) -> Result<T, ApiError> {
    match rx.await {
        Ok(Ok(stored)) => downcast(&stored)
            .ok_or_else(|| ApiError::Decode("cache entry type mismatch".to_string())),
        Ok(Err(err)) => Err(err),
        Err(_cancelled) => Err(ApiError::Cancelled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;
    use std::collections::VecDeque;
    use std::time::Duration;

    fn key() -> CacheKey {
        CacheKey::books(1, 20)
    }

    /// Always-stale policy so every `get` reaches the fetch path.
    fn stale_policy(attempts: u32) -> CachePolicy {
        CachePolicy::new(Duration::ZERO, attempts)
    }

    fn fresh_policy() -> CachePolicy {
        CachePolicy::new(Duration::from_secs(3600), 2)
    }

    #[test]
    fn test_fresh_hit_skips_fetch() {
        let cache = RequestCache::new();
        let calls = Rc::new(Cell::new(0u32));

        let fetch = {
            let calls = calls.clone();
            move || {
                calls.set(calls.get() + 1);
                async { Ok(7u32) }
            }
        };

        let first = block_on(cache.get(key(), fresh_policy(), fetch.clone()));
        let second = block_on(cache.get(key(), fresh_policy(), fetch));

        assert_eq!(first, Ok(7));
        assert_eq!(second, Ok(7));
        assert_eq!(calls.get(), 1, "second get must be served from cache");
    }

    #[test]
    fn test_stale_entry_is_refetched() {
        let cache = RequestCache::new();
        let calls = Rc::new(Cell::new(0u32));

        let fetch = {
            let calls = calls.clone();
            move || {
                calls.set(calls.get() + 1);
                async { Ok(7u32) }
            }
        };

        block_on(cache.get(key(), stale_policy(1), fetch.clone())).unwrap();
        block_on(cache.get(key(), stale_policy(1), fetch)).unwrap();

        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_concurrent_gets_share_one_flight() {
        let mut pool = LocalPool::new();
        let spawner = pool.spawner();
        let cache = RequestCache::new();
        let calls = Rc::new(Cell::new(0u32));
        let (gate_tx, gate_rx) = oneshot::channel::<()>();
        let gate = Rc::new(RefCell::new(Some(gate_rx)));

        let fetch = {
            let calls = calls.clone();
            let gate = gate.clone();
            move || {
                calls.set(calls.get() + 1);
                let gate = gate.borrow_mut().take();
                async move {
                    if let Some(gate) = gate {
                        let _ = gate.await;
                    }
                    Ok(41u32)
                }
            }
        };

        let task = |cache: RequestCache, fetch: _| async move {
            cache.get(key(), fresh_policy(), fetch).await
        };
        let first = spawner
            .spawn_local_with_handle(task(cache.clone(), fetch.clone()))
            .unwrap();
        let second = spawner
            .spawn_local_with_handle(task(cache.clone(), fetch))
            .unwrap();

        pool.run_until_stalled();
        assert_eq!(calls.get(), 1, "second caller must join the first flight");

        gate_tx.send(()).unwrap();
        let (first, second) = pool.run_until(async { futures::join!(first, second) });
        assert_eq!(first, Ok(41));
        assert_eq!(second, Ok(41));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_bounded_retry_then_success() {
        let cache = RequestCache::new();
        let responses = Rc::new(RefCell::new(VecDeque::from([
            Err(ApiError::Network("flaky".into())),
            Ok(9u32),
        ])));
        let calls = Rc::new(Cell::new(0u32));

        let fetch = {
            let responses = responses.clone();
            let calls = calls.clone();
            move || {
                calls.set(calls.get() + 1);
                let next = responses.borrow_mut().pop_front();
                async move { next.unwrap_or(Err(ApiError::Network("exhausted".into()))) }
            }
        };

        let result = block_on(cache.get(key(), stale_policy(2), fetch));
        assert_eq!(result, Ok(9));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_error_without_prior_value_surfaces() {
        let cache = RequestCache::new();
        let result: Result<u32, ApiError> = block_on(cache.get(key(), stale_policy(1), || async {
            Err(ApiError::Network("down".into()))
        }));
        assert_eq!(result, Err(ApiError::Network("down".into())));
    }

    #[test]
    fn test_stale_while_error_keeps_previous_value() {
        let cache = RequestCache::new();

        block_on(cache.get(key(), stale_policy(1), || async { Ok(5u32) })).unwrap();
        let result: Result<u32, ApiError> = block_on(cache.refresh(key(), stale_policy(1), || async {
            Err(ApiError::Network("down".into()))
        }));

        assert_eq!(result, Ok(5), "failed refresh must serve the stale value");
        assert_eq!(cache.peek::<u32>(&key()), Some(5));
    }

    #[test]
    fn test_clear_during_flight_caches_nothing() {
        let mut pool = LocalPool::new();
        let spawner = pool.spawner();
        let cache = RequestCache::new();
        let (gate_tx, gate_rx) = oneshot::channel::<()>();
        let gate = Rc::new(RefCell::new(Some(gate_rx)));

        let fetch = {
            let gate = gate.clone();
            move || {
                let gate = gate.borrow_mut().take();
                async move {
                    if let Some(gate) = gate {
                        let _ = gate.await;
                    }
                    Ok(41u32)
                }
            }
        };

        let owner = spawner
            .spawn_local_with_handle({
                let cache = cache.clone();
                let fetch = fetch.clone();
                async move { cache.get(key(), fresh_policy(), fetch).await }
            })
            .unwrap();
        let waiter = spawner
            .spawn_local_with_handle({
                let cache = cache.clone();
                async move { cache.get(key(), fresh_policy(), fetch).await }
            })
            .unwrap();
        pool.run_until_stalled();

        // Logout happens while the request is still outstanding.
        cache.clear();
        gate_tx.send(()).unwrap();

        let (owner, waiter) = pool.run_until(async { futures::join!(owner, waiter) });
        // The owner gets its response, but the purged map stays purged.
        assert_eq!(owner, Ok(41));
        assert_eq!(waiter, Err(ApiError::Cancelled));
        assert!(cache.is_empty(), "completion after clear() must not repopulate");
    }

    #[test]
    fn test_invalidate_predicate_is_selective() {
        let cache = RequestCache::new();
        block_on(cache.get(CacheKey::books(1, 20), fresh_policy(), || async { Ok(1u32) })).unwrap();
        block_on(cache.get(CacheKey::favorites(), fresh_policy(), || async { Ok(2u32) })).unwrap();
        block_on(cache.get(CacheKey::favorites_count(), fresh_policy(), || async { Ok(3u32) }))
            .unwrap();

        cache.invalidate_user_scoped();

        assert_eq!(cache.peek::<u32>(&CacheKey::books(1, 20)), Some(1));
        assert_eq!(cache.peek::<u32>(&CacheKey::favorites()), None);
        assert_eq!(cache.peek::<u32>(&CacheKey::favorites_count()), None);
    }
}
