// ── Lookup-map builder ──
//
// Resolves foreign keys to display entities with at most one network
// call per distinct id, ever. Pages of the partner-users and admin
// views dereference these maps at render time instead of showing raw
// ids.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;

use futures_util::future::join_all;
use tracing::warn;

use parkdeck_api::Error as ApiError;

/// An id → entity map that only ever grows.
///
/// [`resolve`](Self::resolve) merges newly fetched entries into the
/// existing map, so ids resolved by an earlier call are never fetched
/// again within the map's lifetime (typically a session).
#[derive(Debug, Default)]
pub struct LookupMap<K, V> {
    entries: HashMap<K, V>,
}

impl<K, V> LookupMap<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, id: &K) -> Option<&V> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &K) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve every distinct id in `ids` that is not already present.
    ///
    /// Fetches run concurrently. A failing fetch is logged and its id
    /// omitted from the map -- one bad reference never takes down the
    /// whole batch. Returns the number of newly inserted entries.
    pub async fn resolve<F, Fut>(&mut self, ids: impl IntoIterator<Item = K>, fetch: F) -> usize
    where
        F: Fn(K) -> Fut,
        Fut: Future<Output = Result<V, ApiError>>,
    {
        // Distinct ids not yet resolved, preserving first-seen order.
        let mut missing: Vec<K> = Vec::new();
        for id in ids {
            if !self.entries.contains_key(&id) && !missing.contains(&id) {
                missing.push(id);
            }
        }

        if missing.is_empty() {
            return 0;
        }

        let fetches = missing.into_iter().map(|id| {
            let fut = fetch(id.clone());
            async move { (id, fut.await) }
        });

        let mut inserted = 0;
        for (id, result) in join_all(fetches).await {
            match result {
                Ok(entity) => {
                    self.entries.insert(id, entity);
                    inserted += 1;
                }
                Err(e) => {
                    warn!(id = ?id, error = %e, "lookup fetch failed; omitting entry");
                }
            }
        }
        inserted
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn fetch_ok(id: i64) -> Result<String, ApiError> {
        Ok(format!("entity-{id}"))
    }

    #[tokio::test]
    async fn empty_input_makes_no_calls() {
        let calls = AtomicUsize::new(0);
        let mut map: LookupMap<i64, String> = LookupMap::new();
        let inserted = map
            .resolve(std::iter::empty(), |id| {
                calls.fetch_add(1, Ordering::SeqCst);
                fetch_ok(id)
            })
            .await;
        assert_eq!(inserted, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(map.is_empty());
    }

    #[tokio::test]
    async fn duplicate_ids_fetch_once() {
        let calls = AtomicUsize::new(0);
        let mut map: LookupMap<i64, String> = LookupMap::new();
        let inserted = map
            .resolve([7, 7, 3, 7, 3], |id| {
                calls.fetch_add(1, Ordering::SeqCst);
                fetch_ok(id)
            })
            .await;
        assert_eq!(inserted, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(map.get(&7).unwrap(), "entity-7");
    }

    #[tokio::test]
    async fn previously_resolved_ids_are_not_refetched() {
        let calls = AtomicUsize::new(0);
        let mut map: LookupMap<i64, String> = LookupMap::new();
        map.resolve([1, 2], |id| {
            calls.fetch_add(1, Ordering::SeqCst);
            fetch_ok(id)
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // Second call overlaps the first -- only the new id is fetched.
        map.resolve([2, 3], |id| {
            calls.fetch_add(1, Ordering::SeqCst);
            fetch_ok(id)
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(map.len(), 3);
    }

    #[tokio::test]
    async fn failed_fetch_is_omitted_not_fatal() {
        let mut map: LookupMap<i64, String> = LookupMap::new();
        let inserted = map
            .resolve([1, 2, 3], |id| async move {
                if id == 2 {
                    Err(ApiError::Api {
                        status: 500,
                        message: "boom".into(),
                        code: None,
                    })
                } else {
                    Ok(format!("entity-{id}"))
                }
            })
            .await;

        // Key set == distinct ids minus the failed one.
        assert_eq!(inserted, 2);
        assert!(map.contains(&1));
        assert!(!map.contains(&2));
        assert!(map.contains(&3));
    }
}
