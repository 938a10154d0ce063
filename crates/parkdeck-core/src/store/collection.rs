// ── Generic reactive entity collection ──
//
// Lock-free concurrent storage with O(1) lookups and push-based
// change notification via `watch` channels.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

/// A lock-free, reactive collection for a single entity type, keyed by
/// the entity's numeric id.
///
/// Uses `DashMap` for O(1) concurrent lookups and `watch` channels for
/// push-based change notification. Every mutation bumps a version
/// counter and rebuilds the snapshot that subscribers receive.
pub(crate) struct EntityCollection<T: Send + Sync + 'static> {
    by_id: DashMap<i64, Arc<T>>,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,

    /// Full snapshot ordered by id, rebuilt on mutation.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            by_id: DashMap::new(),
            version,
            snapshot,
        }
    }

    /// Insert or update an entity. Returns `true` if the id was new.
    pub(crate) fn upsert(&self, id: i64, entity: T) -> bool {
        let is_new = self.by_id.insert(id, Arc::new(entity)).is_none();
        self.rebuild_snapshot();
        self.bump_version();
        is_new
    }

    /// Remove an entity by id. Returns the removed entity if it existed.
    pub(crate) fn remove(&self, id: i64) -> Option<Arc<T>> {
        let removed = self.by_id.remove(&id).map(|(_, v)| v);
        if removed.is_some() {
            self.rebuild_snapshot();
            self.bump_version();
        }
        removed
    }

    /// Replace the whole collection with `items`.
    ///
    /// Upsert-then-prune: incoming entities are inserted first, then
    /// ids absent from the incoming set are removed. This avoids the
    /// brief empty state a clear-then-insert approach would show to
    /// subscribers.
    pub(crate) fn replace_all(&self, items: Vec<(i64, T)>) {
        let incoming: std::collections::HashSet<i64> = items.iter().map(|(id, _)| *id).collect();
        for (id, entity) in items {
            self.by_id.insert(id, Arc::new(entity));
        }
        self.by_id.retain(|id, _| incoming.contains(id));
        self.rebuild_snapshot();
        self.bump_version();
    }

    pub(crate) fn get(&self, id: i64) -> Option<Arc<T>> {
        self.by_id.get(&id).map(|r| Arc::clone(r.value()))
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Collect all values, ordered by id for stable display, and
    /// broadcast to subscribers.
    fn rebuild_snapshot(&self) {
        let mut entries: Vec<(i64, Arc<T>)> = self
            .by_id
            .iter()
            .map(|r| (*r.key(), Arc::clone(r.value())))
            .collect();
        entries.sort_unstable_by_key(|(id, _)| *id);
        let values: Vec<Arc<T>> = entries.into_iter().map(|(_, v)| v).collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn upsert_returns_true_for_new_id() {
        let col: EntityCollection<String> = EntityCollection::new();
        assert!(col.upsert(1, "hello".into()));
        assert!(!col.upsert(1, "world".into()));
        assert_eq!(*col.get(1).unwrap(), "world");
    }

    #[test]
    fn remove_updates_snapshot() {
        let col: EntityCollection<String> = EntityCollection::new();
        col.upsert(1, "hello".into());
        let removed = col.remove(1);
        assert_eq!(*removed.unwrap(), "hello");
        assert!(col.get(1).is_none());
        assert!(col.snapshot().is_empty());
    }

    #[test]
    fn replace_all_prunes_stale_ids() {
        let col: EntityCollection<String> = EntityCollection::new();
        col.upsert(1, "a".into());
        col.upsert(2, "b".into());

        col.replace_all(vec![(2, "b2".into()), (3, "c".into())]);

        assert!(col.get(1).is_none());
        assert_eq!(*col.get(2).unwrap(), "b2");
        assert_eq!(*col.get(3).unwrap(), "c");
        assert_eq!(col.len(), 2);
    }

    #[test]
    fn snapshot_is_ordered_by_id() {
        let col: EntityCollection<String> = EntityCollection::new();
        col.upsert(5, "e".into());
        col.upsert(1, "a".into());
        col.upsert(3, "c".into());

        let snap = col.snapshot();
        let values: Vec<String> = snap.iter().map(|v| (**v).clone()).collect();
        assert_eq!(values, vec!["a", "c", "e"]);
    }

    #[test]
    fn subscribers_see_changes() {
        let col: EntityCollection<String> = EntityCollection::new();
        let rx = col.subscribe();
        assert!(rx.borrow().is_empty());

        col.upsert(1, "a".into());
        assert_eq!(rx.borrow().len(), 1);
    }
}
