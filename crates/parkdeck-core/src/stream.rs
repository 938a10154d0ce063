// ── Reactive subscription handle ──

use std::sync::Arc;

use tokio::sync::watch;

/// Subscription handle vended by the [`DataStore`](crate::DataStore).
///
/// Wraps a `watch::Receiver` over the collection snapshot. The TUI
/// holds one per screen and re-renders when [`changed`](Self::changed)
/// resolves.
pub struct EntityStream<T> {
    rx: watch::Receiver<Arc<Vec<Arc<T>>>>,
}

impl<T> EntityStream<T> {
    pub(crate) fn new(rx: watch::Receiver<Arc<Vec<Arc<T>>>>) -> Self {
        Self { rx }
    }

    /// The snapshot as of the last observation (cheap `Arc` clone).
    pub fn current(&self) -> Arc<Vec<Arc<T>>> {
        self.rx.borrow().clone()
    }

    /// The freshest snapshot, marking it observed.
    pub fn latest(&mut self) -> Arc<Vec<Arc<T>>> {
        self.rx.borrow_and_update().clone()
    }

    /// Wait until the snapshot changes. Returns `false` if the store
    /// was dropped.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stream_observes_snapshot_changes() {
        let (tx, rx) = watch::channel(Arc::new(Vec::new()));
        let mut stream: EntityStream<i64> = EntityStream::new(rx);
        assert!(stream.current().is_empty());

        tx.send(Arc::new(vec![Arc::new(1), Arc::new(2)]))
            .expect("receiver alive");
        assert!(stream.changed().await);
        assert_eq!(stream.latest().len(), 2);

        drop(tx);
        assert!(!stream.changed().await);
    }
}
