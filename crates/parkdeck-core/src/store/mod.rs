// ── Central reactive data store ──
//
// Thread-safe storage for all fetched platform entities. Local state is
// a cache of the backend, never authority: collections are replaced
// wholesale on refetch, with one optimistic exception for fee configs.

mod collection;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use parkdeck_api::endpoints::FeeKind;

use crate::model::{FeeConfig, ParkingLot, SubscriptionPackage, UserSubscription};
use crate::roster::SubscriberRow;
use crate::stream::EntityStream;
use collection::EntityCollection;

/// Central reactive store for all platform entities the session has
/// fetched. Mutations are broadcast to subscribers via `watch` channels.
pub struct DataStore {
    lots: EntityCollection<ParkingLot>,
    packages: EntityCollection<SubscriptionPackage>,
    subscriptions: EntityCollection<UserSubscription>,
    operational_fees: EntityCollection<FeeConfig>,
    device_fees: EntityCollection<FeeConfig>,
    /// The assembled partner-subscribers view, replaced as one unit so
    /// a half-joined roster is never observable.
    roster: watch::Sender<Arc<Vec<SubscriberRow>>>,
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl DataStore {
    pub fn new() -> Self {
        let (roster, _) = watch::channel(Arc::new(Vec::new()));
        let (last_refresh, _) = watch::channel(None);

        Self {
            lots: EntityCollection::new(),
            packages: EntityCollection::new(),
            subscriptions: EntityCollection::new(),
            operational_fees: EntityCollection::new(),
            device_fees: EntityCollection::new(),
            roster,
            last_refresh,
        }
    }

    fn fees(&self, kind: FeeKind) -> &EntityCollection<FeeConfig> {
        match kind {
            FeeKind::Operational => &self.operational_fees,
            FeeKind::Device => &self.device_fees,
        }
    }

    // ── Refresh application ──────────────────────────────────────────

    pub(crate) fn apply_lots(&self, lots: Vec<ParkingLot>) {
        self.lots
            .replace_all(lots.into_iter().map(|l| (l.id, l)).collect());
        self.touch();
    }

    pub(crate) fn apply_packages(&self, packages: Vec<SubscriptionPackage>) {
        self.packages
            .replace_all(packages.into_iter().map(|p| (p.id, p)).collect());
        self.touch();
    }

    pub(crate) fn apply_subscriptions(&self, subs: Vec<UserSubscription>) {
        self.subscriptions
            .replace_all(subs.into_iter().map(|s| (s.id, s)).collect());
        self.touch();
    }

    pub(crate) fn apply_fees(&self, kind: FeeKind, fees: Vec<FeeConfig>) {
        self.fees(kind)
            .replace_all(fees.into_iter().map(|f| (f.id, f)).collect());
        self.touch();
    }

    pub(crate) fn apply_roster(&self, rows: Vec<SubscriberRow>) {
        self.roster.send_modify(|r| *r = Arc::new(rows));
        self.touch();
    }

    /// Optimistically inject a just-created fee config before the next
    /// refetch confirms it.
    pub(crate) fn upsert_fee(&self, kind: FeeKind, fee: FeeConfig) {
        self.fees(kind).upsert(fee.id, fee);
        self.touch();
    }

    pub(crate) fn remove_lot(&self, id: i64) {
        self.lots.remove(id);
        self.touch();
    }

    pub(crate) fn remove_package(&self, id: i64) {
        self.packages.remove(id);
        self.touch();
    }

    fn touch(&self) {
        let _ = self.last_refresh.send(Some(Utc::now()));
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn lots_snapshot(&self) -> Arc<Vec<Arc<ParkingLot>>> {
        self.lots.snapshot()
    }

    pub fn packages_snapshot(&self) -> Arc<Vec<Arc<SubscriptionPackage>>> {
        self.packages.snapshot()
    }

    pub fn subscriptions_snapshot(&self) -> Arc<Vec<Arc<UserSubscription>>> {
        self.subscriptions.snapshot()
    }

    pub fn fees_snapshot(&self, kind: FeeKind) -> Arc<Vec<Arc<FeeConfig>>> {
        self.fees(kind).snapshot()
    }

    pub fn roster_snapshot(&self) -> Arc<Vec<SubscriberRow>> {
        self.roster.borrow().clone()
    }

    // ── Single-entity lookups ────────────────────────────────────────

    pub fn lot_by_id(&self, id: i64) -> Option<Arc<ParkingLot>> {
        self.lots.get(id)
    }

    pub fn package_by_id(&self, id: i64) -> Option<Arc<SubscriptionPackage>> {
        self.packages.get(id)
    }

    // ── Count accessors ──────────────────────────────────────────────

    pub fn lot_count(&self) -> usize {
        self.lots.len()
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_lots(&self) -> EntityStream<ParkingLot> {
        EntityStream::new(self.lots.subscribe())
    }

    pub fn subscribe_packages(&self) -> EntityStream<SubscriptionPackage> {
        EntityStream::new(self.packages.subscribe())
    }

    pub fn subscribe_fees(&self, kind: FeeKind) -> EntityStream<FeeConfig> {
        EntityStream::new(self.fees(kind).subscribe())
    }

    pub fn subscribe_roster(&self) -> watch::Receiver<Arc<Vec<SubscriberRow>>> {
        self.roster.subscribe()
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    /// How long ago any data last changed, or `None` if never fetched.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_refresh().map(|t| Utc::now() - t)
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LotStatus, ParkingLot};

    fn lot(id: i64, name: &str) -> ParkingLot {
        ParkingLot {
            id,
            name: name.into(),
            address_line: None,
            district: None,
            city: None,
            latitude: None,
            longitude: None,
            status: LotStatus::Active,
            partner_id: Some(1),
            capacities: Vec::new(),
            pricing_rules: Vec::new(),
        }
    }

    #[test]
    fn refetch_replaces_the_collection_wholesale() {
        let store = DataStore::new();
        store.apply_lots(vec![lot(1, "North"), lot(2, "South")]);
        assert_eq!(store.lot_count(), 2);

        // A lot deleted server-side disappears on the next refetch.
        store.apply_lots(vec![lot(2, "South")]);
        assert_eq!(store.lot_count(), 1);
        assert!(store.lot_by_id(1).is_none());
        assert!(store.last_refresh().is_some());
    }

    #[tokio::test]
    async fn lot_stream_sees_refresh() {
        let store = DataStore::new();
        let mut stream = store.subscribe_lots();
        assert!(stream.current().is_empty());

        store.apply_lots(vec![lot(7, "Central")]);
        assert!(stream.changed().await);
        assert_eq!(stream.latest().len(), 1);
    }

    #[test]
    fn optimistic_fee_upsert_is_visible_immediately() {
        let store = DataStore::new();
        let fee = FeeConfig {
            id: 9,
            rate: 0.05,
            valid_from: "2025-01-01".parse().expect("valid date"),
            valid_until: None,
            is_active: true,
        };
        store.upsert_fee(FeeKind::Operational, fee);
        assert_eq!(store.fees_snapshot(FeeKind::Operational).len(), 1);
        // The other ledger is untouched.
        assert!(store.fees_snapshot(FeeKind::Device).is_empty());
    }
}
