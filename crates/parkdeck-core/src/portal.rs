// ── Portal facade ──
//
// The entry point consumers (CLI / TUI) talk to. Owns the API client,
// the reactive DataStore, the session identity, and the per-view fetch
// gates that keep a slow stale response from overwriting a fresh one.
//
// Fetches are discrete-event only: a refresh happens when a screen
// loads, a filter changes, or the user asks for one. There is no
// polling, no retry -- a failed fetch is reported and the user
// re-triggers it.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use parkdeck_api::endpoints::{FeeConfigCreate, FeeKind, ParkingLotCreate, SubscriptionPackageCreate};
use parkdeck_api::{ApiClient, PageRequest, Role, SessionTokens, TokenSource};
use secrecy::SecretString;

use crate::config::PortalConfig;
use crate::error::CoreError;
use crate::listing::{ListPage, ListQuery, select_page};
use crate::lookup::LookupMap;
use crate::model::{
    FeeConfig, LotStats, LotStatus, ParkingLot, PlatformStats, SubscriptionPackage,
    SubscriptionStatus, User, UserSubscription,
};
use crate::roster::{self, SubscriberRow};
use crate::store::DataStore;

/// Page size used when draining a paged endpoint completely.
const FETCH_PAGE_SIZE: u32 = 100;

// ── Fetch gate ───────────────────────────────────────────────────────

/// Monotonic request-generation token for one view.
///
/// Each refresh takes a new token; the response is applied only if its
/// token is still current at apply time. A fast second keystroke's
/// fetch therefore wins over a slow first one, no matter which response
/// arrives last.
struct FetchGate(AtomicU64);

impl FetchGate {
    fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, token: u64) -> bool {
        self.0.load(Ordering::SeqCst) == token
    }
}

struct Gates {
    lots: FetchGate,
    packages: FetchGate,
    subscriptions: FetchGate,
    roster: FetchGate,
    operational_fees: FetchGate,
    device_fees: FetchGate,
}

impl Gates {
    fn new() -> Self {
        Self {
            lots: FetchGate::new(),
            packages: FetchGate::new(),
            subscriptions: FetchGate::new(),
            roster: FetchGate::new(),
            operational_fees: FetchGate::new(),
            device_fees: FetchGate::new(),
        }
    }

    fn fees(&self, kind: FeeKind) -> &FetchGate {
        match kind {
            FeeKind::Operational => &self.operational_fees,
            FeeKind::Device => &self.device_fees,
        }
    }
}

// ── Session identity ─────────────────────────────────────────────────

/// Who this session is logged in as.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub email: String,
    pub role: Role,
    pub partner_id: Option<i64>,
    pub registration_id: Option<Uuid>,
    pub registration_status: Option<String>,
}

// ── Portal ───────────────────────────────────────────────────────────

/// The main entry point for consumers. Cheaply cloneable.
#[derive(Clone)]
pub struct Portal {
    inner: Arc<PortalInner>,
}

struct PortalInner {
    config: PortalConfig,
    api: ApiClient,
    store: DataStore,
    session: std::sync::RwLock<Option<ActiveSession>>,
    /// Session-lived user cache: grows, never refetches a resolved id.
    user_cache: tokio::sync::Mutex<LookupMap<Uuid, User>>,
    gates: Gates,
}

impl Portal {
    /// Create a portal with no session material.
    pub fn new(config: PortalConfig) -> Result<Self, CoreError> {
        Self::with_tokens(config, TokenSource::empty())
    }

    /// Create a portal over a pre-loaded token cell (restored session).
    pub fn with_tokens(config: PortalConfig, tokens: TokenSource) -> Result<Self, CoreError> {
        let api = ApiClient::new(config.url.as_str(), tokens, &config.transport())?;
        Ok(Self {
            inner: Arc::new(PortalInner {
                config,
                api,
                store: DataStore::new(),
                session: std::sync::RwLock::new(None),
                user_cache: tokio::sync::Mutex::new(LookupMap::new()),
                gates: Gates::new(),
            }),
        })
    }

    pub fn config(&self) -> &PortalConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &DataStore {
        &self.inner.store
    }

    /// The shared token cell (for persisting rotated tokens).
    pub fn tokens(&self) -> &TokenSource {
        self.inner.api.tokens()
    }

    // ── Session lifecycle ────────────────────────────────────────────

    /// Authenticate as the configured role. Tokens land in the shared
    /// token cell; identity is kept for scope checks.
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<ActiveSession, CoreError> {
        let role = self.inner.config.role;
        let resp = self.inner.api.login(role, email, password).await?;

        let session = ActiveSession {
            email: resp.email,
            role,
            partner_id: resp.partner_id,
            registration_id: resp.registration_id,
            registration_status: resp.registration_status,
        };
        *self.inner.session.write().expect("session lock poisoned") = Some(session.clone());

        info!(email = %session.email, role = ?role, "logged in");
        Ok(session)
    }

    /// Adopt an identity restored from the persisted session store.
    pub fn restore_session(&self, session: ActiveSession, tokens: SessionTokens) {
        self.inner.api.tokens().set(tokens);
        *self.inner.session.write().expect("session lock poisoned") = Some(session);
    }

    /// Rotate the token pair using the refresh token.
    pub async fn refresh_session(&self) -> Result<(), CoreError> {
        self.inner
            .api
            .refresh_session(self.inner.config.role)
            .await?;
        Ok(())
    }

    /// Drop local session material. The platform has no logout
    /// endpoint; tokens simply expire server-side.
    pub fn logout(&self) {
        self.inner.api.logout();
        *self.inner.session.write().expect("session lock poisoned") = None;
        debug!("logged out");
    }

    pub fn session(&self) -> Option<ActiveSession> {
        self.inner
            .session
            .read()
            .expect("session lock poisoned")
            .clone()
    }

    fn partner_id_for(&self, operation: &str) -> Result<i64, CoreError> {
        let guard = self.inner.session.read().expect("session lock poisoned");
        let session = guard.as_ref().ok_or(CoreError::NotLoggedIn)?;
        session.partner_id.ok_or_else(|| CoreError::WrongRole {
            operation: operation.to_owned(),
            required: "partner",
        })
    }

    // ── View refreshes (gated) ───────────────────────────────────────
    //
    // Each returns Ok(true) if the response was applied, Ok(false) if a
    // newer refresh superseded it while it was in flight.

    /// Refetch the lot collection: all lots for admins, owned lots for
    /// partners.
    pub async fn refresh_lots(&self) -> Result<bool, CoreError> {
        let token = self.inner.gates.lots.begin();
        let api = &self.inner.api;

        let raw = match self.inner.config.role {
            Role::Admin => {
                api.paginate_all(FETCH_PAGE_SIZE, |page, size| {
                    api.list_lots(PageRequest::new(page, size))
                })
                .await?
            }
            Role::Partner => {
                let partner_id = self.partner_id_for("refresh lots")?;
                api.paginate_all(FETCH_PAGE_SIZE, |page, size| {
                    api.list_lots_by_partner(partner_id, PageRequest::new(page, size))
                })
                .await?
            }
        };

        if !self.inner.gates.lots.is_current(token) {
            debug!("discarding stale lot refresh");
            return Ok(false);
        }
        self.inner
            .store
            .apply_lots(raw.into_iter().map(ParkingLot::from).collect());
        Ok(true)
    }

    /// Refetch the package collection (`ownedByMe` for partners).
    pub async fn refresh_packages(&self) -> Result<bool, CoreError> {
        let token = self.inner.gates.packages.begin();
        let api = &self.inner.api;
        let owned = self.inner.config.role == Role::Partner;

        let raw = api
            .paginate_all(FETCH_PAGE_SIZE, |page, size| {
                api.list_packages(owned, PageRequest::new(page, size))
            })
            .await?;

        if !self.inner.gates.packages.is_current(token) {
            debug!("discarding stale package refresh");
            return Ok(false);
        }
        self.inner
            .store
            .apply_packages(raw.into_iter().map(SubscriptionPackage::from).collect());
        Ok(true)
    }

    /// Refetch subscriptions for one (lot, package) pair.
    pub async fn refresh_subscriptions(
        &self,
        lot_id: i64,
        package_id: i64,
    ) -> Result<bool, CoreError> {
        let token = self.inner.gates.subscriptions.begin();
        let api = &self.inner.api;

        let raw = api
            .paginate_all(FETCH_PAGE_SIZE, |page, size| {
                api.list_user_subscriptions(lot_id, package_id, PageRequest::new(page, size))
            })
            .await?;

        if !self.inner.gates.subscriptions.is_current(token) {
            debug!("discarding stale subscription refresh");
            return Ok(false);
        }
        self.inner
            .store
            .apply_subscriptions(raw.into_iter().map(UserSubscription::from).collect());
        Ok(true)
    }

    /// Fetch a single user subscription.
    pub async fn get_subscription(
        &self,
        subscription_id: i64,
    ) -> Result<UserSubscription, CoreError> {
        Ok(self
            .inner
            .api
            .get_user_subscription(subscription_id)
            .await?
            .into())
    }

    /// Refetch one fee ledger.
    pub async fn refresh_fees(&self, kind: FeeKind) -> Result<bool, CoreError> {
        let token = self.inner.gates.fees(kind).begin();
        let api = &self.inner.api;

        let raw = api
            .paginate_all(FETCH_PAGE_SIZE, |page, size| {
                api.list_fee_configs(kind, PageRequest::new(page, size))
            })
            .await?;

        if !self.inner.gates.fees(kind).is_current(token) {
            debug!(?kind, "discarding stale fee refresh");
            return Ok(false);
        }
        self.inner
            .store
            .apply_fees(kind, raw.into_iter().map(FeeConfig::from).collect());
        Ok(true)
    }

    // ── Subscriber roster ────────────────────────────────────────────

    /// Rebuild the composite partner-subscribers view.
    ///
    /// Fetches the partner's lots and packages in parallel, fans out
    /// over the (lot, package) cross product for the subscriptions,
    /// resolves user ids through the session cache, and publishes fully
    /// joined rows. A failed pair or user lookup degrades the view
    /// instead of failing it.
    pub async fn refresh_roster(&self) -> Result<bool, CoreError> {
        let partner_id = self.partner_id_for("subscriber roster")?;
        let token = self.inner.gates.roster.begin();
        let api = &self.inner.api;

        let (lots_res, packages_res) = tokio::join!(
            api.paginate_all(FETCH_PAGE_SIZE, |page, size| {
                api.list_lots_by_partner(partner_id, PageRequest::new(page, size))
            }),
            api.paginate_all(FETCH_PAGE_SIZE, |page, size| {
                api.list_packages(true, PageRequest::new(page, size))
            }),
        );

        let lots: Vec<ParkingLot> = lots_res?.into_iter().map(ParkingLot::from).collect();
        let packages: Vec<SubscriptionPackage> = packages_res?
            .into_iter()
            .map(SubscriptionPackage::from)
            .collect();

        let lot_ids: Vec<i64> = lots.iter().map(|l| l.id).collect();
        let package_ids: Vec<i64> = packages.iter().map(|p| p.id).collect();
        info!(
            lots = lot_ids.len(),
            packages = package_ids.len(),
            "assembling subscriber roster"
        );

        let raw = roster::fetch_cross_product(&lot_ids, &package_ids, |lot_id, package_id| {
            async move {
                api.paginate_all(FETCH_PAGE_SIZE, |page, size| {
                    api.list_user_subscriptions(lot_id, package_id, PageRequest::new(page, size))
                })
                .await
            }
        })
        .await;
        let subscriptions: Vec<UserSubscription> =
            raw.into_iter().map(UserSubscription::from).collect();

        // Resolve user ids through the session cache; already-known ids
        // cost nothing.
        let mut cache = self.inner.user_cache.lock().await;
        cache
            .resolve(subscriptions.iter().map(|s| s.user_id), |id| async move {
                api.get_user(id).await.map(User::from)
            })
            .await;

        let lot_map: HashMap<i64, ParkingLot> =
            lots.iter().map(|l| (l.id, l.clone())).collect();
        let package_map: HashMap<i64, SubscriptionPackage> =
            packages.iter().map(|p| (p.id, p.clone())).collect();
        let rows = roster::build_rows(subscriptions.clone(), &lot_map, &package_map, &cache);
        drop(cache);

        if !self.inner.gates.roster.is_current(token) {
            debug!("discarding stale roster");
            return Ok(false);
        }

        self.inner.store.apply_lots(lots);
        self.inner.store.apply_packages(packages);
        self.inner.store.apply_subscriptions(subscriptions);
        self.inner.store.apply_roster(rows);
        Ok(true)
    }

    /// Window the current roster snapshot: categorical status filter,
    /// free-text search over display fields, pagination.
    pub fn roster_page(
        &self,
        query: &ListQuery,
        status: Option<SubscriptionStatus>,
    ) -> ListPage<SubscriberRow> {
        let rows = self.inner.store.roster_snapshot();
        select_page(
            &rows,
            query,
            |row| status.is_none_or(|s| row.subscription.status == s),
            SubscriberRow::search_haystack,
            None,
        )
    }

    // ── Lot mutations ────────────────────────────────────────────────
    //
    // Local state is a cache: every mutation goes to the server first
    // and the caller refetches the affected view on success.

    pub async fn create_lot(&self, body: &ParkingLotCreate) -> Result<ParkingLot, CoreError> {
        Ok(self.inner.api.create_lot(body).await?.into())
    }

    pub async fn update_lot(
        &self,
        lot_id: i64,
        body: &ParkingLotCreate,
    ) -> Result<ParkingLot, CoreError> {
        Ok(self.inner.api.update_lot(lot_id, body).await?.into())
    }

    pub async fn delete_lot(&self, lot_id: i64) -> Result<(), CoreError> {
        self.inner.api.delete_lot(lot_id).await?;
        self.inner.store.remove_lot(lot_id);
        Ok(())
    }

    pub async fn get_lot(&self, lot_id: i64) -> Result<ParkingLot, CoreError> {
        Ok(self.inner.api.get_lot(lot_id).await?.into())
    }

    pub async fn set_lot_status(
        &self,
        lot_id: i64,
        status: LotStatus,
    ) -> Result<ParkingLot, CoreError> {
        Ok(self
            .inner
            .api
            .set_lot_status(lot_id, &status.to_string())
            .await?
            .into())
    }

    /// Download the lot catalog as an opaque spreadsheet blob.
    pub async fn export_lots(&self) -> Result<Vec<u8>, CoreError> {
        Ok(self.inner.api.export_lots().await?)
    }

    /// Upload an opaque spreadsheet blob of lots. Returns
    /// `(imported, failed)` row counts.
    pub async fn import_lots(&self, payload: Vec<u8>) -> Result<(u32, u32), CoreError> {
        let report = self.inner.api.import_lots(payload).await?;
        Ok((report.imported, report.failed))
    }

    // ── Package mutations ────────────────────────────────────────────

    pub async fn create_package(
        &self,
        body: &SubscriptionPackageCreate,
    ) -> Result<SubscriptionPackage, CoreError> {
        Ok(self.inner.api.create_package(body).await?.into())
    }

    pub async fn update_package(
        &self,
        package_id: i64,
        body: &SubscriptionPackageCreate,
    ) -> Result<SubscriptionPackage, CoreError> {
        Ok(self
            .inner
            .api
            .update_package(package_id, body)
            .await?
            .into())
    }

    pub async fn delete_package(&self, package_id: i64) -> Result<(), CoreError> {
        self.inner.api.delete_package(package_id).await?;
        self.inner.store.remove_package(package_id);
        Ok(())
    }

    pub async fn get_package(&self, package_id: i64) -> Result<SubscriptionPackage, CoreError> {
        Ok(self.inner.api.get_package(package_id).await?.into())
    }

    // ── Fee mutations ────────────────────────────────────────────────

    /// Create a fee config and optimistically inject it into the local
    /// ledger so the view shows it before the next refetch confirms it.
    pub async fn create_fee_config(
        &self,
        kind: FeeKind,
        body: &FeeConfigCreate,
    ) -> Result<FeeConfig, CoreError> {
        let fee: FeeConfig = self.inner.api.create_fee_config(kind, body).await?.into();
        self.inner.store.upsert_fee(kind, fee.clone());
        Ok(fee)
    }

    pub async fn update_fee_config(
        &self,
        kind: FeeKind,
        config_id: i64,
        body: &FeeConfigCreate,
    ) -> Result<FeeConfig, CoreError> {
        let fee: FeeConfig = self
            .inner
            .api
            .update_fee_config(kind, config_id, body)
            .await?
            .into();
        self.inner.store.upsert_fee(kind, fee.clone());
        Ok(fee)
    }

    pub async fn delete_fee_config(&self, kind: FeeKind, config_id: i64) -> Result<(), CoreError> {
        self.inner.api.delete_fee_config(kind, config_id).await?;
        Ok(())
    }

    // ── Users ────────────────────────────────────────────────────────

    /// Fetch a user through the session cache: at most one network call
    /// per distinct id per session.
    pub async fn user(&self, id: Uuid) -> Result<User, CoreError> {
        let api = &self.inner.api;
        let mut cache = self.inner.user_cache.lock().await;
        if let Some(user) = cache.get(&id) {
            return Ok(user.clone());
        }
        cache
            .resolve([id], |uid| async move { api.get_user(uid).await.map(User::from) })
            .await;
        cache.get(&id).cloned().ok_or_else(|| CoreError::NotFound {
            entity_type: "user".into(),
            identifier: id.to_string(),
        })
    }

    /// Paginated user listing (admin view). Not cached -- the cache is
    /// for id dereferencing, not browsing.
    pub async fn list_users(&self, page: PageRequest) -> Result<Vec<User>, CoreError> {
        let result = self.inner.api.list_users(page).await?;
        Ok(result.content.into_iter().map(User::from).collect())
    }

    // ── Statistics ───────────────────────────────────────────────────

    pub async fn platform_stats(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<PlatformStats, CoreError> {
        Ok(self.inner.api.get_platform_stats(from, to).await?.into())
    }

    pub async fn lot_stats(
        &self,
        lot_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<LotStats, CoreError> {
        Ok(self.inner.api.get_lot_stats(lot_id, from, to).await?.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_token_is_rejected_after_a_newer_begin() {
        let gate = FetchGate::new();
        let first = gate.begin();
        let second = gate.begin();
        assert!(!gate.is_current(first));
        assert!(gate.is_current(second));
    }
}
