// ── Subscriber roster assembly ──
//
// The user-subscription endpoint only accepts one (lot, package) pair
// per call, so the composite partner view has to fan out over the full
// Cartesian product of the partner's lots and packages. That workaround
// lives behind `fetch_cross_product` and nowhere else: request count is
// O(lots × packages), which holds up for a single partner's catalog but
// is the first thing to swap out if the backend ever grows a
// multi-value filter.

use std::collections::HashMap;
use std::future::Future;

use futures_util::future::join_all;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use parkdeck_api::Error as ApiError;

use crate::lookup::LookupMap;
use crate::model::{ParkingLot, SubscriptionPackage, User, UserSubscription};

/// Fetch one result set per (lot, package) pair, concurrently, and
/// flatten the union.
///
/// Every pair is queried exactly once. A failing pair contributes an
/// empty result (logged) instead of aborting the whole view -- the
/// partner sees fewer rows, not an error page.
pub async fn fetch_cross_product<T, F, Fut>(
    lot_ids: &[i64],
    package_ids: &[i64],
    fetch: F,
) -> Vec<T>
where
    F: Fn(i64, i64) -> Fut,
    Fut: Future<Output = Result<Vec<T>, ApiError>>,
{
    let fetches = lot_ids.iter().flat_map(|&lot_id| {
        package_ids.iter().map(move |&package_id| (lot_id, package_id))
    });

    let fetches = fetches.map(|(lot_id, package_id)| {
        let fut = fetch(lot_id, package_id);
        async move { ((lot_id, package_id), fut.await) }
    });

    let mut all = Vec::new();
    for ((lot_id, package_id), result) in join_all(fetches).await {
        match result {
            Ok(items) => all.extend(items),
            Err(e) => {
                warn!(
                    lot_id,
                    package_id,
                    error = %e,
                    "pair fetch failed; substituting empty result"
                );
            }
        }
    }
    all
}

/// One row of the partner-subscribers view, with every foreign key
/// already dereferenced for display.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriberRow {
    pub subscription: UserSubscription,
    /// Resolved via the user lookup cache; `None` when the fetch failed.
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub user_phone: Option<String>,
    pub lot_name: String,
    pub package_name: String,
}

impl SubscriberRow {
    /// Label shown in the user column: resolved name, else the raw id.
    pub fn user_label(&self) -> String {
        self.user_name
            .clone()
            .or_else(|| self.user_email.clone())
            .unwrap_or_else(|| self.subscription.user_id.to_string())
    }

    /// The fixed display fields free-text search matches against.
    pub fn search_haystack(&self) -> Vec<String> {
        let mut fields = Vec::with_capacity(6);
        if let Some(ref name) = self.user_name {
            fields.push(name.clone());
        }
        if let Some(ref email) = self.user_email {
            fields.push(email.clone());
        }
        if let Some(ref phone) = self.user_phone {
            fields.push(phone.clone());
        }
        if let Some(ref plate) = self.subscription.license_plate {
            fields.push(plate.clone());
        }
        fields.push(self.lot_name.clone());
        fields.push(self.package_name.clone());
        fields
    }
}

/// Join raw subscriptions against the lot/package/user lookup maps.
///
/// Lots and packages come from the already-fetched partner catalogs;
/// users come from the session user cache. Missing lookups degrade to
/// the raw id, they never drop the row.
pub fn build_rows(
    subscriptions: Vec<UserSubscription>,
    lots: &HashMap<i64, ParkingLot>,
    packages: &HashMap<i64, SubscriptionPackage>,
    users: &LookupMap<Uuid, User>,
) -> Vec<SubscriberRow> {
    subscriptions
        .into_iter()
        .map(|sub| {
            let user = users.get(&sub.user_id);
            let lot_name = lots
                .get(&sub.lot_id)
                .map_or_else(|| format!("lot #{}", sub.lot_id), |l| l.name.clone());
            let package_name = packages
                .get(&sub.package_id)
                .map_or_else(|| format!("package #{}", sub.package_id), |p| p.name.clone());
            SubscriberRow {
                user_name: user.and_then(|u| u.full_name.clone()),
                user_email: user.and_then(|u| u.email.clone()),
                user_phone: user.and_then(|u| u.phone.clone()),
                lot_name,
                package_name,
                subscription: sub,
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn issues_exactly_m_times_n_requests() {
        let calls = AtomicUsize::new(0);
        let pairs = Mutex::new(Vec::new());

        let out = fetch_cross_product(&[1, 2], &[10], |lot, pkg| {
            calls.fetch_add(1, Ordering::SeqCst);
            pairs.lock().unwrap().push((lot, pkg));
            async move { Ok(vec![(lot, pkg)]) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(out.len(), 2);
        let mut seen = pairs.into_inner().unwrap();
        seen.sort_unstable();
        assert_eq!(seen, vec![(1, 10), (2, 10)]);
    }

    #[tokio::test]
    async fn output_is_union_of_successful_pairs() {
        let out = fetch_cross_product(&[1, 2], &[10, 20], |lot, pkg| async move {
            if (lot, pkg) == (2, 20) {
                Err(ApiError::Api {
                    status: 500,
                    message: "pair exploded".into(),
                    code: None,
                })
            } else {
                Ok(vec![format!("{lot}:{pkg}")])
            }
        })
        .await;

        // 4 pairs, 1 failed -- 3 rows survive, view does not abort.
        assert_eq!(out.len(), 3);
        assert!(!out.contains(&"2:20".to_owned()));
    }

    #[tokio::test]
    async fn empty_id_list_short_circuits() {
        let calls = AtomicUsize::new(0);
        let out: Vec<i64> = fetch_cross_product(&[], &[10, 20], |_, _| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(Vec::new()) }
        })
        .await;
        assert!(out.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
