//! End-to-end subscriber-roster test against a mock gateway.
//!
//! Scenario: a partner owns 2 lots and 1 package, with 3 subscriptions
//! spread across both lots. The roster must fan out over both
//! (lot, package) pairs, resolve each distinct user exactly once, and
//! display resolved names/emails instead of raw ids.
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use parkdeck_core::{ListQuery, Portal, PortalConfig, Role, TlsVerification};

const USER_ALICE: &str = "11111111-1111-1111-1111-111111111111";
const USER_BOB: &str = "22222222-2222-2222-2222-222222222222";

fn paged(content: serde_json::Value) -> serde_json::Value {
    let len = content.as_array().map_or(0, Vec::len);
    json!({
        "success": true,
        "data": { "content": content, "totalPages": 1, "totalElements": len }
    })
}

fn subscription(id: i64, user: &str, lot: i64, package: i64) -> serde_json::Value {
    json!({
        "id": id,
        "userId": user,
        "subscriptionPackageId": package,
        "parkingLotId": lot,
        "licensePlate": format!("51A-{id:03}"),
        "status": "ACTIVE"
    })
}

async fn mock_gateway() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/user-service/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "accessToken": "acc",
                "refreshToken": "ref",
                "email": "partner@example.com",
                "role": "PARTNER",
                "partnerId": 42
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/parking-service/parking-lots/by-partner/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paged(json!([
            {"id": 1, "name": "North Garage", "status": "ACTIVE"},
            {"id": 2, "name": "South Garage", "status": "ACTIVE"}
        ]))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/parking-service/subscriptions"))
        .and(query_param("ownedByMe", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paged(json!([{
            "id": 10,
            "name": "Monthly Car",
            "price": 120.0,
            "vehicleType": "CAR",
            "durationType": "MONTHLY",
            "parkingLotId": 1,
            "isActive": true
        }]))))
        .mount(&server)
        .await;

    // Pair (lot 1, package 10): two subscribers.
    Mock::given(method("GET"))
        .and(path("/v1/user-service/user-subscriptions"))
        .and(query_param("parkingLotId", "1"))
        .and(query_param("subscriptionPackageId", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paged(json!([
            subscription(100, USER_ALICE, 1, 10),
            subscription(101, USER_BOB, 1, 10)
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    // Pair (lot 2, package 10): one subscriber (Alice again).
    Mock::given(method("GET"))
        .and(path("/v1/user-service/user-subscriptions"))
        .and(query_param("parkingLotId", "2"))
        .and(query_param("subscriptionPackageId", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paged(json!([
            subscription(102, USER_ALICE, 2, 10)
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    // Each distinct user resolves exactly once, Alice's second
    // appearance comes from the cache.
    Mock::given(method("GET"))
        .and(path(format!("/v1/user-service/users/{USER_ALICE}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "id": USER_ALICE,
                "fullName": "Alice Nguyen",
                "phone": "0901000001",
                "account": {"email": "alice@example.com"}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/user-service/users/{USER_BOB}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "id": USER_BOB,
                "fullName": "Bob Tran",
                "account": {"email": "bob@example.com"}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    server
}

async fn partner_portal(server: &MockServer) -> Portal {
    let portal = Portal::new(PortalConfig {
        url: server.uri().parse().unwrap(),
        role: Role::Partner,
        tls: TlsVerification::SystemDefaults,
        timeout: Duration::from_secs(5),
    })
    .unwrap();

    let password = SecretString::from("pw".to_owned());
    portal.login("partner@example.com", &password).await.unwrap();
    portal
}

#[tokio::test]
async fn roster_shows_all_rows_with_resolved_users() {
    let server = mock_gateway().await;
    let portal = partner_portal(&server).await;

    let applied = portal.refresh_roster().await.unwrap();
    assert!(applied);

    // No filters: all 3 subscriptions across both lots, paged by 2.
    let query = ListQuery {
        search: None,
        page: 0,
        page_size: 2,
    };
    let first = portal.roster_page(&query, None);
    assert_eq!(first.total_elements, 3);
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.items.len(), 2);

    let second = portal.roster_page(
        &ListQuery {
            page: 1,
            ..query.clone()
        },
        None,
    );
    assert_eq!(second.items.len(), 1);

    // Rows display resolved names/emails, not raw ids.
    let all: Vec<_> = first.items.iter().chain(second.items.iter()).collect();
    let alice_rows: Vec<_> = all
        .iter()
        .filter(|row| row.user_name.as_deref() == Some("Alice Nguyen"))
        .collect();
    assert_eq!(alice_rows.len(), 2);
    assert!(
        alice_rows
            .iter()
            .all(|row| row.user_email.as_deref() == Some("alice@example.com"))
    );
    assert!(
        all.iter()
            .any(|row| row.user_name.as_deref() == Some("Bob Tran"))
    );

    // Lot/package names come from the catalog lookup maps.
    assert!(all.iter().any(|row| row.lot_name == "North Garage"));
    assert!(all.iter().any(|row| row.lot_name == "South Garage"));
    assert!(all.iter().all(|row| row.package_name == "Monthly Car"));

    // The .expect(1) mocks verify on drop: 2 pair fetches, 2 user
    // fetches, no duplicates.
}

#[tokio::test]
async fn roster_search_matches_resolved_fields() {
    let server = mock_gateway().await;
    let portal = partner_portal(&server).await;
    portal.refresh_roster().await.unwrap();

    // Search by resolved email -- a field that only exists after the
    // lookup join.
    let page = portal.roster_page(
        &ListQuery {
            search: Some("bob@example".into()),
            page: 0,
            page_size: 10,
        },
        None,
    );
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.items[0].subscription.id, 101);

    // Search by lot name.
    let page = portal.roster_page(
        &ListQuery {
            search: Some("south".into()),
            page: 0,
            page_size: 10,
        },
        None,
    );
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.items[0].subscription.id, 102);
}
