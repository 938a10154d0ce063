#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use parkdeck_api::{ApiClient, Error, PageRequest, Role, TokenSource};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::from_reqwest(
        &server.uri(),
        reqwest::Client::new(),
        TokenSource::empty(),
    )
    .unwrap();
    (server, client)
}

fn paged(content: serde_json::Value, total_pages: u32, total_elements: u64) -> serde_json::Value {
    json!({
        "success": true,
        "data": {
            "content": content,
            "totalPages": total_pages,
            "totalElements": total_elements,
        }
    })
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn partner_login_stores_tokens() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/user-service/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "accessToken": "acc-123",
                "refreshToken": "ref-456",
                "email": "partner@example.com",
                "role": "PARTNER",
                "partnerId": 42
            }
        })))
        .mount(&server)
        .await;

    let secret = SecretString::from("hunter2".to_owned());
    let resp = client
        .login(Role::Partner, "partner@example.com", &secret)
        .await
        .unwrap();

    assert_eq!(resp.partner_id, Some(42));
    assert!(client.tokens().is_authenticated());
}

#[tokio::test]
async fn admin_login_uses_admin_gateway_path() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "accessToken": "a",
                "refreshToken": "r",
                "email": "admin@example.com",
                "role": "ADMIN"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let secret = SecretString::from("pw".to_owned());
    client
        .login(Role::Admin, "admin@example.com", &secret)
        .await
        .unwrap();
}

#[tokio::test]
async fn rejected_login_is_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/user-service/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "bad credentials"})),
        )
        .mount(&server)
        .await;

    let secret = SecretString::from("wrong".to_owned());
    let result = client.login(Role::Partner, "x@example.com", &secret).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert!(!client.tokens().is_authenticated());
}

#[tokio::test]
async fn bearer_token_attached_after_login() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/user-service/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"accessToken": "tok-abc", "refreshToken": "r", "email": "p@x.com"}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/parking-service/parking-lots/7"))
        .and(header("authorization", "Bearer tok-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"id": 7, "name": "Central Garage", "status": "ACTIVE"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let secret = SecretString::from("pw".to_owned());
    client.login(Role::Partner, "p@x.com", &secret).await.unwrap();

    let lot = client.get_lot(7).await.unwrap();
    assert_eq!(lot.name, "Central Garage");
}

// ── Envelope handling ───────────────────────────────────────────────

#[tokio::test]
async fn expired_token_maps_to_session_expired() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/parking-service/parking-lots/1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.get_lot(1).await;
    assert!(matches!(result, Err(Error::SessionExpired)));
}

#[tokio::test]
async fn success_false_surfaces_server_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/parking-service/subscriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "package name already exists"
        })))
        .mount(&server)
        .await;

    let body = parkdeck_api::endpoints::SubscriptionPackageCreate {
        name: "Monthly".into(),
        price: 120.0,
        vehicle_type: "CAR".into(),
        duration_type: "MONTHLY".into(),
        parking_lot_id: 1,
        is_active: true,
    };
    let err = client.create_package(&body).await.unwrap_err();
    assert_eq!(err.server_message(), Some("package name already exists"));
}

#[tokio::test]
async fn bare_array_listing_is_normalized_to_one_page() {
    let (server, client) = setup().await;

    // Older endpoint shape: bare array, no envelope.
    Mock::given(method("GET"))
        .and(path("/api/v1/parking-service/parking-lots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "North Lot", "status": "ACTIVE"},
            {"id": 2, "name": "South Lot", "status": "INACTIVE"}
        ])))
        .mount(&server)
        .await;

    let page = client.list_lots(PageRequest::default()).await.unwrap();
    assert_eq!(page.content.len(), 2);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.total_elements, 2);
}

// ── User subscriptions ──────────────────────────────────────────────

#[tokio::test]
async fn user_subscription_listing_sends_both_mandatory_ids() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/user-service/user-subscriptions"))
        .and(query_param("parkingLotId", "3"))
        .and(query_param("subscriptionPackageId", "11"))
        .and(query_param("sortOrder", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paged(
            json!([{
                "id": 900,
                "userId": "7f8a8a36-5c3a-4a0e-9a3a-111111111111",
                "subscriptionPackageId": 11,
                "parkingLotId": 3,
                "status": "ACTIVE"
            }]),
            1,
            1,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let page = client
        .list_user_subscriptions(3, 11, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].parking_lot_id, 3);
}

// ── Pagination helper ───────────────────────────────────────────────

#[tokio::test]
async fn paginate_all_walks_every_page() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/parking-service/parking-lots"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paged(
            json!([{"id": 1, "name": "A", "status": "ACTIVE"},
                   {"id": 2, "name": "B", "status": "ACTIVE"}]),
            2,
            3,
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/parking-service/parking-lots"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paged(
            json!([{"id": 3, "name": "C", "status": "ACTIVE"}]),
            2,
            3,
        )))
        .mount(&server)
        .await;

    let all = client
        .paginate_all(2, |page, size| {
            client.list_lots(PageRequest::new(page, size))
        })
        .await
        .unwrap();

    assert_eq!(all.len(), 3);
    assert_eq!(all[2].name, "C");
}
