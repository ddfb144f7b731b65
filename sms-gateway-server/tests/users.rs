mod helpers;

use blockscout_service_launcher::{test_database::database, test_server};
use migration::Migrator;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::MockServer;

#[tokio::test]
#[ignore = "Needs database to run"]
async fn user_lifecycle_endpoints_work() {
    let db = database!(Migrator);
    let carrier = MockServer::start().await;
    let base = helpers::init_sms_gateway_server(
        db.db_url(),
        "test_queue_users",
        carrier.uri().parse().unwrap(),
        |settings| settings,
    )
    .await;

    let created: Value =
        test_server::send_post_request(&base, "/api/v1/users", &json!({"name": "Ashkan"})).await;
    assert_eq!(created["data"]["name"], "Ashkan");
    assert_eq!(created["data"]["balance"], 0);
    let user_id = created["data"]["id"].as_i64().unwrap();

    let found: Value =
        test_server::send_get_request(&base, &format!("/api/v1/users/{user_id}")).await;
    assert_eq!(found["data"]["id"].as_i64().unwrap(), user_id);

    let funded: Value = test_server::send_post_request(
        &base,
        &format!("/api/v1/users/{user_id}/balance"),
        &json!({"balance": 1000}),
    )
    .await;
    assert_eq!(funded["data"]["balance"], 1000);
}

#[tokio::test]
#[ignore = "Needs database to run"]
async fn invalid_user_requests_are_rejected() {
    let db = database!(Migrator);
    let carrier = MockServer::start().await;
    let base = helpers::init_sms_gateway_server(
        db.db_url(),
        "test_queue_users_invalid",
        carrier.uri().parse().unwrap(),
        |settings| settings,
    )
    .await;
    let client = reqwest::Client::new();

    // Blank name is refused by the store contract.
    let response = client
        .post(base.join("api/v1/users").unwrap())
        .json(&json!({"name": "   "}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    // Unknown user.
    let response = client
        .get(base.join("api/v1/users/404").unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

    // Negative top-up.
    let created: Value =
        test_server::send_post_request(&base, "/api/v1/users", &json!({"name": "Ashkan"})).await;
    let user_id = created["data"]["id"].as_i64().unwrap();
    let response = client
        .post(base.join(&format!("api/v1/users/{user_id}/balance")).unwrap())
        .json(&json!({"balance": -10}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    // Admission without funds.
    let response = client
        .post(
            base.join(&format!("api/v1/users/{user_id}/messages"))
                .unwrap(),
        )
        .json(&json!({"content": "hi", "receiver": "09123456789"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::PAYMENT_REQUIRED);
}
