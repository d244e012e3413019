//! End-to-end flows against a real PostgreSQL container
//!
//! # Running These Tests
//!
//! ```bash
//! cargo test --test e2e_tests -- --ignored --nocapture
//! ```
//!
//! Requires a running Docker daemon.

mod common;

use axum::http::StatusCode;
use common::{init_test_tracing, TestApp, TestPostgres};
use marketplace_server::features::users::commands::{ensure_admin, EnsureAdminCommand};
use serde_json::{json, Value};

const ADMIN_LOGIN: &str = "admin";
const ADMIN_PASSWORD: &str = "admin1";

async fn start() -> (TestPostgres, TestApp, String) {
    init_test_tracing();

    let pg = TestPostgres::start()
        .await
        .expect("Failed to start PostgreSQL container");

    ensure_admin::handle(
        pg.pool_clone(),
        EnsureAdminCommand {
            login: ADMIN_LOGIN.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        },
    )
    .await
    .expect("Failed to bootstrap admin");

    let app = TestApp::new(pg.pool_clone());
    let (status, body) = app
        .post(
            "/api/v1/auth/login",
            None,
            json!({ "login": ADMIN_LOGIN, "password": ADMIN_PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let token = body["data"]["token"].as_str().unwrap().to_string();

    (pg, app, token)
}

async fn create_certificate(app: &TestApp, token: &str, name: &str, tags: &[&str]) -> i64 {
    let (status, body) = app
        .post(
            "/api/v1/certificates",
            Some(token),
            json!({
                "name": name,
                "description": "Gift certificate",
                "price": "120.00",
                "duration": 30,
                "tags": tags
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["status"], "DRAFT");
    body["data"]["id"].as_i64().unwrap()
}

fn message(body: &Value) -> &str {
    body["error"]["message"].as_str().unwrap_or_default()
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_certificate_lifecycle() {
    let (_pg, app, admin) = start().await;

    let spa = create_certificate(&app, &admin, "Spa weekend", &["spa", "relax"]).await;
    create_certificate(&app, &admin, "Dinner for two", &["food"]).await;

    let (status, body) = app
        .post(
            "/api/v1/certificates",
            Some(&admin),
            json!({
                "name": "Spa weekend",
                "description": "Another one",
                "price": 10,
                "duration": 1
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(message(&body), "Certificate with name 'Spa weekend' already exists");

    let (status, body) = app
        .get("/api/v1/certificates?tag_names=spa,relax&per_page=1", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["meta"]["pagination"]["total"], 1);
    let self_link = body["meta"]["links"]["self"].as_str().unwrap();
    assert!(self_link.starts_with("/api/v1/certificates?"));
    assert!(self_link.contains("tag_names="));

    let uri = format!("/api/v1/certificates/{}", spa);
    let (status, _) = app.patch(&uri, Some(&admin), json!({ "status": "ACTIVE" })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.patch(&uri, Some(&admin), json!({ "status": "DRAFT" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(message(&body), "Certificate with status ACTIVE can be only set to INACTIVE");

    let (status, _) = app
        .post(&format!("{}/tags", uri), Some(&admin), json!({ "name": "new" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.patch(&uri, Some(&admin), json!({ "status": "INACTIVE" })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.patch(&uri, Some(&admin), json!({ "duration": 10 })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(message(&body), "Cannot update certificate with status INACTIVE");

    // the name is free again once the holder is INACTIVE
    create_certificate(&app, &admin, "Spa weekend", &["spa"]).await;

    let (status, body) = app.get("/api/v1/items?status=INACTIVE", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], spa);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_signup_order_and_reports() {
    let (_pg, app, admin) = start().await;

    let spa = create_certificate(&app, &admin, "Spa weekend", &["spa", "relax"]).await;
    let draft = create_certificate(&app, &admin, "Dinner for two", &["food"]).await;
    let (status, _) = app
        .patch(
            &format!("/api/v1/certificates/{}", spa),
            Some(&admin),
            json!({ "status": "ACTIVE" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post(
            "/api/v1/auth/signup",
            None,
            json!({
                "first_name": "John",
                "last_name": "Doe",
                "login": "john.doe",
                "password": "secret1",
                "skills": ["rust"]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["user"]["role"], "USER");
    assert!(body["data"]["user"].get("password_hash").is_none());
    let user_id = body["data"]["user"]["id"].as_i64().unwrap();
    let user = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = app
        .post(
            "/api/v1/auth/signup",
            None,
            json!({
                "first_name": "Jane",
                "last_name": "Doe",
                "login": "john.doe",
                "password": "secret2"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(message(&body), "User with login 'john.doe' already exists");

    let (status, body) = app
        .post("/api/v1/users/me/orders", Some(&user), json!({ "certificate_ids": [spa, draft] }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(message(&body), "Cannot make order with non active certificates");

    let (status, body) = app
        .post("/api/v1/users/me/orders", Some(&user), json!({ "certificate_ids": [spa, spa] }))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["certificates"].as_array().unwrap().len(), 1);
    let order_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = app
        .get(&format!("/api/v1/users/me/orders/{}", order_id), Some(&user))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .get(&format!("/api/v1/users/{}/orders", user_id), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["pagination"]["total"], 1);

    let (status, body) = app.get("/api/v1/tags/most-used", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "spa");
    assert_eq!(body["data"]["user_id"], user_id);

    let review = json!({ "comment": "Relaxing", "rating": 5 });
    let (status, body) = app
        .post(&format!("/api/v1/certificates/{}/reviews", spa), Some(&user), review.clone())
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);

    let (status, body) = app
        .post(
            &format!("/api/v1/certificates/{}/desired-devs/{}", spa, user_id),
            Some(&user),
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let (status, body) = app
        .get(&format!("/api/v1/certificates/{}/desired-devs", spa), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], user_id);

    let (status, body) = app
        .get(&format!("/api/v1/users/{}/certificates?relation=desired", user_id), Some(&user))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["meta"]["pagination"]["total"], 1);

    let (status, body) = app
        .post(
            &format!("/api/v1/certificates/{}/dev/{}", spa, user_id),
            Some(&admin),
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["developer_id"], user_id);
    assert!(body["data"]["creator_id"].is_i64());

    let (status, body) = app
        .get(&format!("/api/v1/users/{}/certificates?relation=taken", user_id), Some(&user))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], spa);

    let (status, body) = app
        .post(&format!("/api/v1/certificates/{}/reviews", spa), Some(&user), review)
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["creator_id"], user_id);
    assert_eq!(body["data"]["developer_id"], user_id);

    let (status, body) = app
        .delete(&format!("/api/v1/certificates/{}", spa), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);

    // audit writes are spawned after the response
    let mut entries = Vec::new();
    for _ in 0..20 {
        let (status, body) = app
            .get("/api/v1/audit?resource_type=order", Some(&admin))
            .await;
        assert_eq!(status, StatusCode::OK);
        entries = body["data"].as_array().cloned().unwrap_or_default();
        if !entries.is_empty() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["user_id"], user_id);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_profile_update_changes_password() {
    let (_pg, app, _admin) = start().await;

    let (status, body) = app
        .post(
            "/api/v1/auth/signup",
            None,
            json!({
                "first_name": "John",
                "last_name": "Doe",
                "login": "john.doe",
                "password": "secret1"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = body["data"]["user"]["id"].as_i64().unwrap();
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = app
        .put(
            &format!("/api/v1/users/{}", user_id),
            Some(&token),
            json!({
                "first_name": "John",
                "last_name": "Doe",
                "login": "john.doe",
                "password": "secret2",
                "skills": ["rust", "sql"]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["skills"].as_array().unwrap().len(), 2);

    let (status, _) = app
        .post(
            "/api/v1/auth/login",
            None,
            json!({ "login": "john.doe", "password": "secret1" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .post(
            "/api/v1/auth/login",
            None,
            json!({ "login": "john.doe", "password": "secret2" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["token_type"], "Bearer");

    let (status, body) = app.get("/api/v1/users/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["login"], "john.doe");
}
