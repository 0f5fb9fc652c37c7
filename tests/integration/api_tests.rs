//! API integration tests
//!
//! Each test starts its own server on an ephemeral port with in-memory storage.

use regex::Regex;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use equiptrack_server::{api, config::AppConfig, store::Storage, AppState};

/// Spawn a server and return its API base URL
async fn spawn_app() -> String {
    let state = AppState::initialize(AppConfig::default(), Storage::volatile())
        .await
        .expect("Failed to initialize state");
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server error");
    });

    format!("http://{}/api", addr)
}

async fn create_client(http: &Client, base: &str, name: &str) -> String {
    let response = http
        .post(format!("{}/clients", base))
        .json(&json!({ "name": name, "description": "Test client" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_str().expect("No id in response").to_string()
}

fn computer(client_id: &str) -> Value {
    json!({
        "type": "computer",
        "clientId": client_id,
        "brand": "Dell",
        "model": "OptiPlex 7090",
        "serialNumber": "SN-1001",
        "sector": "Accounting",
        "operator": "Alice"
    })
}

fn ups(client_id: &str) -> Value {
    json!({
        "type": "ups",
        "clientId": client_id,
        "brand": "APC",
        "model": "Back-UPS 600",
        "serialNumber": "3B1234",
        "sector": "Reception",
        "batteryDate": "2025-03-01"
    })
}

async fn create_equipment(http: &Client, base: &str, body: &Value) -> Value {
    let response = http
        .post(format!("{}/equipment", base))
        .json(body)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
async fn test_health_check() {
    let base = spawn_app().await;
    let http = Client::new();

    let response = http
        .get(format!("{}/health", base))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_reports_storage_mode() {
    let base = spawn_app().await;
    let http = Client::new();

    let body: Value = http
        .get(format!("{}/ready", base))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
    assert_eq!(body["storage"], "volatile");
}

#[tokio::test]
async fn test_names_follow_per_type_sequences() {
    let base = spawn_app().await;
    let http = Client::new();
    let client_id = create_client(&http, &base, "Acme").await;

    let mut names = Vec::new();
    let mut ids = Vec::new();
    for body in [
        computer(&client_id),
        ups(&client_id),
        computer(&client_id),
        ups(&client_id),
        computer(&client_id),
    ] {
        let created = create_equipment(&http, &base, &body).await;
        names.push(created["name"].as_str().unwrap().to_string());
        ids.push(created["id"].as_str().unwrap().to_string());
    }
    assert_eq!(names, ["P0001", "N0001", "P0002", "N0002", "P0003"]);

    let pattern = Regex::new(r"^(P|N)\d{4,}$").unwrap();
    assert!(names.iter().all(|n| pattern.is_match(n)));

    // Deleted names are never handed out again
    let response = http
        .delete(format!("{}/equipment/{}", base, ids[2]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let next = create_equipment(&http, &base, &computer(&client_id)).await;
    assert_eq!(next["name"], "P0004");
}

#[tokio::test]
async fn test_create_returns_full_record() {
    let base = spawn_app().await;
    let http = Client::new();
    let client_id = create_client(&http, &base, "Acme").await;

    let created = create_equipment(&http, &base, &ups(&client_id)).await;
    assert_eq!(created["type"], "ups");
    assert_eq!(created["clientId"], client_id.as_str());
    assert_eq!(created["serialNumber"], "3B1234");
    assert!(created["batteryDate"].as_str().unwrap().starts_with("2025-03-01"));
    assert!(created["operator"].is_null());

    let fetched: Value = http
        .get(format!("{}/equipment/{}", base, created["id"].as_str().unwrap()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_validation_errors_are_listed_per_field() {
    let base = spawn_app().await;
    let http = Client::new();
    let client_id = create_client(&http, &base, "Acme").await;

    let mut body = computer(&client_id);
    body["brand"] = json!("");
    body["serialNumber"] = json!("");

    let response = http
        .post(format!("{}/equipment", base))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: Value = response.json().await.unwrap();
    assert_eq!(error["error"], "BadValue");
    let fields: Vec<&str> = error["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["brand", "serialNumber"]);

    // Nothing was created, so no counter value was consumed
    let counter: Value = http
        .get(format!("{}/counters/computer", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(counter["counter"], 0);
}

#[tokio::test]
async fn test_missing_field_and_unknown_type_are_rejected() {
    let base = spawn_app().await;
    let http = Client::new();
    let client_id = create_client(&http, &base, "Acme").await;

    let mut body = computer(&client_id);
    body.as_object_mut().unwrap().remove("sector");
    let response = http
        .post(format!("{}/equipment", base))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["errors"][0]["field"], "sector");

    let mut body = computer(&client_id);
    body["type"] = json!("printer");
    let response = http
        .post(format!("{}/equipment", base))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_type_specific_fields() {
    let base = spawn_app().await;
    let http = Client::new();
    let client_id = create_client(&http, &base, "Acme").await;

    let mut body = ups(&client_id);
    body["operator"] = json!("Bob");
    let response = http
        .post(format!("{}/equipment", base))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["errors"][0]["field"], "operator");
}

#[tokio::test]
async fn test_unknown_client_is_a_field_error() {
    let base = spawn_app().await;
    let http = Client::new();

    let response = http
        .post(format!("{}/equipment", base))
        .json(&computer("7c9e6679-7425-40de-944b-e07fc1f90ae7"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["errors"][0]["field"], "clientId");
}

#[tokio::test]
async fn test_not_found_and_malformed_ids() {
    let base = spawn_app().await;
    let http = Client::new();

    let response = http
        .get(format!("{}/equipment/7c9e6679-7425-40de-944b-e07fc1f90ae7", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["error"], "NoSuchData");

    let response = http
        .delete(format!("{}/clients/7c9e6679-7425-40de-944b-e07fc1f90ae7", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = http
        .get(format!("{}/equipment/not-a-uuid", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = http
        .get(format!("{}/counters/printer", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_ignores_name_and_type() {
    let base = spawn_app().await;
    let http = Client::new();
    let client_id = create_client(&http, &base, "Acme").await;
    let created = create_equipment(&http, &base, &computer(&client_id)).await;
    let id = created["id"].as_str().unwrap();

    let response = http
        .put(format!("{}/equipment/{}", base, id))
        .json(&json!({
            "name": "P9999",
            "type": "ups",
            "sector": "IT",
            "operator": ""
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["name"], "P0001");
    assert_eq!(updated["type"], "computer");
    assert_eq!(updated["sector"], "IT");
    assert!(updated["operator"].is_null());
    assert_eq!(updated["brand"], "Dell");
}

#[tokio::test]
async fn test_client_with_equipment_cannot_be_deleted() {
    let base = spawn_app().await;
    let http = Client::new();
    let client_id = create_client(&http, &base, "Acme").await;
    let created = create_equipment(&http, &base, &ups(&client_id)).await;

    let response = http
        .delete(format!("{}/clients/{}", base, client_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["error"], "ReferenceInUse");

    http.delete(format!("{}/equipment/{}", base, created["id"].as_str().unwrap()))
        .send()
        .await
        .unwrap();
    let response = http
        .delete(format!("{}/clients/{}", base, client_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_list_filters() {
    let base = spawn_app().await;
    let http = Client::new();
    let acme = create_client(&http, &base, "Acme").await;
    let globex = create_client(&http, &base, "Globex").await;

    create_equipment(&http, &base, &computer(&acme)).await;
    create_equipment(&http, &base, &ups(&acme)).await;
    create_equipment(&http, &base, &computer(&globex)).await;

    let all: Value = http
        .get(format!("{}/equipment", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.as_array().unwrap().len(), 3);

    let owned: Value = http
        .get(format!("{}/equipment?clientId={}", base, globex))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(owned.as_array().unwrap().len(), 1);
    assert_eq!(owned[0]["name"], "P0002");

    let units: Value = http
        .get(format!("{}/equipment?type=ups", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(units.as_array().unwrap().len(), 1);
    assert_eq!(units[0]["name"], "N0001");

    let searched: Value = http
        .get(format!("{}/equipment?search=apc", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(searched.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_counters_and_stats() {
    let base = spawn_app().await;
    let http = Client::new();
    let client_id = create_client(&http, &base, "Acme").await;

    let first = create_equipment(&http, &base, &computer(&client_id)).await;
    create_equipment(&http, &base, &computer(&client_id)).await;
    create_equipment(&http, &base, &ups(&client_id)).await;
    http.delete(format!("{}/equipment/{}", base, first["id"].as_str().unwrap()))
        .send()
        .await
        .unwrap();

    let counters: Value = http
        .get(format!("{}/counters", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        counters,
        json!([
            { "type": "computer", "counter": 2 },
            { "type": "ups", "counter": 1 }
        ])
    );

    let stats: Value = http
        .get(format!("{}/stats", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["totalClients"], 1);
    assert_eq!(stats["totalEquipment"], 2);
    assert_eq!(stats["computers"], 1);
    assert_eq!(stats["ups"], 1);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let base = spawn_app().await;
    let root = base.trim_end_matches("/api");
    let http = Client::new();

    let response = http
        .get(format!("{}/api-docs/openapi.json", root))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let doc: Value = response.json().await.unwrap();
    assert!(doc["paths"]["/equipment"].is_object());
}
