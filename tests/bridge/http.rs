//! HTTP transport integration tests.
//!
//! Starts an axum server and exercises it with reqwest.

use std::sync::Arc;

use optibridge::QueryBridge;
use serde_json::json;

use crate::support::hr_bridge;

/// Bind to port 0 and return the actual address.
async fn start_server(bridge: Arc<QueryBridge>) -> String {
    let app = optibridge::router(bridge);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn health_check() {
    let base = start_server(Arc::new(hr_bridge())).await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);

    let resources = body["resources"].as_array().unwrap();
    assert!(resources.iter().any(|r| r == "employees"));
    assert!(resources.iter().any(|r| r == "contracts"));
}

#[tokio::test]
async fn invoke_list_over_http() {
    let base = start_server(Arc::new(hr_bridge())).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/invoke"))
        .json(&json!({
            "resource": "employees",
            "operation": "list",
            "input": { "department": "IT" }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    let employees = body.as_array().unwrap();
    assert_eq!(employees.len(), 1);
    assert_eq!(employees[0]["firstName"], "Jean");
}

#[tokio::test]
async fn unknown_resource_returns_404() {
    let base = start_server(Arc::new(hr_bridge())).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/invoke"))
        .json(&json!({ "resource": "widgets", "operation": "list" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("unknown resource"));
}

#[tokio::test]
async fn conflict_maps_to_409_with_original_message() {
    let base = start_server(Arc::new(hr_bridge())).await;
    let client = reqwest::Client::new();

    let create = json!({
        "resource": "positions",
        "operation": "create",
        "input": { "code": "OP1" }
    });

    let resp = client
        .post(format!("{base}/invoke"))
        .json(&create)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client
        .post(format!("{base}/invoke"))
        .json(&create)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("code"));
}

#[tokio::test]
async fn batch_preserves_all_or_nothing_response() {
    let bridge = Arc::new(hr_bridge());
    let base = start_server(bridge.clone()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/batch"))
        .json(&json!([
            { "resource": "positions", "operation": "create", "input": { "code": "OP1" } },
            { "resource": "positions", "operation": "create", "input": { "code": "OP1" } }
        ]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());

    // The first create still persisted in the store.
    let resp = client
        .post(format!("{base}/invoke"))
        .json(&json!({ "resource": "positions", "operation": "list", "input": {} }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn custom_query_over_http() {
    let base = start_server(Arc::new(hr_bridge())).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/invoke"))
        .json(&json!({
            "resource": "contracts",
            "operation": "activeByEmployee",
            "input": { "employeeId": 1 }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 1);
}
