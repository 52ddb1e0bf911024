//! # Integration Tests for tutorial-api
//!
//! Drives the full router (routes + middleware) in-process with
//! `tower::ServiceExt::oneshot`: CRUD, title search, published listing,
//! error bodies, health probes, OpenAPI, CORS, and the metrics endpoint.

use std::sync::OnceLock;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{json, Value};
use tower::ServiceExt;

use tutorial_api::config::{AppConfig, CorsOrigin};
use tutorial_api::state::AppState;

/// Helper: build the test app (in-memory, metrics disabled).
fn test_app() -> axum::Router {
    tutorial_api::app(AppState::new())
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Helper: read response body as JSON.
async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Helper: create a tutorial through the API and return the response JSON.
async fn create(app: &axum::Router, body: Value) -> Value {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/tutorials", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

fn titles(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap().to_string())
        .collect()
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let response = test_app().oneshot(get("/health/liveness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_probe_without_database() {
    let response = test_app().oneshot(get("/health/readiness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

#[tokio::test]
async fn test_root_welcome_message() {
    let response = test_app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Welcome to the tutorials API.");
}

// -- Create -------------------------------------------------------------------

#[tokio::test]
async fn test_create_returns_record_with_defaults() {
    let app = test_app();
    let body = create(&app, json!({"title": "Intro to Rust", "description": "ownership"})).await;
    assert_eq!(body["title"], "Intro to Rust");
    assert_eq!(body["description"], "ownership");
    assert_eq!(body["published"], false);
    assert!(body["id"].as_str().is_some());
    assert!(body["createdAt"].as_str().is_some());
    assert_eq!(body["createdAt"], body["updatedAt"]);
}

#[tokio::test]
async fn test_create_with_empty_title_is_rejected() {
    let app = test_app();
    for payload in [json!({"title": ""}), json!({"title": "   "}), json!({"description": "x"})] {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/tutorials", payload.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "payload {payload}");
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    let response = app.oneshot(get("/api/tutorials")).await.unwrap();
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_create_with_malformed_json_is_bad_request() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/tutorials")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_create_with_wrong_field_type_is_bad_request() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/api/tutorials",
            json!({"title": "x", "published": "yes"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// -- Read ---------------------------------------------------------------------

#[tokio::test]
async fn test_get_by_id_returns_created_values() {
    let app = test_app();
    let created = create(
        &app,
        json!({"title": "Async", "description": "futures", "published": true}),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .oneshot(get(&format!("/api/tutorials/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);
}

#[tokio::test]
async fn test_get_unknown_id_is_not_found() {
    let response = test_app()
        .oneshot(get("/api/tutorials/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_get_malformed_id_is_not_found() {
    let response = test_app()
        .oneshot(get("/api/tutorials/not-an-id"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_returns_all_in_creation_order() {
    let app = test_app();
    for title in ["first", "second", "third"] {
        create(&app, json!({ "title": title })).await;
    }
    let response = app.oneshot(get("/api/tutorials")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let list = body_json(response).await;
    assert_eq!(titles(&list), ["first", "second", "third"]);
}

#[tokio::test]
async fn test_title_filter_is_case_insensitive_substring() {
    let app = test_app();
    for title in ["Rust Basics", "Advanced rust", "Go Basics", "Trusty tools"] {
        create(&app, json!({ "title": title })).await;
    }

    let response = app
        .clone()
        .oneshot(get("/api/tutorials?title=RUST"))
        .await
        .unwrap();
    let list = body_json(response).await;
    assert_eq!(titles(&list), ["Rust Basics", "Advanced rust", "Trusty tools"]);

    let response = app
        .clone()
        .oneshot(get("/api/tutorials?title=basics"))
        .await
        .unwrap();
    assert_eq!(titles(&body_json(response).await), ["Rust Basics", "Go Basics"]);

    let response = app
        .clone()
        .oneshot(get("/api/tutorials?title=python"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await, json!([]));

    let response = app.oneshot(get("/api/tutorials?title=")).await.unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_title_filter_decodes_query_string() {
    let app = test_app();
    create(&app, json!({"title": "Hello World"})).await;
    create(&app, json!({"title": "HelloWorld"})).await;
    let response = app
        .oneshot(get("/api/tutorials?title=o%20w"))
        .await
        .unwrap();
    assert_eq!(titles(&body_json(response).await), ["Hello World"]);
}

#[tokio::test]
async fn test_title_filter_keeps_surrounding_whitespace() {
    let app = test_app();
    create(&app, json!({"title": "Rust Basics"})).await;
    create(&app, json!({"title": "XBasics"})).await;

    let response = app
        .clone()
        .oneshot(get("/api/tutorials?title=%20Basics"))
        .await
        .unwrap();
    assert_eq!(titles(&body_json(response).await), ["Rust Basics"]);

    let response = app.oneshot(get("/api/tutorials?title=%20%20")).await.unwrap();
    assert_eq!(titles(&body_json(response).await), ["Rust Basics", "XBasics"]);
}

#[tokio::test]
async fn test_published_lists_only_published() {
    let app = test_app();
    create(&app, json!({"title": "draft"})).await;
    create(&app, json!({"title": "live", "published": true})).await;
    create(&app, json!({"title": "hidden", "published": false})).await;

    let response = app
        .oneshot(get("/api/tutorials/published"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let list = body_json(response).await;
    assert_eq!(titles(&list), ["live"]);
    assert!(list
        .as_array()
        .unwrap()
        .iter()
        .all(|t| t["published"] == true));
}

// -- Update -------------------------------------------------------------------

#[tokio::test]
async fn test_update_changes_only_given_fields() {
    let app = test_app();
    let created = create(&app, json!({"title": "Old title", "description": "keep me"})).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/tutorials/{id}"),
            json!({"title": "New title", "published": true}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["message"], "Tutorial was updated successfully.");

    let response = app
        .oneshot(get(&format!("/api/tutorials/{id}")))
        .await
        .unwrap();
    let fetched = body_json(response).await;
    assert_eq!(fetched["title"], "New title");
    assert_eq!(fetched["description"], "keep me");
    assert_eq!(fetched["published"], true);
    assert_eq!(fetched["createdAt"], created["createdAt"]);
}

#[tokio::test]
async fn test_update_with_null_description_clears_it() {
    let app = test_app();
    let created = create(&app, json!({"title": "Macros", "description": "declarative"})).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/tutorials/{id}"),
            json!({"description": null}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get(&format!("/api/tutorials/{id}")))
        .await
        .unwrap();
    let fetched = body_json(response).await;
    assert_eq!(fetched["description"], Value::Null);
    assert_eq!(fetched["title"], "Macros");
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let response = test_app()
        .oneshot(json_request(
            "PUT",
            "/api/tutorials/00000000-0000-0000-0000-000000000000",
            json!({"published": true}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

// -- Delete -------------------------------------------------------------------

#[tokio::test]
async fn test_delete_removes_one() {
    let app = test_app();
    let keep = create(&app, json!({"title": "keep"})).await;
    let gone = create(&app, json!({"title": "gone"})).await;
    let gone_id = gone["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(delete(&format!("/api/tutorials/{gone_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["count"], 1);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/tutorials/{gone_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get("/api/tutorials")).await.unwrap();
    let list = body_json(response).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"], keep["id"]);
}

#[tokio::test]
async fn test_delete_unknown_id_is_not_found() {
    let response = test_app()
        .oneshot(delete("/api/tutorials/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_all_empties_the_list() {
    let app = test_app();
    for title in ["a", "b"] {
        create(&app, json!({ "title": title })).await;
    }

    let response = app.clone().oneshot(delete("/api/tutorials")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["count"], 2);

    let response = app.clone().oneshot(get("/api/tutorials")).await.unwrap();
    assert_eq!(body_json(response).await, json!([]));

    let response = app.oneshot(delete("/api/tutorials")).await.unwrap();
    assert_eq!(body_json(response).await["count"], 0);
}

// -- OpenAPI ------------------------------------------------------------------

#[tokio::test]
async fn test_openapi_document_is_served() {
    let response = test_app().oneshot(get("/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let spec = body_json(response).await;
    assert!(spec["openapi"].as_str().unwrap().starts_with("3."));
    assert!(spec["paths"].get("/api/tutorials/{id}").is_some());
}

// -- CORS ---------------------------------------------------------------------

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/tutorials")
                .header("origin", "http://localhost:8081")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:8081"
    );
}

#[tokio::test]
async fn test_cors_wildcard_origin() {
    let config = AppConfig {
        cors_origin: CorsOrigin::Any,
        ..AppConfig::default()
    };
    let app = tutorial_api::app(AppState::with_config(config));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/tutorials")
                .header("origin", "http://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

// -- Metrics ------------------------------------------------------------------

#[tokio::test]
async fn test_metrics_not_mounted_by_default() {
    let response = test_app().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

fn metrics_handle() -> PrometheusHandle {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
    HANDLE
        .get_or_init(|| tutorial_api::middleware::metrics::install_recorder().unwrap())
        .clone()
}

#[tokio::test]
async fn test_metrics_endpoint_reports_tutorial_gauges() {
    let app = tutorial_api::app(AppState::new().with_metrics(Some(metrics_handle())));
    create(&app, json!({"title": "measured", "published": true})).await;

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let text = body_string(response).await;
    assert!(text.contains("tutorials_total"), "{text}");
    assert!(text.contains("tutorials_published_total"), "{text}");
    assert!(text.contains("http_requests_total"), "{text}");
}
