//! HTTP server & routing integration tests
//!
//! Exercises the router surface without any outbound network calls: page
//! rendering, health reporting, and request validation.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use floradex_id::{build_router, AppState};

/// Create test app state with a dummy API key
fn test_app_state() -> AppState {
    AppState::new("test-key".to_string()).unwrap()
}

#[tokio::test]
async fn test_root_route_serves_html() {
    let app = build_router(test_app_state());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get("content-type");
    assert!(
        content_type.is_some() && content_type.unwrap().to_str().unwrap().contains("text/html"),
        "Root route should serve HTML"
    );

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("Plant Species Identifier"));
}

#[tokio::test]
async fn test_health_endpoint_reports_module_and_uptime() {
    let app = build_router(test_app_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "floradex-id");
    assert!(json["uptime_seconds"].as_u64().is_some());
    assert!(json.get("last_error").is_none(), "no error recorded yet");
}

#[tokio::test]
async fn test_identify_without_multipart_body_is_client_error() {
    let app = build_router(test_app_state());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/identify")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(
        response.status().is_client_error(),
        "POST without multipart body should be rejected, got {}",
        response.status()
    );
}

#[tokio::test]
async fn test_identify_rejects_unknown_organ() {
    let boundary = "X-FLORADEX-TEST-BOUNDARY";
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"organ\"\r\n\r\n\
         stem\r\n\
         --{b}\r\n\
         Content-Disposition: form-data; name=\"image\"; filename=\"leaf.jpg\"\r\n\
         Content-Type: image/jpeg\r\n\r\n\
         notarealjpeg\r\n\
         --{b}--\r\n",
        b = boundary
    );

    let app = build_router(test_app_state());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/identify")
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("organ"));
}

#[tokio::test]
async fn test_species_route_requires_name() {
    let app = build_router(test_app_state());

    // No name segment at all: the route does not match
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/species/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_species_route_rejects_blank_name() {
    let app = build_router(test_app_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/species/%20%20")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = build_router(test_app_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/no-such-page")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
