// HTTP API tests — drive the Axum router in-process with tower's oneshot.
//
// Covers both pipelines end to end: JSON single-text analysis and the
// multipart batch endpoints (preview, analyze, download), including the
// user-visible error paths.

#![cfg(feature = "web")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use sentimeter::config::Config;
use sentimeter::sentiment::scorer::LexiconScorer;
use sentimeter::web::{build_router, AppState};

const BOUNDARY: &str = "sentimeter-test-boundary";

const REVIEWS: &[u8] = b"id,review\n1,I love this product!\n2,\n3,This is terrible and disappointing.\n";

fn app() -> Router {
    let scorer = Arc::new(LexiconScorer::builtin().unwrap());
    build_router(AppState::new(Config::default(), scorer))
}

fn multipart(file: Option<&[u8]>, column: Option<&str>) -> Body {
    let mut body = Vec::new();
    if let Some(bytes) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"reviews.csv\"\r\nContent-Type: text/csv\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    if let Some(column) = column {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"column\"\r\n\r\n{column}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    Body::from(body)
}

fn upload(uri: &str, file: Option<&[u8]>, column: Option<&str>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(multipart(file, column))
        .unwrap()
}

fn analyze_request(text: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::json!({ "text": text }).to_string()))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

// ============================================================
// Health and dashboard
// ============================================================

#[tokio::test]
async fn health_ok() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn root_serves_dashboard() {
    let response = app()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("Sentiment Analysis Tool"));
}

// ============================================================
// Single-text analysis
// ============================================================

#[tokio::test]
async fn analyze_positive_text() {
    let response = app()
        .oneshot(analyze_request("I love this product!"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["analysis"]["label"], "positive");
    assert_eq!(json["analysis"]["banner"], "Overall Positive Sentiment");
    assert!(json["analysis"]["polarity"].as_f64().unwrap() > 0.1);
}

#[tokio::test]
async fn analyze_negative_text() {
    let response = app()
        .oneshot(analyze_request("This is terrible and disappointing."))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["analysis"]["label"], "negative");
    assert_eq!(json["analysis"]["banner"], "Overall Negative Sentiment");
}

#[tokio::test]
async fn analyze_empty_text_returns_null() {
    let response = app().oneshot(analyze_request("")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["analysis"].is_null());
}

#[tokio::test]
async fn analyze_invalid_json_returns_error_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"text\": "))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
    let json = body_json(response).await;
    assert!(json["error"].is_string());
}

// ============================================================
// Batch preview
// ============================================================

#[tokio::test]
async fn preview_lists_columns() {
    let response = app()
        .oneshot(upload("/api/batch/preview", Some(REVIEWS), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["columns"], serde_json::json!(["id", "review"]));
    assert_eq!(json["row_count"], 3);
    assert_eq!(json["rows"][0][1], "I love this product!");
}

#[tokio::test]
async fn preview_malformed_csv_is_bad_request() {
    let response = app()
        .oneshot(upload("/api/batch/preview", Some(b"a,b\n1,2,3\n"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("line 2"));
    assert!(json.get("columns").is_none());
}

#[tokio::test]
async fn preview_without_file_is_bad_request() {
    let response = app()
        .oneshot(upload("/api/batch/preview", None, Some("review")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================
// Batch analysis and download
// ============================================================

#[tokio::test]
async fn batch_analyze_returns_aggregates_and_charts() {
    let response = app()
        .oneshot(upload("/api/batch/analyze", Some(REVIEWS), Some("review")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["row_count"], 3);
    assert_eq!(json["degraded_rows"], 0);
    assert_eq!(json["distribution"]["positive"], 1);
    assert_eq!(json["distribution"]["negative"], 1);
    assert_eq!(json["distribution"]["neutral"], 1);
    assert_eq!(json["histogram"]["bins"].as_array().unwrap().len(), 20);
    assert!(json["charts"]["pie"].as_str().unwrap().starts_with("<svg"));
    assert!(json["charts"]["histogram"]
        .as_str()
        .unwrap()
        .starts_with("<svg"));
    assert_eq!(json["download_name"], "sentiment_analysis_results.csv");
}

#[tokio::test]
async fn batch_analyze_unknown_column() {
    let response = app()
        .oneshot(upload("/api/batch/analyze", Some(REVIEWS), Some("comment")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn batch_analyze_requires_column() {
    let response = app()
        .oneshot(upload("/api/batch/analyze", Some(REVIEWS), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn batch_analyze_malformed_csv_has_no_charts() {
    let response = app()
        .oneshot(upload(
            "/api/batch/analyze",
            Some(b"review\nok\nx,y\n"),
            Some("review"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json.get("charts").is_none());
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn batch_analyze_unclosed_quote_is_bad_request() {
    let response = app()
        .oneshot(upload(
            "/api/batch/analyze",
            Some(b"id,review\n1,\"great product\n2,awful\n3,fine\n"),
            Some("review"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json.get("charts").is_none());
    assert!(json["error"].as_str().unwrap().contains("line 2"));
}

#[tokio::test]
async fn batch_download_is_annotated_csv() {
    let response = app()
        .oneshot(upload("/api/batch/download", Some(REVIEWS), Some("review")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("attachment"));
    assert!(disposition.contains("sentiment_analysis_results.csv"));

    let csv = String::from_utf8(body_bytes(response).await).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "id,review,polarity,subjectivity,sentiment");
    assert_eq!(lines.len(), 4);
    assert!(lines[2].starts_with("2,,0,0,neutral"));
}
