use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use rsvp_store::{app, app_with, HeaderStyle};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn json_request(body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- list ---

#[tokio::test]
async fn list_empty_sheet() {
    let resp = app().oneshot(get("/?action=list")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, serde_json::json!([]));
}

// --- add ---

#[tokio::test]
async fn add_via_query_returns_ok() {
    let resp = app()
        .oneshot(get("/?action=add&name=Ana&email=a%40x.com&attending=Yes&guests=2&message=&timestamp=t"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, serde_json::json!({"ok": true}));
}

#[tokio::test]
async fn add_via_post_returns_ok() {
    let resp = app()
        .oneshot(json_request(r#"{"action":"add","entry":{"name":"Ana","guests":2}}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["ok"], true);
}

// --- script errors ---

#[tokio::test]
async fn unknown_action_is_script_error() {
    let resp = app().oneshot(get("/?action=drop")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Unknown action: drop");
}

#[tokio::test]
async fn missing_action_is_script_error() {
    let resp = app().oneshot(get("/")).await.unwrap();
    assert!(body_json(resp).await["error"].is_string());
}

#[tokio::test]
async fn malformed_post_is_script_error() {
    let resp = app().oneshot(json_request("not json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}

// --- full lifecycle ---

#[tokio::test]
async fn append_then_list() {
    use tower::Service;

    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/?action=add&name=Ana&email=a%40x.com&attending=Yes&guests=2&message=Hi%2C%20all&timestamp=t1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            r#"{"action":"add","entry":{"name":"Bo","email":"b@x.com","attending":"No","guests":0,"message":"","timestamp":"t2"}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/?action=list"))
        .await
        .unwrap();
    let rows = body_json(resp).await;
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["email"], "a@x.com");
    assert_eq!(rows[0]["message"], "Hi, all");
    assert_eq!(rows[0]["guests"], "2");
    assert_eq!(rows[1]["name"], "Bo");
    assert_eq!(rows[1]["guests"], "0");
}

#[tokio::test]
async fn title_header_sheet_lists_title_keys() {
    use tower::Service;

    let mut app = app_with(HeaderStyle::Title).into_service();
    ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/?action=add&name=Bo&timestamp=2025-01-01T00%3A00%3A00Z"))
        .await
        .unwrap();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/?action=list"))
        .await
        .unwrap();
    let rows = body_json(resp).await;
    assert_eq!(rows[0]["Name"], "Bo");
    assert_eq!(rows[0]["Timestamp"], "2025-01-01T00:00:00Z");
    assert_eq!(rows[0]["Email"], "");
}
