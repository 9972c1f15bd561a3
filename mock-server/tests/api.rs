use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_journal, journal, Recorded};
use tower::ServiceExt;

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn body_text(response: axum::response::Response) -> String {
    String::from_utf8(body_bytes(response).await.to_vec()).unwrap()
}

fn request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(body.to_string())
        .unwrap()
}

// --- ok / echo ---

#[tokio::test]
async fn ok_answers_any_method() {
    for method in ["GET", "POST", "PUT", "DELETE", "OPTIONS"] {
        let resp = app().oneshot(request(method, "/ok", "")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{method}");
        assert_eq!(body_text(resp).await, "ok");
    }
}

#[tokio::test]
async fn echo_returns_request_body() {
    let resp = app()
        .oneshot(request("POST", "/echo", "payload"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "payload");
}

// --- journal ---

#[tokio::test]
async fn requests_are_recorded() {
    let journal = journal();
    let req = Request::builder()
        .method("POST")
        .uri("/ok")
        .header("X", "a; b")
        .body("payload".to_string())
        .unwrap();
    app_with_journal(journal.clone()).oneshot(req).await.unwrap();

    let seen = journal.read().await;
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "POST");
    assert_eq!(seen[0].path, "/ok");
    assert_eq!(seen[0].header("x"), Some("a; b"));
    assert_eq!(seen[0].body, "payload");
}

#[tokio::test]
async fn requests_endpoint_lists_journal() {
    let journal = journal();
    let app = app_with_journal(journal.clone());
    app.clone()
        .oneshot(request("PUT", "/echo", "one"))
        .await
        .unwrap();

    let resp = app.oneshot(request("GET", "/requests", "")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let listed: Vec<Recorded> = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].method, "PUT");
    assert_eq!(listed[0].body, "one");
}

// --- status ---

#[tokio::test]
async fn status_returns_requested_code() {
    let resp = app()
        .oneshot(request("GET", "/status/418", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(body_text(resp).await, "status 418");
}

#[tokio::test]
async fn status_rejects_out_of_range_code() {
    let resp = app()
        .oneshot(request("GET", "/status/42", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- redirects ---

#[tokio::test]
async fn redirect_points_at_next_hop() {
    let resp = app()
        .oneshot(request("GET", "/redirect/2", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[header::LOCATION], "/redirect/1");
}

#[tokio::test]
async fn redirect_zero_arrives() {
    let resp = app()
        .oneshot(request("GET", "/redirect/0", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "arrived");
}

#[tokio::test]
async fn loop_redirects_to_itself() {
    let resp = app().oneshot(request("GET", "/loop", "")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[header::LOCATION], "/loop");
}

// --- headers ---

#[tokio::test]
async fn multi_sends_repeated_header() {
    let resp = app().oneshot(request("GET", "/multi", "")).await.unwrap();
    let values: Vec<_> = resp
        .headers()
        .get_all("x-multi")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(values, vec!["one", "two"]);
}
