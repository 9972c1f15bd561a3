use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

/// One request as the server received it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Recorded {
    /// First value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

pub type Journal = Arc<RwLock<Vec<Recorded>>>;

pub fn journal() -> Journal {
    Arc::new(RwLock::new(Vec::new()))
}

pub fn app() -> Router {
    app_with_journal(journal())
}

pub fn app_with_journal(journal: Journal) -> Router {
    Router::new()
        .route("/ok", any(ok))
        .route("/echo", any(echo))
        .route("/status/{code}", any(status))
        .route("/redirect/{hops}", any(redirect))
        .route("/loop", any(redirect_loop))
        .route("/multi", any(multi_header))
        .route("/requests", get(list_requests))
        .with_state(journal)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_journal(listener, journal()).await
}

pub async fn run_with_journal(listener: TcpListener, journal: Journal) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_journal(journal)).await
}

async fn record(journal: &Journal, method: Method, uri: &Uri, headers: &HeaderMap, body: String) {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    tracing::debug!(%method, path = uri.path(), "recorded request");
    journal.write().await.push(Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        headers,
        body,
    });
}

async fn ok(
    State(journal): State<Journal>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> &'static str {
    record(&journal, method, &uri, &headers, body).await;
    "ok"
}

async fn echo(
    State(journal): State<Journal>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> String {
    record(&journal, method, &uri, &headers, body.clone()).await;
    body
}

async fn status(
    State(journal): State<Journal>,
    Path(code): Path<u16>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Result<(StatusCode, String), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    record(&journal, method, &uri, &headers, body).await;
    Ok((status, format!("status {code}")))
}

/// Answers `302` towards `/redirect/{hops - 1}` until `hops` reaches zero.
async fn redirect(
    State(journal): State<Journal>,
    Path(hops): Path<u32>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    record(&journal, method, &uri, &headers, body).await;
    if hops == 0 {
        return (StatusCode::OK, "arrived").into_response();
    }
    let location = format!("/redirect/{}", hops - 1);
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

async fn redirect_loop(
    State(journal): State<Journal>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    record(&journal, method, &uri, &headers, body).await;
    (StatusCode::FOUND, [(header::LOCATION, "/loop")]).into_response()
}

async fn multi_header(
    State(journal): State<Journal>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (HeaderMap, &'static str) {
    record(&journal, method, &uri, &headers, body).await;
    let mut reply = HeaderMap::new();
    reply.append("x-multi", HeaderValue::from_static("one"));
    reply.append("x-multi", HeaderValue::from_static("two"));
    (reply, "ok")
}

async fn list_requests(State(journal): State<Journal>) -> Json<Vec<Recorded>> {
    Json(journal.read().await.clone())
}
