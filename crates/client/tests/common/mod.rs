//! Canned backend for client tests: an axum app that records every request
//! and answers with queued responses in order.

use std::collections::VecDeque;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use solesync_client::{ClientConfig, SoleSyncApi};
use tokio::sync::Mutex;

/// One request as seen by the canned backend.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    /// Path plus query string, as sent.
    pub path: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

#[derive(Clone)]
struct Canned {
    responses: Arc<Mutex<VecDeque<(u16, String)>>>,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

pub struct CannedServer {
    pub base_url: String,
    pub requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// Serve `responses` in order, one per request. Requests past the end of
/// the queue get a 500.
pub async fn serve(responses: Vec<(u16, String)>) -> CannedServer {
    let state = Canned {
        responses: Arc::new(Mutex::new(responses.into())),
        requests: Arc::new(Mutex::new(Vec::new())),
    };
    let requests = Arc::clone(&state.requests);
    let app = Router::new().fallback(respond).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });

    CannedServer {
        base_url: format!("http://{addr}"),
        requests,
    }
}

pub fn api_for(server: &CannedServer) -> SoleSyncApi {
    SoleSyncApi::new(&ClientConfig::new(&server.base_url).unwrap()).unwrap()
}

async fn respond(
    State(state): State<Canned>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    state.requests.lock().await.push(CapturedRequest {
        method: method.to_string(),
        path,
        headers,
        body,
    });

    let Some((status, body)) = state.responses.lock().await.pop_front() else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "no canned response left").into_response();
    };
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}
