use super::mock_response;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hickory_proto::op::Message;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DohMockMode {
    Answer,
    WrongId,
    Garbage,
    Status(u16),
}

#[derive(Debug, Clone, Default)]
pub struct RecordedRequest {
    pub headers: HashMap<String, String>,
    pub dns_param: Option<String>,
}

#[derive(Clone)]
struct DohState {
    mode: DohMockMode,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// DNS-over-HTTPS endpoint on plain HTTP, serving `GET /dns-query`.
pub struct MockDohServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDohServer {
    pub async fn start(mode: DohMockMode) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        let requests = Arc::new(Mutex::new(Vec::new()));

        let state = DohState {
            mode,
            requests: Arc::clone(&requests),
        };
        let app = Router::new()
            .route("/dns-query", get(handle_query))
            .with_state(state);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Ok(Self {
            addr,
            requests,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn url(&self) -> String {
        format!("http://{}/dns-query", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockDohServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn handle_query(
    State(state): State<DohState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let recorded = RecordedRequest {
        headers: headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect(),
        dns_param: params.get("dns").cloned(),
    };
    state.requests.lock().unwrap().push(recorded);

    let query = params
        .get("dns")
        .and_then(|param| URL_SAFE_NO_PAD.decode(param).ok())
        .and_then(|bytes| Message::from_vec(&bytes).ok());
    let Some(query) = query else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let body = match state.mode {
        DohMockMode::Answer => mock_response(&query, 0).to_vec().unwrap(),
        DohMockMode::WrongId => mock_response(&query, 7).to_vec().unwrap(),
        DohMockMode::Garbage => b"not a dns message".to_vec(),
        DohMockMode::Status(code) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return (status, "upstream unhappy").into_response();
        }
    };

    (
        StatusCode::OK,
        [("content-type", "application/dns-message")],
        body,
    )
        .into_response()
}
