//! Minimal in-test HTTP stub for the analysis backend
//!
//! Serves canned JSON for `POST /upload` and `POST /end_feed` on a real
//! socket so client tests exercise the full request path.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Shared observable state of the stub backend
#[derive(Debug, Default)]
pub struct StubState {
    /// Number of `/upload` requests served
    pub upload_hits: AtomicUsize,
    /// Number of `/end_feed` requests served
    pub end_hits: AtomicUsize,
    /// Raw request bodies received on `/upload`
    pub upload_bodies: Mutex<Vec<String>>,
}

/// Canned JSON responses and response behavior
#[derive(Debug, Clone)]
pub struct StubResponses {
    /// Body returned for `/upload` (JSON, served with status 200)
    pub upload: String,
    /// Body returned for `/end_feed`
    pub end_feed: String,
    /// Status code for `/upload` responses
    pub upload_status: u16,
}

impl Default for StubResponses {
    fn default() -> Self {
        Self {
            upload: r#"{"image":"data:image/jpeg;base64,QU5OT1RBVEVE"}"#.to_string(),
            end_feed: r#"{"heatmap_image":"data:image/jpeg;base64,SEVBVE1BUA=="}"#.to_string(),
            upload_status: 200,
        }
    }
}

/// A stub analysis backend bound to an ephemeral local port
pub struct StubBackend {
    addr: SocketAddr,
    /// Observable request state
    pub state: Arc<StubState>,
    responses: Arc<Mutex<StubResponses>>,
}

impl StubBackend {
    /// Start a stub backend with the given canned responses
    pub async fn start(responses: StubResponses) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(StubState::default());
        let responses = Arc::new(Mutex::new(responses));

        let accept_state = state.clone();
        let accept_responses = responses.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let state = accept_state.clone();
                let responses = accept_responses.clone();
                tokio::spawn(async move {
                    serve_connection(stream, state, responses).await;
                });
            }
        });

        Self {
            addr,
            state,
            responses,
        }
    }

    /// Base URL of the stub
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Replace the canned `/upload` response
    pub fn set_upload_response(&self, body: &str) {
        self.responses.lock().upload = body.to_string();
    }
}

async fn serve_connection(
    mut stream: TcpStream,
    state: Arc<StubState>,
    responses: Arc<Mutex<StubResponses>>,
) {
    let Some((head, body)) = read_request(&mut stream).await else {
        return;
    };

    let responses = responses.lock().clone();
    let (status, reply) = if head.starts_with("POST /upload") {
        state.upload_hits.fetch_add(1, Ordering::SeqCst);
        state.upload_bodies.lock().push(body);
        (responses.upload_status, responses.upload)
    } else if head.starts_with("POST /end_feed") {
        state.end_hits.fetch_add(1, Ordering::SeqCst);
        (200, responses.end_feed)
    } else {
        (404, r#"{"error":"not found"}"#.to_string())
    };

    write_response(&mut stream, status, &reply).await;
}

/// Read one HTTP/1.1 request, returning the head and the body
pub async fn read_request(stream: &mut TcpStream) -> Option<(String, String)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_header_end(&buf) {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = content_length(&head).unwrap_or(0);

    let mut body_bytes = buf[header_end + 4..].to_vec();
    while body_bytes.len() < content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body_bytes.extend_from_slice(&chunk[..n]);
    }

    Some((head, String::from_utf8_lossy(&body_bytes).to_string()))
}

/// Write a JSON response and close the connection
pub async fn write_response(stream: &mut TcpStream, status: u16, body: &str) {
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        _ => "Error",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn content_length(head: &str) -> Option<usize> {
    head.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if name.eq_ignore_ascii_case("content-length") {
            value.trim().parse().ok()
        } else {
            None
        }
    })
}
