//! Minimal in-test HTTP stub for the analysis backend
//!
//! Serves canned JSON for `POST /upload` and `POST /end_feed` on a real
//! socket. Upload responses can be delayed to simulate a slow backend and
//! exercise the discard-after-end guard.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const NO_THREAT_REPLY: &str = r#"{"image":"data:image/png;base64,QkJC"}"#;
pub const LOITERING_REPLY: &str =
    r#"{"image":"data:image/png;base64,QUFB","threat":{"loitering_detected":true,"active_threat_ids":["2"]}}"#;
pub const HEATMAP_REPLY: &str = r#"{"heatmap_image":"data:image/jpeg;base64,SEVBVE1BUA=="}"#;

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

#[derive(Debug, Clone)]
struct StubBehavior {
    upload_reply: String,
    upload_delay: Duration,
}

/// A stub analysis backend bound to an ephemeral local port
pub struct StubBackend {
    addr: SocketAddr,
    /// Observable request state
    pub state: Arc<StubState>,
    behavior: Arc<Mutex<StubBehavior>>,
}

impl StubBackend {
    /// Start a stub backend answering uploads with `NO_THREAT_REPLY`
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(StubState::default());
        let behavior = Arc::new(Mutex::new(StubBehavior {
            upload_reply: NO_THREAT_REPLY.to_string(),
            upload_delay: Duration::ZERO,
        }));

        let accept_state = state.clone();
        let accept_behavior = behavior.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let state = accept_state.clone();
                let behavior = accept_behavior.clone();
                tokio::spawn(async move {
                    serve_connection(stream, state, behavior).await;
                });
            }
        });

        Self {
            addr,
            state,
            behavior,
        }
    }

    /// Base URL of the stub
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Replace the canned `/upload` response
    pub fn set_upload_reply(&self, body: &str) {
        self.behavior.lock().upload_reply = body.to_string();
    }

    /// Delay every `/upload` response by `delay`
    pub fn set_upload_delay(&self, delay: Duration) {
        self.behavior.lock().upload_delay = delay;
    }
}

async fn serve_connection(
    mut stream: TcpStream,
    state: Arc<StubState>,
    behavior: Arc<Mutex<StubBehavior>>,
) {
    let Some((head, body)) = read_request(&mut stream).await else {
        return;
    };

    let (reply, delay) = if head.starts_with("POST /upload") {
        state.upload_hits.fetch_add(1, Ordering::SeqCst);
        state.upload_bodies.lock().push(body);
        let behavior = behavior.lock().clone();
        (behavior.upload_reply, behavior.upload_delay)
    } else if head.starts_with("POST /end_feed") {
        state.end_hits.fetch_add(1, Ordering::SeqCst);
        (HEATMAP_REPLY.to_string(), Duration::ZERO)
    } else {
        (r#"{"error":"not found"}"#.to_string(), Duration::ZERO)
    };

    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    write_response(&mut stream, &reply).await;
}

async fn read_request(stream: &mut TcpStream) -> Option<(String, String)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

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

async fn write_response(stream: &mut TcpStream, body: &str) {
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}
