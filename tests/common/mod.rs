//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use std::future::Future;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const POND_TIMELINE: &str = r#"[
    {
        "id": 11,
        "text": "An old silent pond / A frog jumps into the pond— / Splash! Silence again.",
        "created_at": "Wed Jan 01 00:00:00 +0000 2020",
        "user": {"id": 7, "name": "Matsuo Basho", "screen_name": "basho"}
    },
    {
        "id": 12,
        "text": "Lunch was fine",
        "created_at": "Thu Jan 02 12:00:00 +0000 2020",
        "user": {"id": 7, "name": "Matsuo Basho", "screen_name": "basho"}
    }
]"#;

/// Request targets (path and query) seen by a mock backend, in order.
#[derive(Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<String>>>);

#[allow(dead_code)]
impl RequestLog {
    pub fn targets(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.targets().iter().filter(|t| t.starts_with(prefix)).count()
    }
}

/// Start a programmable mock backend on an ephemeral port.
///
/// `f` receives the request target (e.g. `/statuses/user_timeline.json?screen_name=x`)
/// and returns the status code and body to send back.
pub async fn start_programmable_backend<F, Fut>(f: F) -> (SocketAddr, RequestLog)
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log = RequestLog::default();
    let f = Arc::new(f);

    let task_log = log.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let log = task_log.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 8192];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let head = String::from_utf8_lossy(&buf[..n]).to_string();
                        let target = head
                            .lines()
                            .next()
                            .and_then(|line| line.split_whitespace().nth(1))
                            .unwrap_or("/")
                            .to_string();
                        log.0.lock().unwrap().push(target.clone());

                        let (status, body) = f(target).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, log)
}

/// Mock remote service with a fixed rate limit budget and timeline response.
#[allow(dead_code)]
pub async fn start_mock_remote(
    remaining_hits: i64,
    timeline_status: u16,
    timeline_body: &'static str,
) -> (SocketAddr, RequestLog) {
    start_programmable_backend(move |target| async move {
        if target.starts_with("/account/rate_limit_status.json") {
            (200, format!("{{\"remaining_hits\": {}}}", remaining_hits))
        } else if target.starts_with("/statuses/user_timeline.json") {
            (timeline_status, timeline_body.to_string())
        } else {
            (404, String::new())
        }
    })
    .await
}
