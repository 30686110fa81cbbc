//! Integration tests for SoleMate.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p solemate-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `dashboard_scenarios` - Ledger changes flowing into the dashboard cards
//! - `json_store` - Records persisted to and loaded from a data directory
//! - `rest_source` - The REST source against a local stub server
//!
//! No external services are needed; the REST tests serve canned responses
//! from a loopback socket.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, TimeZone, Utc};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing_subscriber::fmt::MakeWriter;

/// A unique data directory under the system temp dir, removed on drop.
#[derive(Debug)]
pub struct TempDataDir {
    path: PathBuf,
}

impl TempDataDir {
    #[must_use]
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("solemate-it-{}", uuid::Uuid::new_v4()));
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for TempDataDir {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TempDataDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// Midday UTC on the given date.
///
/// # Panics
///
/// Panics on an invalid date.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

/// A canned HTTP response and the request line it was served for.
#[derive(Debug)]
pub struct StubServer {
    /// Base URL of the server, ending in `/`.
    pub base_url: String,
    /// Resolves to the raw request (request line and headers).
    pub request: oneshot::Receiver<String>,
}

/// Serve one HTTP response on a loopback port.
///
/// The server answers the first connection with `status` and `body` as JSON
/// and hands back the raw request it received.
///
/// # Panics
///
/// Panics if no loopback port can be bound.
#[allow(clippy::unwrap_used)]
pub async fn serve_once(status: u16, body: &str) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let body = body.to_string();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };

        let mut request = Vec::new();
        let mut buf = [0_u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => request.extend_from_slice(buf.get(..n).unwrap_or_default()),
            }
        }

        let response = format!(
            "HTTP/1.1 {status} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
        let _ = tx.send(String::from_utf8_lossy(&request).into_owned());
    });

    StubServer {
        base_url: format!("http://{addr}/"),
        request: rx,
    }
}

/// Log output captured in memory, for use as a `tracing_subscriber` writer.
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    /// Everything written so far.
    #[must_use]
    pub fn contents(&self) -> String {
        let buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
