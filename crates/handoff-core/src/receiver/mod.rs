//! One-shot loopback collector for the hand-off payload.
//!
//! Binds the loopback interface, serves the embedded hand-off page over GET,
//! and waits for the page's JSON POST. The first body that parses as a JSON
//! object is answered `202 Accepted` and returned to the caller; everything
//! else keeps the wait alive.

mod page;
mod request;

pub use page::{PAGE_HTML, PAGE_JS};

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::io::Write;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::time::Duration;

use request::{read_request, Incoming};

const IO_TIMEOUT: Duration = Duration::from_secs(2);

/// Loopback listener waiting for one hand-off payload.
pub struct Collector {
    listener: TcpListener,
}

impl Collector {
    /// Binds `127.0.0.1:port`. Port 0 picks an ephemeral port.
    pub fn bind(port: u16) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", port))
            .with_context(|| format!("failed to bind loopback port {}", port))?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// URL of this collector, usable as a delivery endpoint.
    pub fn endpoint(&self) -> Result<String> {
        Ok(format!("http://{}/", self.local_addr()?))
    }

    /// Serves until one valid JSON POST arrives and returns its payload.
    ///
    /// The 202 response is written before the payload reaches the caller;
    /// whatever the caller decides about the payload never changes the wire
    /// answer (see [`verify_payload`]).
    pub fn collect(&self) -> Result<Map<String, Value>> {
        tracing::info!("collector listening on {}", self.local_addr()?);
        loop {
            let (stream, peer) = self.listener.accept().context("accept failed")?;
            tracing::debug!("connection from {}", peer);
            if let Some(payload) = handle(stream) {
                return Ok(payload);
            }
        }
    }
}

/// Handles one connection; returns the payload if this was the hand-off POST.
fn handle(mut stream: TcpStream) -> Option<Map<String, Value>> {
    let _ = stream.set_read_timeout(Some(IO_TIMEOUT));
    let _ = stream.set_write_timeout(Some(IO_TIMEOUT));

    let request = match read_request(&mut stream) {
        Incoming::Request(r) => r,
        Incoming::BodyTooLarge => {
            respond(&mut stream, "413 Payload Too Large", "text/html", b"");
            return None;
        }
        Incoming::Invalid => return None,
    };

    if request.method.eq_ignore_ascii_case("GET") {
        let (content_type, body) = page::content_for_path(&request.path);
        respond(&mut stream, "200 OK", content_type, body.as_bytes());
        return None;
    }
    if !request.method.eq_ignore_ascii_case("POST") {
        respond(&mut stream, "405 Method Not Allowed", "text/html", b"");
        return None;
    }

    match serde_json::from_slice::<Value>(&request.body) {
        Ok(Value::Object(payload)) => {
            respond(&mut stream, "202 Accepted", "application/json", b"");
            tracing::info!("accepted payload with {} keys", payload.len());
            Some(payload)
        }
        _ => {
            tracing::warn!("rejected POST whose body is not a JSON object");
            respond(&mut stream, "400 Bad Request", "text/html", b"");
            None
        }
    }
}

fn respond(stream: &mut TcpStream, status: &str, content_type: &str, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}

/// Checks that every payload key is among the expected ones.
///
/// Runs on the returned payload, after the 202 was already sent: the
/// collector acknowledges receipt, the application decides what an
/// unexpected payload means.
pub fn verify_payload(payload: &Map<String, Value>, expected_keys: &[String]) -> Result<()> {
    for key in payload.keys() {
        if !expected_keys.iter().any(|k| k == key) {
            anyhow::bail!("unexpected key in payload: {}", key);
        }
    }
    Ok(())
}
