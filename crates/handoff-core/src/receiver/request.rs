//! Minimal HTTP/1.1 request reading for the loopback collector.

use std::io::Read;
use std::net::TcpStream;

/// Cap on the declared body size; the hand-off payload is tiny.
const MAX_BODY_BYTES: usize = 64 * 1024;
/// Cap on the request head.
const MAX_HEAD_BYTES: usize = 8 * 1024;

#[derive(Debug)]
pub(crate) struct Request {
    pub method: String,
    pub path: String,
    pub body: Vec<u8>,
}

pub(crate) enum Incoming {
    Request(Request),
    /// Declared body exceeds the cap.
    BodyTooLarge,
    /// Connection closed early or the head was not parseable.
    Invalid,
}

/// Reads one request (head + body per Content-Length) off the stream.
pub(crate) fn read_request(stream: &mut TcpStream) -> Incoming {
    let mut buf: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        if let Some(pos) = find_head_end(&buf) {
            break pos;
        }
        if buf.len() > MAX_HEAD_BYTES {
            return Incoming::Invalid;
        }
        match stream.read(&mut chunk) {
            Ok(0) => return Incoming::Invalid,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
            Err(_) => return Incoming::Invalid,
        }
    };

    let head = match std::str::from_utf8(&buf[..head_end]) {
        Ok(s) => s,
        Err(_) => return Incoming::Invalid,
    };
    let (method, path, content_length) = match parse_head(head) {
        Some(parsed) => parsed,
        None => return Incoming::Invalid,
    };
    if content_length > MAX_BODY_BYTES {
        return Incoming::BodyTooLarge;
    }

    let mut body = buf[head_end + 4..].to_vec();
    while body.len() < content_length {
        match stream.read(&mut chunk) {
            Ok(0) => return Incoming::Invalid,
            Ok(n) => body.extend_from_slice(&chunk[..n]),
            Err(_) => return Incoming::Invalid,
        }
    }
    body.truncate(content_length);

    Incoming::Request(Request { method, path, body })
}

fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Returns (method, path, Content-Length) from the raw request head.
fn parse_head(head: &str) -> Option<(String, String, usize)> {
    let mut lines = head.lines();
    let request_line = lines.next()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut content_length = 0usize;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().ok()?;
            }
        }
    }
    Some((method, path, content_length))
}
