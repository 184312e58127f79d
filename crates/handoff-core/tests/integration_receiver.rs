//! Integration tests for the loopback collector: page serving, payload
//! acceptance, rejection of bad POSTs.

use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::thread;

use handoff_core::fragment::parse_fragment;
use handoff_core::receiver::Collector;
use handoff_core::submit::{deliver, DeliveryLimits};
use serde_json::{json, Value};

/// Writes a raw request and returns the full response text.
fn send_raw(addr: SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.write_all(request.as_bytes()).unwrap();
    let _ = stream.shutdown(Shutdown::Write);
    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    response
}

fn raw_post(addr: SocketAddr, body: &str) -> String {
    send_raw(
        addr,
        &format!(
            "POST / HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        ),
    )
}

#[test]
fn collector_accepts_post_and_returns_payload() {
    let collector = Collector::bind(0).unwrap();
    let endpoint = collector.endpoint().unwrap();
    let waiter = thread::spawn(move || collector.collect());

    let params = parse_fragment("#access_token=xyz&token_type=bearer");
    let delivery = deliver(&endpoint, &params, DeliveryLimits::default()).unwrap();
    assert_eq!(delivery.status, 202);

    let payload = waiter.join().unwrap().unwrap();
    assert_eq!(
        Value::Object(payload),
        json!({ "access_token": "xyz", "token_type": "bearer" })
    );
}

#[test]
fn collector_serves_page_and_script_on_get() {
    let collector = Collector::bind(0).unwrap();
    let addr = collector.local_addr().unwrap();
    let waiter = thread::spawn(move || collector.collect());

    let page = send_raw(addr, "GET / HTTP/1.1\r\nHost: localhost\r\n\r\n");
    assert!(page.starts_with("HTTP/1.1 200 OK"));
    assert!(page.contains("text/html"));
    assert!(page.contains("status_message"));

    let script = send_raw(addr, "GET /handoff.js HTTP/1.1\r\nHost: localhost\r\n\r\n");
    assert!(script.starts_with("HTTP/1.1 200 OK"));
    assert!(script.contains("application/ecmascript"));
    assert!(script.contains("URLSearchParams"));

    // GETs must not have completed the wait; only a POST does.
    let response = raw_post(addr, r#"{"a":"1"}"#);
    assert!(response.starts_with("HTTP/1.1 202 Accepted"));
    let payload = waiter.join().unwrap().unwrap();
    assert_eq!(Value::Object(payload), json!({ "a": "1" }));
}

#[test]
fn malformed_json_gets_400_and_wait_continues() {
    let collector = Collector::bind(0).unwrap();
    let addr = collector.local_addr().unwrap();
    let waiter = thread::spawn(move || collector.collect());

    let bad = raw_post(addr, "this is not json");
    assert!(bad.starts_with("HTTP/1.1 400 Bad Request"));

    let good = raw_post(addr, r#"{"access_token":"abc"}"#);
    assert!(good.starts_with("HTTP/1.1 202 Accepted"));

    let payload = waiter.join().unwrap().unwrap();
    assert_eq!(Value::Object(payload), json!({ "access_token": "abc" }));
}

#[test]
fn non_object_json_is_rejected() {
    let collector = Collector::bind(0).unwrap();
    let addr = collector.local_addr().unwrap();
    let waiter = thread::spawn(move || collector.collect());

    let array = raw_post(addr, "[1, 2, 3]");
    assert!(array.starts_with("HTTP/1.1 400 Bad Request"));

    let done = raw_post(addr, "{}");
    assert!(done.starts_with("HTTP/1.1 202 Accepted"));
    let payload = waiter.join().unwrap().unwrap();
    assert!(payload.is_empty());
}

#[test]
fn unsupported_method_gets_405() {
    let collector = Collector::bind(0).unwrap();
    let addr = collector.local_addr().unwrap();
    let waiter = thread::spawn(move || collector.collect());

    let response = send_raw(addr, "DELETE / HTTP/1.1\r\nHost: localhost\r\n\r\n");
    assert!(response.starts_with("HTTP/1.1 405 Method Not Allowed"));

    let done = raw_post(addr, r#"{"k":"v"}"#);
    assert!(done.starts_with("HTTP/1.1 202 Accepted"));
    let payload = waiter.join().unwrap().unwrap();
    assert_eq!(Value::Object(payload), json!({ "k": "v" }));
}
