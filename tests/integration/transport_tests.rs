//! `HttpFetcher` against throwaway local HTTP stubs.

use rustdict::error::LookupError;
use rustdict::transport::{Fetch, HttpFetcher};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

/// Serve one connection with `response`, or hold it open silently when `None`.
fn serve_once(response: Option<&'static str>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            read_request(&mut stream);
            match response {
                Some(response) => {
                    let _ = stream.write_all(response.as_bytes());
                    let _ = stream.flush();
                }
                None => thread::sleep(Duration::from_secs(3)),
            }
        }
    });

    format!("http://{addr}/define?term=hello")
}

fn read_request(stream: &mut TcpStream) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
}

#[test]
fn test_ok_response_returns_body() {
    let url = serve_once(Some(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 11\r\nConnection: close\r\n\r\n{\"ok\":true}",
    ));

    let body = HttpFetcher::new()
        .with_user_agent("rustdict-test")
        .fetch("hello", &url, Duration::from_secs(5))
        .unwrap();
    assert_eq!(body, "{\"ok\":true}");
}

#[test]
fn test_non_200_status_is_query_error() {
    let url = serve_once(Some(
        "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
    ));

    let err = HttpFetcher::new()
        .fetch("hello", &url, Duration::from_secs(5))
        .unwrap_err();
    assert_eq!(
        err,
        LookupError::Query {
            word: "hello".to_string(),
            status: 404,
        }
    );
}

#[test]
fn test_server_error_status_is_query_error() {
    let url = serve_once(Some(
        "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
    ));

    let err = HttpFetcher::new()
        .fetch("hello", &url, Duration::from_secs(5))
        .unwrap_err();
    assert!(matches!(err, LookupError::Query { status: 503, .. }));
}

#[test]
fn test_silent_server_times_out() {
    let url = serve_once(None);

    let err = HttpFetcher::new()
        .fetch("hello", &url, Duration::from_millis(300))
        .unwrap_err();
    assert_eq!(err, LookupError::Timeout);
}

#[test]
fn test_refused_connection_is_unexpected() {
    // Bind and drop to get a port with nothing listening.
    let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let url = format!("http://{addr}/");

    let err = HttpFetcher::new()
        .fetch("hello", &url, Duration::from_secs(2))
        .unwrap_err();
    assert!(
        matches!(err, LookupError::Unexpected(_)),
        "expected Unexpected, got {err:?}"
    );
}

#[test]
fn test_unresolvable_host_is_no_network() {
    let err = HttpFetcher::new()
        .fetch(
            "hello",
            "http://no-such-host.invalid/define?term=hello",
            Duration::from_secs(5),
        )
        .unwrap_err();
    assert_eq!(err, LookupError::NoNetwork);
}
