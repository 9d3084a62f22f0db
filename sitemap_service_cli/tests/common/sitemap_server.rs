//! Minimal HTTP/1.1 server for integration tests.
//!
//! Answers every request with the same status line and body, then closes.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

/// Starts a server in a background thread answering `200 OK` with `body`.
/// Returns a URL pointing at it. The server runs until the process exits.
pub fn start(body: &str) -> String {
    start_with_status(body, "200 OK")
}

pub fn start_with_status(body: &str, status: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let response = Arc::new(format!(
        "HTTP/1.1 {}\r\nContent-Type: application/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    ));
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let response = Arc::clone(&response);
            thread::spawn(move || handle(stream, &response));
        }
    });
    format!("http://127.0.0.1:{}/sitemap.xml", port)
}

fn handle(mut stream: std::net::TcpStream, response: &str) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    if stream.read(&mut buf).unwrap_or(0) == 0 {
        return;
    }
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
