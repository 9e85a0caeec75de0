//! Minimal HTTP/1.1 server for integration tests.
//!
//! Answers every GET with one canned response. Can omit Content-Length, send a
//! Content-Disposition header, require Basic auth, or stall before answering.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// `user:secret`, base64.
pub const BASIC_USER_SECRET: &str = "Basic dXNlcjpzZWNyZXQ=";

#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub status: u16,
    pub body: Vec<u8>,
    pub content_disposition: Option<String>,
    /// Extra header line sent as-is, without the trailing CRLF.
    pub raw_header: Option<Vec<u8>>,
    /// If false, the body is delimited by closing the connection.
    pub content_length: bool,
    /// Expected `Authorization` header value; anything else gets a 401.
    pub require_auth: Option<String>,
    /// Sleep this long after reading the request, before responding.
    pub stall: Option<Duration>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            status: 200,
            body: Vec::new(),
            content_disposition: None,
            raw_header: None,
            content_length: true,
            require_auth: None,
            stall: None,
        }
    }
}

impl ServerOptions {
    pub fn body(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }
}

/// Starts a server serving `body` with status 200. Returns the base URL
/// (e.g. "http://127.0.0.1:12345/"). The server runs until the process exits.
pub fn start(body: impl Into<Vec<u8>>) -> String {
    start_with_options(ServerOptions::body(body))
}

pub fn start_with_options(opts: ServerOptions) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let opts = Arc::new(opts);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let opts = Arc::clone(&opts);
            thread::spawn(move || handle(stream, &opts));
        }
    });
    format!("http://127.0.0.1:{}/", port)
}

/// A URL on a port nothing listens on.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

fn handle(mut stream: TcpStream, opts: &ServerOptions) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let Some(request) = read_head(&mut stream) else {
        return;
    };
    if let Some(stall) = opts.stall {
        thread::sleep(stall);
    }

    if let Some(expected) = &opts.require_auth {
        if authorization(&request).as_deref() != Some(expected.as_str()) {
            let body = b"auth required";
            let response = format!(
                "HTTP/1.1 401 Unauthorized\r\nWWW-Authenticate: Basic realm=\"test\"\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.write_all(body);
            return;
        }
    }

    let mut response = format!("HTTP/1.1 {} {}\r\n", opts.status, reason(opts.status));
    if opts.content_length {
        response.push_str(&format!("Content-Length: {}\r\n", opts.body.len()));
    }
    if let Some(cd) = &opts.content_disposition {
        response.push_str(&format!("Content-Disposition: {}\r\n", cd));
    }
    response.push_str("Content-Type: application/octet-stream\r\nConnection: close\r\n");
    let mut head = response.into_bytes();
    if let Some(raw) = &opts.raw_header {
        head.extend_from_slice(raw);
        head.extend_from_slice(b"\r\n");
    }
    head.extend_from_slice(b"\r\n");
    let _ = stream.write_all(&head);
    let _ = stream.write_all(&opts.body);
    let _ = stream.flush();
}

/// Reads until the blank line ending the request head.
fn read_head(stream: &mut TcpStream) -> Option<String> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    while !data.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return None,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    }
    String::from_utf8(data).ok()
}

fn authorization(request: &str) -> Option<String> {
    request.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.trim()
            .eq_ignore_ascii_case("authorization")
            .then(|| value.trim().to_string())
    })
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}
