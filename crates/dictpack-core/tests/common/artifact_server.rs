//! Minimal HTTP/1.1 server for pipeline integration tests.
//!
//! Serves a single static body on every GET. Options allow forcing an error
//! status and throttling the body into fixed chunks so cancellation tests can
//! observe a transfer while it is still in flight.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct ArtifactServerOptions {
    /// Status code for every response. 200 serves the body; anything else
    /// sends an empty error response.
    pub status: u32,
    /// When set, the body is written in chunks of this size with a pause
    /// between chunks.
    pub throttle: Option<(usize, Duration)>,
}

impl Default for ArtifactServerOptions {
    fn default() -> Self {
        Self {
            status: 200,
            throttle: None,
        }
    }
}

/// Starts a server in a background thread serving `body`. Returns the base
/// URL (e.g. "http://127.0.0.1:12345/"). The server runs until the process exits.
pub fn start(body: Vec<u8>) -> String {
    start_with_options(body, ArtifactServerOptions::default())
}

/// Like `start` but with a forced status or throttled body.
pub fn start_with_options(body: Vec<u8>, opts: ArtifactServerOptions) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            thread::spawn(move || handle(stream, &body, opts));
        }
    });
    format!("http://127.0.0.1:{}/", port)
}

fn handle(mut stream: std::net::TcpStream, body: &[u8], opts: ArtifactServerOptions) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(_) => {}
    }

    if opts.status != 200 {
        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Length: 0\r\n\r\n",
            opts.status,
            reason(opts.status)
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    let header = format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n", body.len());
    if stream.write_all(header.as_bytes()).is_err() {
        return;
    }
    match opts.throttle {
        None => {
            let _ = stream.write_all(body);
        }
        Some((chunk, pause)) => {
            for piece in body.chunks(chunk.max(1)) {
                // Client cancellation shows up as a broken pipe; just stop.
                if stream.write_all(piece).is_err() {
                    return;
                }
                let _ = stream.flush();
                thread::sleep(pause);
            }
        }
    }
}

fn reason(status: u32) -> &'static str {
    match status {
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Error",
    }
}
