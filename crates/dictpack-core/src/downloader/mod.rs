//! Streaming HTTP GET into the staging path, with cooperative cancellation.
//!
//! One GET per request. The body is streamed to disk chunk by chunk and never
//! buffered whole in memory; the abort token is checked on every chunk, so
//! cancellation latency is bounded by one chunk's transfer time. Cancellation
//! leaves whatever partial bytes were already written at the destination.
//!
//! The destination file is only created once the first body chunk arrives, so
//! a failed request (HTTP error, refused connection) leaves the staging path
//! untouched. The curl handle and the output file are dropped on every exit
//! path, releasing the connection and closing the file descriptor.

mod handle;
pub use handle::{spawn, spawn_with_token, DownloadHandle};

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

/// Transfer buffer size: one cancellation check per chunk of this many bytes.
pub const CHUNK_SIZE: usize = 4096;

/// Why a download failed.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The server answered with a non-200 status (after redirects).
    #[error("server returned HTTP {code} {reason}")]
    HttpStatus { code: u32, reason: String },
    /// Transport or local I/O failure.
    #[error("download failed: {0}")]
    Transport(String),
    /// The caller requested cancellation; observed at a chunk boundary.
    /// Partial bytes already written stay at the destination.
    #[error("download cancelled")]
    Cancelled,
}

/// Downloads `url` into `dest`, blocking until the transfer finishes.
///
/// `abort` is the cooperative cancellation token: once it reads true the
/// transfer stops at the next chunk boundary and the result is `Cancelled`.
/// Follows redirects (mirror download URLs redirect to the actual payload).
pub fn download(url: &str, dest: &Path, abort: &Arc<AtomicBool>) -> Result<(), DownloadError> {
    let io_error: Arc<Mutex<Option<std::io::Error>>> = Arc::new(Mutex::new(None));
    let cancelled = Arc::new(AtomicBool::new(false));
    let status_line: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
    // Opened lazily on the first body chunk so error responses never touch disk.
    let output: Arc<Mutex<Option<File>>> = Arc::new(Mutex::new(None));

    let mut easy = curl::easy::Easy::new();
    easy.url(url)
        .map_err(|e| DownloadError::Transport(e.to_string()))?;
    easy.follow_location(true)
        .map_err(|e| DownloadError::Transport(e.to_string()))?;
    easy.max_redirections(10)
        .map_err(|e| DownloadError::Transport(e.to_string()))?;
    easy.buffer_size(CHUNK_SIZE)
        .map_err(|e| DownloadError::Transport(e.to_string()))?;
    // Error statuses fail the transfer before any body is written.
    easy.fail_on_error(true)
        .map_err(|e| DownloadError::Transport(e.to_string()))?;
    easy.connect_timeout(Duration::from_secs(30))
        .map_err(|e| DownloadError::Transport(e.to_string()))?;
    // Abort if throughput drops below 1 KiB/s for 60s; hard wall at 1 hour.
    easy.low_speed_limit(1024)
        .map_err(|e| DownloadError::Transport(e.to_string()))?;
    easy.low_speed_time(Duration::from_secs(60))
        .map_err(|e| DownloadError::Transport(e.to_string()))?;
    easy.timeout(Duration::from_secs(3600))
        .map_err(|e| DownloadError::Transport(e.to_string()))?;

    let perform_result = {
        let status_line_cb = Arc::clone(&status_line);
        let abort_cb = Arc::clone(abort);
        let cancelled_cb = Arc::clone(&cancelled);
        let io_error_cb = Arc::clone(&io_error);
        let output_cb = Arc::clone(&output);
        let dest_cb = dest.to_path_buf();

        let mut transfer = easy.transfer();
        transfer
            .header_function(move |data| {
                // Keep the last status line; redirects overwrite earlier ones.
                if let Ok(s) = str::from_utf8(data) {
                    if s.starts_with("HTTP/") {
                        *status_line_cb.lock().unwrap() = Some(s.trim_end().to_string());
                    }
                }
                true
            })
            .map_err(|e| DownloadError::Transport(e.to_string()))?;
        transfer
            .write_function(move |data| {
                if abort_cb.load(Ordering::Relaxed) {
                    cancelled_cb.store(true, Ordering::Relaxed);
                    return Ok(0); // abort the transfer at this chunk boundary
                }
                let mut guard = output_cb.lock().unwrap();
                if guard.is_none() {
                    match File::create(&dest_cb) {
                        Ok(f) => *guard = Some(f),
                        Err(e) => {
                            let _ = io_error_cb.lock().unwrap().replace(e);
                            return Ok(0);
                        }
                    }
                }
                match guard.as_mut().unwrap().write_all(data) {
                    Ok(()) => Ok(data.len()),
                    Err(e) => {
                        let _ = io_error_cb.lock().unwrap().replace(e);
                        Ok(0)
                    }
                }
            })
            .map_err(|e| DownloadError::Transport(e.to_string()))?;
        transfer.perform()
    };

    if let Err(e) = perform_result {
        if cancelled.load(Ordering::Relaxed) {
            tracing::debug!(url, "download cancelled by caller");
            return Err(DownloadError::Cancelled);
        }
        if let Some(io_err) = io_error.lock().unwrap().take() {
            return Err(DownloadError::Transport(io_err.to_string()));
        }
        if e.is_http_returned_error() {
            let code = easy.response_code().unwrap_or(0);
            return Err(DownloadError::HttpStatus {
                code,
                reason: reason_phrase(status_line.lock().unwrap().as_deref()),
            });
        }
        return Err(DownloadError::Transport(e.to_string()));
    }

    let code = easy
        .response_code()
        .map_err(|e| DownloadError::Transport(e.to_string()))?;
    if code != 200 {
        return Err(DownloadError::HttpStatus {
            code,
            reason: reason_phrase(status_line.lock().unwrap().as_deref()),
        });
    }

    if let Some(file) = output.lock().unwrap().take() {
        file.sync_all()
            .map_err(|e| DownloadError::Transport(e.to_string()))?;
    }
    tracing::debug!(url, dest = %dest.display(), "download complete");
    Ok(())
}

/// Reason phrase from a status line like `HTTP/1.1 404 Not Found`.
fn reason_phrase(status_line: Option<&str>) -> String {
    status_line
        .and_then(|line| line.splitn(3, ' ').nth(2))
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_phrase_from_status_line() {
        assert_eq!(
            reason_phrase(Some("HTTP/1.1 404 Not Found")),
            "Not Found"
        );
        assert_eq!(reason_phrase(Some("HTTP/1.1 200 OK")), "OK");
        assert_eq!(reason_phrase(Some("HTTP/2 503")), "");
        assert_eq!(reason_phrase(None), "");
    }

    #[test]
    fn transport_error_for_unresolvable_host() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.dict");
        let abort = Arc::new(AtomicBool::new(false));
        let err = download("http://dictpack.invalid/main_en.dict", &dest, &abort).unwrap_err();
        assert!(matches!(err, DownloadError::Transport(_)));
        assert!(!dest.exists(), "failed download never creates the file");
    }
}
