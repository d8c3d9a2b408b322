//! Background download task: one worker thread per transfer.

use super::{download, DownloadError};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Handle to an in-flight background download.
///
/// Cancellation is cooperative: `cancel` flips the abort token and the
/// transfer stops at the next chunk boundary, after which `join` returns
/// `DownloadError::Cancelled`.
pub struct DownloadHandle {
    abort: Arc<AtomicBool>,
    join: thread::JoinHandle<Result<(), DownloadError>>,
}

impl DownloadHandle {
    /// Requests cancellation. Returns immediately; the transfer observes the
    /// request at the next chunk boundary.
    pub fn cancel(&self) {
        self.abort.store(true, Ordering::Relaxed);
    }

    /// The shared abort token (e.g. for registering with a `DownloadControl`).
    pub fn abort_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.abort)
    }

    /// Waits for the transfer to finish and returns its outcome.
    pub fn join(self) -> Result<(), DownloadError> {
        self.join
            .join()
            .unwrap_or_else(|e| panic!("download worker panicked: {:?}", e))
    }
}

/// Spawns a background download of `url` into `dest`.
pub fn spawn(url: &str, dest: &Path) -> DownloadHandle {
    spawn_with_token(url, dest, Arc::new(AtomicBool::new(false)))
}

/// Like `spawn`, but reuses an externally owned abort token (one registered
/// with a `DownloadControl`) so cancellation can also be requested by id.
pub fn spawn_with_token(url: &str, dest: &Path, abort: Arc<AtomicBool>) -> DownloadHandle {
    let url = url.to_string();
    let dest = dest.to_path_buf();
    let token = Arc::clone(&abort);
    let join = thread::spawn(move || download(&url, &dest, &token));
    DownloadHandle { abort, join }
}
