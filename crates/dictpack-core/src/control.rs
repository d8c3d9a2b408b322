//! Cancellation registry: shared abort tokens keyed by artifact id.
//!
//! When the pipeline starts a download it registers the artifact with an
//! abort token; a caller (CLI today, any UI layer tomorrow) can request
//! cancellation for an id and the transfer loop observes the token at the
//! next chunk boundary.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// Shared registry of artifact id -> abort token.
#[derive(Default)]
pub struct DownloadControl {
    downloads: RwLock<HashMap<String, Arc<AtomicBool>>>,
}

impl DownloadControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an in-flight download; returns the token handed to the
    /// transfer loop. The token flips to true when cancel is requested.
    pub fn register(&self, artifact_id: &str) -> Arc<AtomicBool> {
        let token = Arc::new(AtomicBool::new(false));
        self.downloads
            .write()
            .unwrap()
            .insert(artifact_id.to_string(), Arc::clone(&token));
        token
    }

    /// Unregister a download (call when it finishes, success or failure).
    pub fn unregister(&self, artifact_id: &str) {
        self.downloads.write().unwrap().remove(artifact_id);
    }

    /// Request cancellation of an in-flight download. Unknown ids are a no-op.
    pub fn request_cancel(&self, artifact_id: &str) {
        if let Some(token) = self.downloads.read().unwrap().get(artifact_id) {
            token.store(true, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_flips_registered_token() {
        let control = DownloadControl::new();
        let token = control.register("main_en");
        assert!(!token.load(Ordering::Relaxed));
        control.request_cancel("main_en");
        assert!(token.load(Ordering::Relaxed));
    }

    #[test]
    fn cancel_unknown_id_is_noop() {
        let control = DownloadControl::new();
        let token = control.register("main_en");
        control.request_cancel("main_de");
        assert!(!token.load(Ordering::Relaxed));
    }

    #[test]
    fn unregister_detaches_token() {
        let control = DownloadControl::new();
        let token = control.register("main_en");
        control.unregister("main_en");
        control.request_cancel("main_en");
        assert!(!token.load(Ordering::Relaxed));
    }
}
