//! Pipeline facade: the per-artifact operations a caller (CLI or UI) invokes.
//!
//! Composes the catalog, state resolver, downloader, header validation and
//! installer. Holds only configuration and the cancellation registry; all
//! artifact state lives on the filesystem and is recomputed on demand.
//!
//! The facade adds no locking of its own: callers keep at most one in-flight
//! operation per artifact id and await download completion before requesting
//! install.

use crate::catalog::{ArtifactCatalog, ArtifactDescriptor};
use crate::control::DownloadControl;
use crate::downloader::{self, DownloadHandle};
use crate::header;
use crate::installer;
use crate::state::{self, InstallState};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Entry point for the download/validate/install lifecycle of catalog artifacts.
pub struct Pipeline {
    catalog: ArtifactCatalog,
    staging_dir: PathBuf,
    install_root: PathBuf,
    control: DownloadControl,
}

impl Pipeline {
    pub fn new(catalog: ArtifactCatalog, staging_dir: PathBuf, install_root: PathBuf) -> Self {
        Self {
            catalog,
            staging_dir,
            install_root,
            control: DownloadControl::new(),
        }
    }

    pub fn catalog(&self) -> &ArtifactCatalog {
        &self.catalog
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    fn descriptor(&self, artifact_id: &str) -> Result<&ArtifactDescriptor> {
        self.catalog
            .get(artifact_id)
            .with_context(|| format!("unknown artifact: {artifact_id}"))
    }

    /// Current state of `artifact_id`, recomputed from the filesystem.
    pub fn state(&self, artifact_id: &str) -> Result<InstallState> {
        let artifact = self.descriptor(artifact_id)?;
        Ok(state::resolve(artifact, &self.staging_dir, &self.install_root))
    }

    /// Starts a background download into the staging path and registers it
    /// for cancellation by id. The caller owns the handle and must call
    /// `finish_download` after joining it.
    pub fn start_download(&self, artifact_id: &str) -> Result<DownloadHandle> {
        let artifact = self.descriptor(artifact_id)?;
        fs::create_dir_all(&self.staging_dir).with_context(|| {
            format!(
                "failed to create staging directory: {}",
                self.staging_dir.display()
            )
        })?;
        let dest = state::staging_path(&self.staging_dir, artifact);
        let token = self.control.register(artifact_id);
        tracing::info!(id = artifact_id, url = %artifact.remote_url, "starting download");
        Ok(downloader::spawn_with_token(
            &artifact.remote_url,
            &dest,
            token,
        ))
    }

    /// Requests cancellation of an in-flight download for `artifact_id`. The
    /// transfer stops at its next chunk boundary; partial bytes stay at the
    /// staging path.
    pub fn cancel_download(&self, artifact_id: &str) {
        self.control.request_cancel(artifact_id);
    }

    /// Drops the cancellation registration once a download handle was joined.
    pub fn finish_download(&self, artifact_id: &str) {
        self.control.unregister(artifact_id);
    }

    /// Downloads `artifact_id` to its staging path, blocking until the
    /// transfer finishes. Cancellable from another thread via `cancel_download`.
    pub fn download(&self, artifact_id: &str) -> Result<()> {
        let handle = self.start_download(artifact_id)?;
        let result = handle.join();
        self.finish_download(artifact_id);
        result.with_context(|| format!("download of {artifact_id} failed"))
    }

    /// Validates the staged file's header and installs it under its locale
    /// directory, returning the installed path. Install is never attempted on
    /// a file that fails validation, so a bad download leaves the install
    /// tree untouched.
    pub fn install(&self, artifact_id: &str) -> Result<PathBuf> {
        let artifact = self.descriptor(artifact_id)?;
        let source = state::staging_path(&self.staging_dir, artifact);
        let header = header::read_header(&source)
            .with_context(|| format!("staged file for {artifact_id} failed validation"))?;
        let target = installer::install(
            &source,
            &header,
            &artifact.id,
            &artifact.file_name(),
            &self.install_root,
        )
        .with_context(|| format!("install of {artifact_id} failed"))?;
        tracing::info!(
            id = artifact_id,
            locale = header.locale.as_deref().unwrap_or("UNKNOWN"),
            target = %target.display(),
            "installed artifact"
        );
        Ok(target)
    }

    /// Uninstalls `artifact_id` if it is installed. Succeeds when nothing is
    /// installed, so repeated calls are not an error.
    pub fn uninstall(&self, artifact_id: &str) -> Result<()> {
        match self.state(artifact_id)? {
            InstallState::Installed(path) => {
                installer::uninstall(&path)
                    .with_context(|| format!("uninstall of {artifact_id} failed"))?;
                tracing::info!(id = artifact_id, path = %path.display(), "uninstalled artifact");
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
