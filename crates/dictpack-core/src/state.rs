//! Derived install state, recomputed from the filesystem on every query.

use crate::catalog::ArtifactDescriptor;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Where an artifact currently is in its lifecycle. Never stored: `resolve`
/// recomputes it from file presence each time it is asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallState {
    NotDownloaded,
    /// Downloaded into the staging directory, not yet validated or installed.
    Staged(PathBuf),
    /// Installed under a per-locale subdirectory of the install root.
    Installed(PathBuf),
}

impl fmt::Display for InstallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallState::NotDownloaded => write!(f, "not downloaded"),
            InstallState::Staged(p) => write!(f, "staged ({})", p.display()),
            InstallState::Installed(p) => write!(f, "installed ({})", p.display()),
        }
    }
}

/// Staging path for an artifact: `<staging_dir>/<file_name>`.
pub fn staging_path(staging_dir: &Path, artifact: &ArtifactDescriptor) -> PathBuf {
    staging_dir.join(artifact.file_name())
}

/// Classifies `artifact` by probing the filesystem. Installed wins over
/// staged; an empty file counts as absent. Missing directories are a normal
/// outcome, not an error, and nothing is created or mutated, so this is cheap
/// and safe to call arbitrarily often.
pub fn resolve(
    artifact: &ArtifactDescriptor,
    staging_dir: &Path,
    install_root: &Path,
) -> InstallState {
    if let Some(path) = find_installed(artifact, install_root) {
        return InstallState::Installed(path);
    }
    let staged = staging_path(staging_dir, artifact);
    if non_empty_file(&staged) {
        return InstallState::Staged(staged);
    }
    InstallState::NotDownloaded
}

/// Probes the per-locale subdirectories of the install root for the
/// artifact's file name. The subdirectory name was chosen by validation at
/// install time (header locale, or the artifact id as fallback) and is not
/// recorded anywhere else, so the probe covers every subdirectory.
fn find_installed(artifact: &ArtifactDescriptor, install_root: &Path) -> Option<PathBuf> {
    let file_name = artifact.file_name();
    for entry in fs::read_dir(install_root).ok()?.flatten() {
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }
        let candidate = dir.join(&file_name);
        if non_empty_file(&candidate) {
            return Some(candidate);
        }
    }
    None
}

fn non_empty_file(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}
