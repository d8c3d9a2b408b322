//! Atomic install into per-locale directories, and uninstall.
//!
//! The staged file is copied next to its final location as `<name>.part` and
//! then renamed over the target, so readers never observe a half-written
//! install. Reinstall silently overwrites: a missing target before the copy
//! is not an error. On failure no rollback is attempted; a freshly created
//! locale directory may remain.

use crate::header::DictHeader;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Temporary suffix used before the atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("could not create install directory {}: {source}", dir.display())]
    DirectoryCreateFailed { dir: PathBuf, source: io::Error },
    #[error("could not move artifact into place at {}: {source}", target.display())]
    MoveFailed { target: PathBuf, source: io::Error },
    #[error("could not delete installed artifact {}: {source}", path.display())]
    DeleteFailed { path: PathBuf, source: io::Error },
}

/// Locale subdirectory for an artifact: the header locale lower-cased for
/// path stability, or the artifact id when the header has no locale tag.
pub fn locale_dir(header: &DictHeader, artifact_id: &str) -> String {
    header
        .locale
        .as_deref()
        .unwrap_or(artifact_id)
        .to_lowercase()
}

/// Installs the validated staged file at `source` as
/// `<install_root>/<locale>/<file_name>` and returns the installed path.
///
/// On success the staging copy is removed: ownership of the artifact moves to
/// the install tree, so at most one of the staged and installed files exists
/// afterwards.
pub fn install(
    source: &Path,
    header: &DictHeader,
    artifact_id: &str,
    file_name: &str,
    install_root: &Path,
) -> Result<PathBuf, InstallError> {
    let dir = install_root.join(locale_dir(header, artifact_id));
    fs::create_dir_all(&dir).map_err(|source| InstallError::DirectoryCreateFailed {
        dir: dir.clone(),
        source,
    })?;

    let target = dir.join(file_name);
    let temp = temp_path(&target);
    fs::copy(source, &temp).map_err(|source| InstallError::MoveFailed {
        target: target.clone(),
        source,
    })?;
    fs::rename(&temp, &target).map_err(|source| InstallError::MoveFailed {
        target: target.clone(),
        source,
    })?;
    if !target.is_file() {
        return Err(InstallError::MoveFailed {
            target,
            source: io::Error::new(io::ErrorKind::NotFound, "target missing after rename"),
        });
    }

    // The staging copy is no longer authoritative once the install exists.
    if let Err(e) = fs::remove_file(source) {
        if e.kind() != io::ErrorKind::NotFound {
            tracing::warn!(path = %source.display(), "could not remove staging copy: {}", e);
        }
    }
    Ok(target)
}

/// Deletes the installed artifact at `path`. Deleting an already-absent file
/// is success, so calling uninstall twice in a row is not an error.
pub fn uninstall(path: &Path) -> Result<(), InstallError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(InstallError::DeleteFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// `<target>.part` sibling used for the copy before the rename.
fn temp_path(target: &Path) -> PathBuf {
    let mut o = target.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(locale: Option<&str>) -> DictHeader {
        DictHeader {
            locale: locale.map(str::to_string),
            format_version: 2,
        }
    }

    #[test]
    fn locale_dir_is_lowercased() {
        assert_eq!(locale_dir(&header(Some("pt_BR")), "main_pt_br"), "pt_br");
        assert_eq!(locale_dir(&header(Some("EN")), "main_en"), "en");
    }

    #[test]
    fn locale_dir_falls_back_to_artifact_id() {
        assert_eq!(locale_dir(&header(None), "Main_En"), "main_en");
    }

    #[test]
    fn install_creates_locale_dir_and_moves_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("main_en.dict");
        fs::write(&source, b"dictionary bytes").unwrap();
        let root = dir.path().join("installed");

        let target = install(&source, &header(Some("en")), "main_en", "main_en.dict", &root)
            .unwrap();
        assert_eq!(target, root.join("en").join("main_en.dict"));
        assert_eq!(fs::read(&target).unwrap(), b"dictionary bytes");
        assert!(!source.exists(), "staging copy consumed by install");
        assert!(!temp_path(&target).exists(), "no .part left behind");
    }

    #[test]
    fn reinstall_overwrites_existing_target() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("installed");
        let h = header(Some("en"));

        let s1 = dir.path().join("a.dict");
        fs::write(&s1, b"first").unwrap();
        let first = install(&s1, &h, "main_en", "main_en.dict", &root).unwrap();

        let s2 = dir.path().join("b.dict");
        fs::write(&s2, b"second").unwrap();
        let second = install(&s2, &h, "main_en", "main_en.dict", &root).unwrap();

        assert_eq!(first, second);
        assert_eq!(fs::read(&second).unwrap(), b"second");
    }

    #[test]
    fn install_missing_source_reports_move_failed() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("installed");
        let err = install(
            &dir.path().join("missing.dict"),
            &header(Some("en")),
            "main_en",
            "main_en.dict",
            &root,
        )
        .unwrap_err();
        assert!(matches!(err, InstallError::MoveFailed { .. }));
    }

    #[test]
    fn uninstall_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main_en.dict");
        fs::write(&path, b"x").unwrap();
        uninstall(&path).unwrap();
        assert!(!path.exists());
        // Second delete of the now-absent file is still success.
        uninstall(&path).unwrap();
    }
}
