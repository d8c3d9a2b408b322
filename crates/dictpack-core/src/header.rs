//! Binary dictionary header inspection.
//!
//! An artifact starts with a fixed prefix: a 4-byte big-endian magic number,
//! a 2-byte format version, 2 bytes of flags, and a 4-byte total header size.
//! The remainder of the header (up to that size) is a sequence of
//! NUL-terminated key/value attribute strings; the `locale` attribute, when
//! present, names the language the dictionary is for. Everything past the
//! header is the dictionary body and is not interpreted here.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Magic number at the start of every well-formed dictionary artifact.
pub const MAGIC: u32 = 0x9BC1_3AFE;

/// Fixed prefix length: magic + version + flags + header size.
const FIXED_PREFIX_LEN: usize = 12;

/// Upper bound on the header region; anything larger is treated as corrupt.
const MAX_HEADER_SIZE: u32 = 64 * 1024;

const LOCALE_KEY: &str = "locale";

/// Why a staged file was rejected as a dictionary artifact.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The file does not start with the dictionary magic number.
    #[error("not a dictionary file (bad magic)")]
    BadMagic,
    /// The file could not be read, or the header is truncated or corrupt.
    #[error("unreadable dictionary header: {0}")]
    Unreadable(String),
}

/// Parsed artifact header. Created on demand from the file; never persisted.
#[derive(Debug, Clone)]
pub struct DictHeader {
    /// `locale` attribute value, if the header carries one. Absence is valid;
    /// callers treat it as "unknown locale", not as an error.
    pub locale: Option<String>,
    /// Format version from the fixed prefix.
    pub format_version: u16,
}

/// Reads and validates the header of the file at `path`.
///
/// Read-only; does not mutate the file and is safe to call repeatedly. A file
/// too short to hold the fixed prefix is reported as `BadMagic` (it cannot be
/// a dictionary), a plausible prefix with a truncated attribute region as
/// `Unreadable`.
pub fn read_header(path: &Path) -> Result<DictHeader, ValidationError> {
    let mut file = File::open(path).map_err(|e| ValidationError::Unreadable(e.to_string()))?;

    let mut prefix = [0u8; FIXED_PREFIX_LEN];
    file.read_exact(&mut prefix)
        .map_err(|_| ValidationError::BadMagic)?;

    let magic = u32::from_be_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]);
    if magic != MAGIC {
        return Err(ValidationError::BadMagic);
    }
    let format_version = u16::from_be_bytes([prefix[4], prefix[5]]);
    // prefix[6..8] are flags; nothing here depends on them.
    let header_size = u32::from_be_bytes([prefix[8], prefix[9], prefix[10], prefix[11]]);
    if (header_size as usize) < FIXED_PREFIX_LEN || header_size > MAX_HEADER_SIZE {
        return Err(ValidationError::Unreadable(format!(
            "implausible header size {header_size}"
        )));
    }

    let mut attributes = vec![0u8; header_size as usize - FIXED_PREFIX_LEN];
    file.read_exact(&mut attributes)
        .map_err(|e| ValidationError::Unreadable(format!("truncated header: {e}")))?;

    Ok(DictHeader {
        locale: find_attribute(&attributes, LOCALE_KEY),
        format_version,
    })
}

/// Scans the NUL-separated key/value region for `key`.
fn find_attribute(region: &[u8], key: &str) -> Option<String> {
    let mut fields = region
        .split(|b| *b == 0)
        .map(|f| String::from_utf8_lossy(f).into_owned());
    while let Some(k) = fields.next() {
        let v = fields.next()?;
        if k == key && !v.is_empty() {
            return Some(v);
        }
    }
    None
}
