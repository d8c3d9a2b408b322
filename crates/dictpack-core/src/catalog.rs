//! Artifact catalog: static mapping of artifact id -> remote URL and display name.
//!
//! The built-in catalog mirrors the upstream dictionary mirror layout; a TOML
//! file with `[[artifact]]` tables can replace it for custom mirrors. Pure
//! data: order is configuration order, never sorted, and nothing here touches
//! the filesystem or network.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use url::Url;

/// File extension of dictionary artifacts.
pub const ARTIFACT_EXT: &str = "dict";

const BUILTIN_URL_PREFIX: &str =
    "http://sourceforge.net/projects/namelessrom/files/romextras/dictionaries/";
const BUILTIN_URL_SUFFIX: &str = "/download";

/// Built-in artifact ids and display names, in mirror order.
const BUILTIN_ENTRIES: &[(&str, &str)] = &[
    ("main_bg", "Bulgarian"),
    ("main_cs", "Czech"),
    ("main_da", "Danish"),
    ("main_de", "German"),
    ("main_el", "Greek"),
    ("main_en", "English"),
    ("main_es", "Spanish"),
    ("main_fi", "Finnish"),
    ("main_fr", "French"),
    ("main_hr", "Croatian"),
    ("main_hu", "Hungarian"),
    ("main_it", "Italian"),
    ("main_iw", "Hebrew"),
    ("main_ka", "Georgian"),
    ("main_nb", "Norwegian Bokmal"),
    ("main_nl", "Dutch"),
    ("main_pt_br", "Portuguese (Brazil)"),
    ("main_pt_pt", "Portuguese (Portugal)"),
    ("main_ru", "Russian"),
    ("main_sv", "Swedish"),
];

/// One downloadable artifact: immutable id, remote URL and human-readable name.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactDescriptor {
    pub id: String,
    pub remote_url: String,
    pub display_name: String,
}

impl ArtifactDescriptor {
    /// File name used for both the staging copy and the installed copy.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.id, ARTIFACT_EXT)
    }
}

/// Ordered, read-only catalog of artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactCatalog {
    entries: Vec<ArtifactDescriptor>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(rename = "artifact")]
    artifacts: Vec<ArtifactDescriptor>,
}

impl ArtifactCatalog {
    /// Built-in catalog of main dictionaries on the upstream mirror.
    pub fn builtin() -> Self {
        let entries = BUILTIN_ENTRIES
            .iter()
            .map(|(id, name)| {
                let file = format!("{}.{}", id, ARTIFACT_EXT);
                ArtifactDescriptor {
                    id: (*id).to_string(),
                    remote_url: format!("{BUILTIN_URL_PREFIX}{file}{BUILTIN_URL_SUFFIX}"),
                    display_name: (*name).to_string(),
                }
            })
            .collect();
        Self { entries }
    }

    /// Loads a catalog from a TOML file with `[[artifact]]` tables.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog file: {}", path.display()))?;
        let file: CatalogFile = toml::from_str(&data)
            .with_context(|| format!("failed to parse catalog file: {}", path.display()))?;
        Self::from_entries(file.artifacts)
    }

    /// Builds a catalog from entries. Every remote URL must parse; one bad
    /// URL fails the whole catalog rather than surfacing later at download time.
    pub fn from_entries(entries: Vec<ArtifactDescriptor>) -> Result<Self> {
        for entry in &entries {
            Url::parse(&entry.remote_url).with_context(|| {
                format!(
                    "invalid remote URL for artifact {}: {}",
                    entry.id, entry.remote_url
                )
            })?;
        }
        Ok(Self { entries })
    }

    /// All artifacts in configuration order.
    pub fn list(&self) -> &[ArtifactDescriptor] {
        &self.entries
    }

    /// Looks up an artifact by id.
    pub fn get(&self, id: &str) -> Option<&ArtifactDescriptor> {
        self.entries.iter().find(|e| e.id == id)
    }
}
