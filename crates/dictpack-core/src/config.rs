use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Global configuration loaded from `~/.config/dictpack/config.toml`.
///
/// All fields are optional; unset fields fall back to XDG defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DictpackConfig {
    /// Directory holding downloaded-but-not-installed artifacts.
    /// Default: `~/.cache/dictpack/staging`.
    #[serde(default)]
    pub staging_dir: Option<PathBuf>,
    /// Base directory for per-locale installed artifacts.
    /// Default: `~/.local/share/dictpack/dictionaries`.
    #[serde(default)]
    pub install_root: Option<PathBuf>,
    /// Optional TOML catalog file replacing the built-in artifact catalog.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

impl DictpackConfig {
    /// Effective staging directory: override or XDG cache default.
    pub fn staging_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.staging_dir {
            return Ok(dir.clone());
        }
        let xdg_dirs = xdg::BaseDirectories::with_prefix("dictpack")?;
        Ok(xdg_dirs.get_cache_home().join("staging"))
    }

    /// Effective install root: override or XDG data default.
    pub fn install_root(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.install_root {
            return Ok(dir.clone());
        }
        let xdg_dirs = xdg::BaseDirectories::with_prefix("dictpack")?;
        Ok(xdg_dirs.get_data_home().join("dictionaries"))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dictpack")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<DictpackConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = DictpackConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: DictpackConfig = toml::from_str(&data)?;
    Ok(cfg)
}
