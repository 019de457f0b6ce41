use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Name of the optional settings file looked up in the working directory.
pub const CONFIG_FILE: &str = "dashboard.json";

/// Where the dashboard finds its datasets, and how big the window starts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub publications_path: PathBuf,
    pub authors_path: PathBuf,
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            publications_path: PathBuf::from("heart_disease_dataset.csv"),
            authors_path: PathBuf::from("author_details_output.xlsx"),
            window_size: [1200.0, 800.0],
        }
    }
}

impl DashboardConfig {
    /// Read `dashboard.json` from the working directory, falling back to defaults.
    pub fn load_or_default() -> Self {
        Self::load_from_dir_or_default(Path::new("."))
    }

    /// Read `dashboard.json` from `dir`.
    ///
    /// A missing file gives the defaults silently; an unreadable one is logged
    /// and also gives the defaults.
    pub fn load_from_dir_or_default(dir: &Path) -> Self {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            log::debug!("No {} found, using default dataset paths", path.display());
            return Self::default();
        }
        match Self::from_file(&path) {
            Ok(config) => {
                log::info!("Using settings from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring {}: {e:#}", path.display());
                Self::default()
            }
        }
    }

    /// Parse a settings file. Relative dataset paths resolve against its directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&text).context("parsing settings JSON")?;

        if let Some(base) = path.parent() {
            config.publications_path = resolve(base, &config.publications_path);
            config.authors_path = resolve(base, &config.authors_path);
        }
        Ok(config)
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() || base.as_os_str().is_empty() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            DashboardConfig::load_from_dir_or_default(dir.path()),
            DashboardConfig::default()
        );
    }

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "authors_path": "data/authors.csv" }"#,
        )
        .unwrap();

        let config = DashboardConfig::load_from_dir_or_default(dir.path());

        assert_eq!(config.authors_path, dir.path().join("data/authors.csv"));
        assert_eq!(
            config.publications_path,
            dir.path().join("heart_disease_dataset.csv")
        );
        assert_eq!(config.window_size, [1200.0, 800.0]);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), r#"{ "authors": 3 }"#).unwrap();

        assert!(DashboardConfig::from_file(&dir.path().join(CONFIG_FILE)).is_err());
        assert_eq!(
            DashboardConfig::load_from_dir_or_default(dir.path()),
            DashboardConfig::default()
        );
    }
}
