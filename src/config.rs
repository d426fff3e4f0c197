/*============================================================
  Synavera Project: Syn-Syu
  Module: syncompose_core::config
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Load Syn-Compose configuration from TOML, falling back to
    defaults when no file is present.

  Security / Safety Notes:
    Reads operator-owned files only. No secrets are expected in
    the configuration.

  Dependencies:
    serde + toml for parsing, dirs for XDG path discovery.

  Operational Scope:
    Loaded once at startup; values are passed explicitly to the
    fetcher, logger and reporter.

  Revision History:
    2025-11-12 COD  Authored compose configuration loader.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit defaults for every key
    - Deterministic failure on unreadable or invalid files
============================================================*/

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SyncomposeError};

const DEFAULT_BASE_URL: &str = "https://kojipkgs.fedoraproject.org/compose/rawhide/";
const CONFIG_DIR: &str = "syn-syu";
const CONFIG_FILE: &str = "compose.toml";

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncomposeConfig {
    pub compose: ComposeConfig,
    pub paths: PathsConfig,
}

/// Where composes live and how to fetch them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposeConfig {
    pub base_url: String,
    /// Manifest variant, e.g. `Everything`.
    pub variant: String,
    pub arch: String,
    /// Request timeout in seconds.
    pub timeout: u64,
    pub max_retries: usize,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            variant: "Everything".to_string(),
            arch: "x86_64".to_string(),
            timeout: 30,
            max_retries: 3,
        }
    }
}

/// Output locations. Unset paths resolve to XDG defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub log_dir: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
}

impl SyncomposeConfig {
    /// Load from `path`, or from the default location when `None`.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load_from_optional_path(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(explicit) => Self::load(explicit),
            None => match default_config_path() {
                Some(candidate) if candidate.is_file() => Self::load(&candidate),
                _ => Ok(Self::default()),
            },
        }
    }

    fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            SyncomposeError::Config(format!(
                "Failed to read config {}: {err}",
                path.display()
            ))
        })?;
        Self::from_toml(&raw).map_err(|err| match err {
            SyncomposeError::Config(msg) => {
                SyncomposeError::Config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)
            .map_err(|err| SyncomposeError::Config(format!("Invalid TOML: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let base = &self.compose.base_url;
        if !(base.starts_with("https://") || base.starts_with("http://")) {
            return Err(SyncomposeError::Config(format!(
                "compose.base_url must be an http(s) URL, got `{base}`"
            )));
        }
        if self.compose.variant.trim().is_empty() || self.compose.arch.trim().is_empty() {
            return Err(SyncomposeError::Config(
                "compose.variant and compose.arch must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn log_dir(&self) -> PathBuf {
        self.paths.log_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(CONFIG_DIR)
                .join("logs")
        })
    }

    pub fn report_path(&self) -> Option<PathBuf> {
        self.paths.report_path.clone()
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SyncomposeConfig::default();
        assert_eq!(config.compose.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.compose.variant, "Everything");
        assert_eq!(config.compose.arch, "x86_64");
        assert_eq!(config.compose.max_retries, 3);
        assert!(config.report_path().is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SyncomposeConfig::from_toml(
            r#"
            [compose]
            arch = "aarch64"

            [paths]
            log_dir = "/var/log/syn-compose"
            "#,
        )
        .unwrap();
        assert_eq!(config.compose.arch, "aarch64");
        assert_eq!(config.compose.variant, "Everything");
        assert_eq!(config.log_dir(), PathBuf::from("/var/log/syn-compose"));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let err = SyncomposeConfig::from_toml("[compose]\nmirror = \"x\"\n").unwrap_err();
        assert!(matches!(err, SyncomposeError::Config(_)));
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let err =
            SyncomposeConfig::from_toml("[compose]\nbase_url = \"ftp://example.org\"\n").unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[compose]\ntimeout = 5").unwrap();
        let config = SyncomposeConfig::load_from_optional_path(Some(file.path())).unwrap();
        assert_eq!(config.compose.timeout, 5);
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let err = SyncomposeConfig::load_from_optional_path(Some(&missing)).unwrap_err();
        assert!(matches!(err, SyncomposeError::Config(_)));
    }
}
