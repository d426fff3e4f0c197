/*============================================================
  Synavera Project: Syn-Syu
  Module: syncompose_core::fetch
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Retrieve the compose directory listing and per-compose
    package manifests, from the compose server or local files.

  Security / Safety Notes:
    Performs read-only HTTPS GET requests against the configured
    compose host. No credentials are transmitted.

  Dependencies:
    reqwest for HTTP, serde_json for manifest decoding,
    urlencoding for path segments.

  Operational Scope:
    Runs before the classifier; every failure here is surfaced
    as a Network, Serialization or Manifest error so the core
    never sees partial manifests.

  Revision History:
    2025-11-12 COD  Adapted the retrying HTTP client to compose
                    listings and rpms.json manifests.
    2025-11-19 COD  Report exhausted retries as attempts made.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Retry with exponential backoff on non-success statuses
    - Structured response parsing with explicit error paths
============================================================*/

use std::path::Path;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use tokio::time::sleep;
use urlencoding::encode;

use crate::config::ComposeConfig;
use crate::error::{Result, SyncomposeError};

const MANIFEST_PATH: &str = "compose/metadata/rpms.json";

/// Client for the compose server.
#[derive(Clone)]
pub struct ComposeClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: usize,
}

impl ComposeClient {
    /// Construct a new client from configuration.
    pub fn new(config: &ComposeConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(concat!("Syn-Compose/", env!("CARGO_PKG_VERSION"), " (linux)"))
            .build()
            .map_err(|err| {
                SyncomposeError::Network(format!("Failed to build HTTP client: {err}"))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries.max(1),
        })
    }

    /// Fetch the HTML directory listing of all composes.
    pub async fn fetch_listing(&self) -> Result<String> {
        let url = format!("{}/", self.base_url);
        let response = self.get_with_retry(&url).await?;
        response.text().await.map_err(|err| {
            SyncomposeError::Network(format!("Failed to read listing body from {url}: {err}"))
        })
    }

    /// Fetch and decode the `rpms.json` manifest of one compose.
    pub async fn fetch_manifest(&self, compose_id: &str) -> Result<Value> {
        let url = self.manifest_url(compose_id);
        let response = self.get_with_retry(&url).await?;
        response.json::<Value>().await.map_err(|err| {
            SyncomposeError::Serialization(format!("Failed to decode manifest {url}: {err}"))
        })
    }

    fn manifest_url(&self, compose_id: &str) -> String {
        format!(
            "{}/{}/{MANIFEST_PATH}",
            self.base_url,
            encode(compose_id.trim_end_matches('/'))
        )
    }

    async fn get_with_retry(&self, url: &str) -> Result<reqwest::Response> {
        let mut attempt = 0;
        loop {
            let response = self.client.get(url).send().await.map_err(|err| {
                SyncomposeError::Network(format!("Request to {url} failed: {err}"))
            })?;

            let status = response.status();
            if status == StatusCode::OK {
                return Ok(response);
            }
            if status == StatusCode::NOT_FOUND {
                return Err(SyncomposeError::Network(format!("{url} not found (404)")));
            }

            attempt += 1;
            if attempt >= self.max_retries {
                return Err(retries_exhausted(url, status, attempt));
            }
            sleep(backoff(attempt)).await;
        }
    }
}

fn retries_exhausted(url: &str, status: StatusCode, attempts: usize) -> SyncomposeError {
    SyncomposeError::Network(format!(
        "Request {url} failed with status {status} after {attempts} attempts"
    ))
}

fn backoff(attempt: usize) -> Duration {
    let exponent = (attempt as u32).min(8);
    Duration::from_millis(200_u64.saturating_mul(1_u64 << exponent))
}

/// Read and decode a local `rpms.json` manifest.
pub fn load_manifest_file(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path).map_err(|err| {
        SyncomposeError::Filesystem(format!(
            "Failed to read manifest {}: {err}",
            path.display()
        ))
    })?;
    serde_json::from_str(&raw).map_err(|err| {
        SyncomposeError::Serialization(format!(
            "Failed to decode manifest {}: {err}",
            path.display()
        ))
    })
}

/// Extract the flat package list at `payload → rpms → <variant> → <arch>`.
///
/// Compose manifests key packages by source NEVRA in an object; simpler
/// exports carry a plain array of identifier strings. Both are accepted.
pub fn extract_packages(manifest: &Value, variant: &str, arch: &str) -> Result<Vec<String>> {
    let mut node = manifest;
    for key in ["payload", "rpms", variant, arch] {
        node = node.get(key).ok_or_else(|| {
            SyncomposeError::Manifest(format!(
                "missing `{key}` in payload.rpms.{variant}.{arch}"
            ))
        })?;
    }

    match node {
        Value::Object(entries) => Ok(entries.keys().cloned().collect()),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    SyncomposeError::Manifest(format!(
                        "non-string package entry under payload.rpms.{variant}.{arch}: {item}"
                    ))
                })
            })
            .collect(),
        other => Err(SyncomposeError::Manifest(format!(
            "payload.rpms.{variant}.{arch} is neither an object nor an array: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_extract_object_keys() {
        let manifest = json!({
            "payload": {
                "rpms": {
                    "Everything": {
                        "x86_64": {
                            "glibc-0:2.40.9000-24.fc42.src": {
                                "glibc-0:2.40.9000-24.fc42.x86_64": {"category": "binary"}
                            },
                            "bash-0:5.2.37-1.fc42.src": {}
                        }
                    }
                }
            }
        });
        let mut packages = extract_packages(&manifest, "Everything", "x86_64").unwrap();
        packages.sort();
        assert_eq!(
            packages,
            vec!["bash-0:5.2.37-1.fc42.src", "glibc-0:2.40.9000-24.fc42.src"]
        );
    }

    #[test]
    fn test_extract_array() {
        let manifest = json!({
            "payload": {"rpms": {"Everything": {"x86_64": [
                "foo-1.0-1.fc41.x86_64",
                "bar-2.0-1.fc41.noarch"
            ]}}}
        });
        let packages = extract_packages(&manifest, "Everything", "x86_64").unwrap();
        assert_eq!(packages, vec!["foo-1.0-1.fc41.x86_64", "bar-2.0-1.fc41.noarch"]);
    }

    #[test]
    fn test_extract_missing_path() {
        let manifest = json!({"payload": {"rpms": {"Everything": {}}}});
        let err = extract_packages(&manifest, "Everything", "aarch64").unwrap_err();
        assert!(matches!(err, SyncomposeError::Manifest(_)));
        assert!(err.to_string().contains("aarch64"));
    }

    #[test]
    fn test_extract_rejects_non_string_entries() {
        let manifest = json!({"payload": {"rpms": {"Everything": {"x86_64": [1, 2]}}}});
        assert!(extract_packages(&manifest, "Everything", "x86_64").is_err());
    }

    #[test]
    fn test_load_manifest_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"payload": {{"rpms": {{"Everything": {{"x86_64": ["foo-1.0-1.fc41.x86_64"]}}}}}}}}"#
        )
        .unwrap();
        let manifest = load_manifest_file(file.path()).unwrap();
        let packages = extract_packages(&manifest, "Everything", "x86_64").unwrap();
        assert_eq!(packages, vec!["foo-1.0-1.fc41.x86_64"]);
    }

    #[test]
    fn test_load_manifest_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = load_manifest_file(&dir.path().join("rpms.json")).unwrap_err();
        assert!(matches!(missing, SyncomposeError::Filesystem(_)));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let invalid = load_manifest_file(file.path()).unwrap_err();
        assert!(matches!(invalid, SyncomposeError::Serialization(_)));
    }

    #[test]
    fn test_manifest_url() {
        let client = ComposeClient::new(&ComposeConfig::default()).unwrap();
        assert_eq!(
            client.manifest_url("Fedora-Rawhide-20250101.n.0/"),
            "https://kojipkgs.fedoraproject.org/compose/rawhide/Fedora-Rawhide-20250101.n.0/compose/metadata/rpms.json"
        );
    }

    #[test]
    fn test_retries_exhausted_counts_attempts() {
        let err = retries_exhausted(
            "https://example.invalid/",
            StatusCode::SERVICE_UNAVAILABLE,
            3,
        );
        assert!(matches!(err, SyncomposeError::Network(_)));
        assert!(err.to_string().contains("after 3 attempts"));
    }

    #[test]
    fn test_backoff_grows() {
        assert_eq!(backoff(1), Duration::from_millis(400));
        assert_eq!(backoff(2), Duration::from_millis(800));
        assert_eq!(backoff(20), backoff(8));
    }
}
