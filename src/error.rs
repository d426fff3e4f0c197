/*============================================================
  Synavera Project: Syn-Syu
  Module: syncompose_core::error
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Centralise Syn-Compose error types so parsing, fetching and
    reporting share one diagnostic vocabulary and exit semantics.

  Security / Safety Notes:
    Error contexts name compose identifiers and local paths
    only; no response bodies are echoed back.

  Dependencies:
    thiserror for ergonomic error definitions.

  Operational Scope:
    Used across modules to propagate recoverable failures and
    consolidate exit codes for the binary entry point.

  Revision History:
    2025-11-12 COD  Split identifier and manifest failures out of
                    the generic serialization domain.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit error taxonomy with actionable context
    - No silent failure paths
    - Stable exit codes for operational tooling
============================================================*/

use std::io;
use std::process::ExitCode;

use thiserror::Error;

/// Result alias for Syn-Compose operations.
pub type Result<T> = std::result::Result<T, SyncomposeError>;

/// Enumerates high-level error domains surfaced by Syn-Compose.
#[derive(Debug, Error)]
pub enum SyncomposeError {
    #[error("Malformed package identifier `{identifier}`: {reason}")]
    MalformedIdentifier { identifier: String, reason: String },
    #[error("Invalid compose id `{0}`")]
    InvalidComposeId(String),
    #[error("Manifest: {0}")]
    Manifest(String),
    #[error("Configuration: {0}")]
    Config(String),
    #[error("Network: {0}")]
    Network(String),
    #[error("Serialization: {0}")]
    Serialization(String),
    #[error("Filesystem: {0}")]
    Filesystem(String),
    #[error("Runtime: {0}")]
    Runtime(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl SyncomposeError {
    pub(crate) fn malformed(identifier: &str, reason: impl Into<String>) -> Self {
        SyncomposeError::MalformedIdentifier {
            identifier: identifier.to_string(),
            reason: reason.into(),
        }
    }

    /// Map error category to a deterministic exit code.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            SyncomposeError::MalformedIdentifier { .. } => ExitCode::from(12),
            SyncomposeError::InvalidComposeId(_) => ExitCode::from(13),
            SyncomposeError::Manifest(_) => ExitCode::from(14),
            SyncomposeError::Config(_) => ExitCode::from(20),
            SyncomposeError::Network(_) => ExitCode::from(30),
            SyncomposeError::Serialization(_) => ExitCode::from(31),
            SyncomposeError::Filesystem(_) => ExitCode::from(40),
            SyncomposeError::Runtime(_) => ExitCode::from(50),
            SyncomposeError::Io(_) => ExitCode::from(41),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_names_identifier() {
        let err = SyncomposeError::malformed("foo", "missing version");
        assert_eq!(
            err.to_string(),
            "Malformed package identifier `foo`: missing version"
        );
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes: Vec<String> = [
            SyncomposeError::malformed("x", "y"),
            SyncomposeError::InvalidComposeId("x".into()),
            SyncomposeError::Manifest("x".into()),
            SyncomposeError::Config("x".into()),
            SyncomposeError::Network("x".into()),
        ]
        .iter()
        .map(|err| format!("{:?}", err.exit_code()))
        .collect();
        for (idx, code) in codes.iter().enumerate() {
            for other in codes.iter().skip(idx + 1) {
                assert_ne!(code, other);
            }
        }
    }
}
