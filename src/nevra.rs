/*============================================================
  Synavera Project: Syn-Syu
  Module: syncompose_core::nevra
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Decompose compose manifest entries of the form
    `<name>-<version>-<release>.<dist>.<arch>` into typed parts.

  Security / Safety Notes:
    Pure string handling; no I/O performed in this module.

  Dependencies:
    serde for serializing parsed identifiers into reports.

  Operational Scope:
    Every manifest entry passes through `PackageIdentifier::parse`
    exactly once before correlation.

  Revision History:
    2025-11-12 COD  Replaced positional splitting with an explicit
                    grammar returning typed parse errors.
  ------------------------------------------------------------
  SSE Principles Observed:
    - One parsing convention shared by every call site
    - Explicit rejection of malformed input
============================================================*/

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::error::{Result, SyncomposeError};
use crate::vercmp::compare_evr;

/// A fully versioned package identifier taken from a compose manifest.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PackageIdentifier {
    name: String,
    version: String,
    release: String,
    dist: String,
    arch: String,
}

impl PackageIdentifier {
    /// Parse `<name>-<version>-<release>.<dist>.<arch>`.
    ///
    /// Hyphens are split from the right, so names may contain any number of
    /// hyphens. Dots are split from the right within the release tail, so a
    /// release may itself contain dots (`0.rc1.20250101git.1`).
    pub fn parse(raw: &str) -> Result<Self> {
        let identifier = raw.trim();
        if identifier.is_empty() {
            return Err(SyncomposeError::malformed(raw, "empty identifier"));
        }
        if identifier.chars().any(char::is_whitespace) {
            return Err(SyncomposeError::malformed(raw, "contains whitespace"));
        }

        let mut hyphen_parts = identifier.rsplitn(3, '-');
        let tail = hyphen_parts.next().unwrap_or_default();
        let version = hyphen_parts
            .next()
            .ok_or_else(|| {
                SyncomposeError::malformed(
                    raw,
                    "expected `<name>-<version>-<release>`, found no `-` separator",
                )
            })?;
        let name = hyphen_parts
            .next()
            .ok_or_else(|| {
                SyncomposeError::malformed(
                    raw,
                    "expected `<name>-<version>-<release>`, found only one `-` separator",
                )
            })?;

        let mut dot_parts = tail.rsplitn(3, '.');
        let arch = dot_parts.next().unwrap_or_default();
        let dist = dot_parts
            .next()
            .ok_or_else(|| {
                SyncomposeError::malformed(
                    raw,
                    "expected `<dist>.<arch>` after the release, found no `.` separator",
                )
            })?;
        let release = dot_parts
            .next()
            .ok_or_else(|| {
                SyncomposeError::malformed(
                    raw,
                    "expected `<release>.<dist>.<arch>`, found only one `.` separator",
                )
            })?;

        for (label, value) in [
            ("name", name),
            ("version", version),
            ("release", release),
            ("dist tag", dist),
            ("architecture", arch),
        ] {
            if value.is_empty() {
                return Err(SyncomposeError::malformed(raw, format!("empty {label}")));
            }
        }

        Ok(Self {
            name: name.to_string(),
            version: version.to_string(),
            release: release.to_string(),
            dist: dist.to_string(),
            arch: arch.to_string(),
        })
    }

    pub fn base_name(&self) -> &str {
        &self.name
    }

    /// `version-release` without dist tag or architecture.
    pub fn version_release(&self) -> String {
        format!("{}-{}", self.version, self.release)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn release(&self) -> &str {
        &self.release
    }

    pub fn dist_tag(&self) -> &str {
        &self.dist
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    /// The stripped `dist.arch` suffix.
    pub fn suffix(&self) -> String {
        format!("{}.{}", self.dist, self.arch)
    }

    /// Epoch carried as an `N:` version prefix, if any.
    pub fn epoch(&self) -> Option<u32> {
        let (epoch, _) = self.version.split_once(':')?;
        epoch.parse().ok()
    }

    /// Order by epoch, version and release using rpmvercmp rules.
    pub fn cmp_evr(&self, other: &Self) -> Ordering {
        compare_evr(&self.version, &self.release, &other.version, &other.release)
    }
}

impl fmt::Display for PackageIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}.{}.{}",
            self.name, self.version, self.release, self.dist, self.arch
        )
    }
}
