/*============================================================
  Synavera Project: Syn-Syu
  Module: syncompose_core::package_set
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Hold one compose manifest's package listing, parsed once and
    indexed by base name for direct lookup.

  Security / Safety Notes:
    Pure data container; no I/O performed in this module.

  Dependencies:
    None beyond std.

  Operational Scope:
    Built once per manifest and handed to the correlator and
    classifier by shared reference.

  Revision History:
    2025-11-12 COD  Introduced base-name index for package sets.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Immutable after construction
    - Deterministic ordering for reproducible reports
============================================================*/

use std::collections::{BTreeMap, BTreeSet};

use crate::error::SyncomposeError;
use crate::nevra::PackageIdentifier;

/// An identifier that failed to parse, kept so callers can warn about it.
#[derive(Debug)]
pub struct RejectedIdentifier {
    pub identifier: String,
    pub error: SyncomposeError,
}

/// Distinct package identifiers from a single manifest.
#[derive(Debug, Default)]
pub struct PackageSet {
    by_name: BTreeMap<String, Vec<PackageIdentifier>>,
    rejected: Vec<RejectedIdentifier>,
    len: usize,
}

impl PackageSet {
    /// Build a set from raw manifest entries.
    ///
    /// Identical strings collapse; differently versioned entries sharing a
    /// base name are all retained. Malformed entries are set aside rather
    /// than aborting the build.
    pub fn from_identifiers<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: BTreeSet<String> = identifiers
            .into_iter()
            .map(|raw| raw.as_ref().trim().to_string())
            .collect();

        let mut set = PackageSet::default();
        for raw in unique {
            match PackageIdentifier::parse(&raw) {
                Ok(id) => {
                    set.by_name
                        .entry(id.base_name().to_string())
                        .or_default()
                        .push(id);
                    set.len += 1;
                }
                Err(error) => set.rejected.push(RejectedIdentifier {
                    identifier: raw,
                    error,
                }),
            }
        }
        for entries in set.by_name.values_mut() {
            entries.sort();
        }
        set
    }

    /// Number of well-formed members.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn base_names(&self) -> BTreeSet<&str> {
        self.by_name.keys().map(String::as_str).collect()
    }

    /// All members sharing `base_name`, sorted.
    pub fn get(&self, base_name: &str) -> &[PackageIdentifier] {
        self.by_name
            .get(base_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn rejected(&self) -> &[RejectedIdentifier] {
        &self.rejected
    }
}
