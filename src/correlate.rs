/*============================================================
  Synavera Project: Syn-Syu
  Module: syncompose_core::correlate
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Split the base names of two package sets into removed,
    added and common groups.

  Security / Safety Notes:
    Pure computation; no I/O performed in this module.

  Dependencies:
    None beyond std.

  Operational Scope:
    First stage of the classifier.

  Revision History:
    2025-11-12 COD  Authored base-name correlator.
============================================================*/

use std::collections::BTreeSet;

use crate::package_set::PackageSet;

/// Base names grouped by which side of a comparison they appear on.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Correlation {
    pub removed_names: BTreeSet<String>,
    pub added_names: BTreeSet<String>,
    pub common_names: BTreeSet<String>,
}

/// Correlate two sets by base name.
pub fn correlate(initial: &PackageSet, final_set: &PackageSet) -> Correlation {
    let before = initial.base_names();
    let after = final_set.base_names();

    Correlation {
        removed_names: before.difference(&after).map(|n| n.to_string()).collect(),
        added_names: after.difference(&before).map(|n| n.to_string()).collect(),
        common_names: before.intersection(&after).map(|n| n.to_string()).collect(),
    }
}
