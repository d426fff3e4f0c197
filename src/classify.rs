/*============================================================
  Synavera Project: Syn-Syu
  Module: syncompose_core::classify
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Classify the differences between two compose package sets
    into removed, added and updated records.

  Security / Safety Notes:
    Pure computation; no I/O performed in this module.

  Dependencies:
    serde for report serialization.

  Operational Scope:
    Invoked once per comparison by the `diff` command. Output is
    handed to the reporter untouched.

  Revision History:
    2025-11-12 COD  Authored classifier with per-architecture
                    pairing for shared base names.
    2025-11-19 COD  Pair leftovers in rpmvercmp order.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Deterministic ordering for reproducible reports
    - No arbitrary choice between ambiguous candidates
============================================================*/

use std::collections::BTreeMap;

use serde::Serialize;

use crate::correlate::correlate;
use crate::nevra::PackageIdentifier;
use crate::package_set::PackageSet;

/// A package present on only one side of the comparison.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct PackageRecord {
    pub name: String,
    pub arch: String,
    pub identifier: String,
}

impl From<&PackageIdentifier> for PackageRecord {
    fn from(id: &PackageIdentifier) -> Self {
        Self {
            name: id.base_name().to_string(),
            arch: id.arch().to_string(),
            identifier: id.to_string(),
        }
    }
}

/// A package whose version-release changed between the two sets.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct UpdateRecord {
    pub name: String,
    pub arch: String,
    pub old: String,
    pub new: String,
    pub old_identifier: String,
    pub new_identifier: String,
}

/// Which input a rejected identifier came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Initial,
    Final,
}

/// A manifest entry skipped because it could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRecord {
    pub side: Side,
    pub identifier: String,
    pub reason: String,
}

/// Result of comparing two package sets.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub removed: Vec<PackageRecord>,
    pub added: Vec<PackageRecord>,
    pub updated: Vec<UpdateRecord>,
    /// Matched pairs with identical version-release.
    pub unchanged: usize,
    pub rejected: Vec<RejectedRecord>,
}

/// Per-category counts for logs and report metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassificationSummary {
    pub removed: usize,
    pub added: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub rejected: usize,
}

impl Classification {
    /// True when no package was removed, added or updated.
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty() && self.updated.is_empty()
    }

    pub fn summary(&self) -> ClassificationSummary {
        ClassificationSummary {
            removed: self.removed.len(),
            added: self.added.len(),
            updated: self.updated.len(),
            unchanged: self.unchanged,
            rejected: self.rejected.len(),
        }
    }

    fn record_update(&mut self, old: &PackageIdentifier, new: &PackageIdentifier) {
        let (old_vr, new_vr) = (old.version_release(), new.version_release());
        if old_vr == new_vr {
            self.unchanged += 1;
            return;
        }
        self.updated.push(UpdateRecord {
            name: new.base_name().to_string(),
            arch: new.arch().to_string(),
            old: old_vr,
            new: new_vr,
            old_identifier: old.to_string(),
            new_identifier: new.to_string(),
        });
    }
}

/// Compare `initial` against `final_set`.
pub fn classify(initial: &PackageSet, final_set: &PackageSet) -> Classification {
    let correlation = correlate(initial, final_set);
    let mut result = Classification::default();

    for name in &correlation.removed_names {
        result
            .removed
            .extend(initial.get(name).iter().map(PackageRecord::from));
    }
    for name in &correlation.added_names {
        result
            .added
            .extend(final_set.get(name).iter().map(PackageRecord::from));
    }
    for name in &correlation.common_names {
        reconcile(initial.get(name), final_set.get(name), &mut result);
    }

    for (side, set) in [(Side::Initial, initial), (Side::Final, final_set)] {
        result
            .rejected
            .extend(set.rejected().iter().map(|rejected| RejectedRecord {
                side,
                identifier: rejected.identifier.clone(),
                reason: rejected.error.to_string(),
            }));
    }

    result.removed.sort();
    result.added.sort();
    result.updated.sort();
    result
}

/// Pair the entries of one base name found on both sides.
///
/// Entries pair within their architecture first: identical version-release
/// values match outright, the rest pair in ascending rpmvercmp order.
/// Whatever is left on both sides then pairs across architectures in
/// ascending (arch, rpmvercmp) order. Unpaired entries become removals
/// or additions.
fn reconcile(
    before: &[PackageIdentifier],
    after: &[PackageIdentifier],
    result: &mut Classification,
) {
    let mut by_arch: BTreeMap<&str, (Vec<&PackageIdentifier>, Vec<&PackageIdentifier>)> =
        BTreeMap::new();
    for id in before {
        by_arch.entry(id.arch()).or_default().0.push(id);
    }
    for id in after {
        by_arch.entry(id.arch()).or_default().1.push(id);
    }

    let mut stray_before = Vec::new();
    let mut stray_after = Vec::new();

    for (_, (mut left, mut right)) in by_arch {
        left.retain(|old| {
            let vr = old.version_release();
            match right.iter().position(|new| new.version_release() == vr) {
                Some(idx) => {
                    right.remove(idx);
                    result.unchanged += 1;
                    false
                }
                None => true,
            }
        });

        left.sort_by(|a, b| a.cmp_evr(b).then_with(|| a.cmp(b)));
        right.sort_by(|a, b| a.cmp_evr(b).then_with(|| a.cmp(b)));

        let paired = left.len().min(right.len());
        for (old, new) in left.iter().zip(right.iter()) {
            result.record_update(old, new);
        }
        stray_before.extend(left.into_iter().skip(paired));
        stray_after.extend(right.into_iter().skip(paired));
    }

    let arch_order = |a: &&PackageIdentifier, b: &&PackageIdentifier| {
        a.arch()
            .cmp(b.arch())
            .then_with(|| a.cmp_evr(b))
            .then_with(|| a.cmp(b))
    };
    stray_before.sort_by(arch_order);
    stray_after.sort_by(arch_order);

    let paired = stray_before.len().min(stray_after.len());
    for (old, new) in stray_before.iter().zip(stray_after.iter()) {
        result.record_update(old, new);
    }
    result.removed.extend(
        stray_before
            .into_iter()
            .skip(paired)
            .map(PackageRecord::from),
    );
    result.added.extend(
        stray_after
            .into_iter()
            .skip(paired)
            .map(PackageRecord::from),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> PackageSet {
        PackageSet::from_identifiers(items.iter().copied())
    }

    fn identifiers(records: &[PackageRecord]) -> Vec<&str> {
        records.iter().map(|r| r.identifier.as_str()).collect()
    }

    #[test]
    fn test_identical_sets_have_no_changes() {
        let initial = set(&["foo-1.0-1.fc41.x86_64"]);
        let final_set = set(&["foo-1.0-1.fc41.x86_64"]);

        let result = classify(&initial, &final_set);
        assert!(result.is_empty());
        assert_eq!(result.unchanged, 1);
    }

    #[test]
    fn test_version_bump_is_update() {
        let initial = set(&["foo-1.0-1.fc41.x86_64"]);
        let final_set = set(&["foo-1.1-1.fc41.x86_64"]);

        let result = classify(&initial, &final_set);
        assert!(result.removed.is_empty());
        assert!(result.added.is_empty());
        assert_eq!(result.updated.len(), 1);
        let update = &result.updated[0];
        assert_eq!(update.name, "foo");
        assert_eq!(update.old, "1.0-1");
        assert_eq!(update.new, "1.1-1");
        assert_eq!(update.old_identifier, "foo-1.0-1.fc41.x86_64");
        assert_eq!(update.new_identifier, "foo-1.1-1.fc41.x86_64");
    }

    #[test]
    fn test_different_names_are_removed_and_added() {
        let initial = set(&["foo-1.0-1.fc41.x86_64"]);
        let final_set = set(&["bar-2.0-1.fc41.x86_64"]);

        let result = classify(&initial, &final_set);
        assert_eq!(identifiers(&result.removed), vec!["foo-1.0-1.fc41.x86_64"]);
        assert_eq!(identifiers(&result.added), vec!["bar-2.0-1.fc41.x86_64"]);
        assert!(result.updated.is_empty());
    }

    #[test]
    fn test_empty_initial_adds_everything() {
        let initial = set(&[]);
        let final_set = set(&["foo-1.0-1.fc41.x86_64"]);

        let result = classify(&initial, &final_set);
        assert_eq!(identifiers(&result.added), vec!["foo-1.0-1.fc41.x86_64"]);
        assert!(result.removed.is_empty());
        assert!(result.updated.is_empty());
    }

    #[test]
    fn test_disjoint_sets() {
        let a = ["a-1-1.fc41.x86_64", "b-2-1.fc41.noarch", "b-2-1.fc41.i686"];
        let b = ["c-1-1.fc41.x86_64", "d-0.3-2.fc41.src"];

        let result = classify(&set(&a), &set(&b));
        assert_eq!(
            identifiers(&result.removed),
            vec!["a-1-1.fc41.x86_64", "b-2-1.fc41.i686", "b-2-1.fc41.noarch"]
        );
        assert_eq!(
            identifiers(&result.added),
            vec!["c-1-1.fc41.x86_64", "d-0.3-2.fc41.src"]
        );
        assert!(result.updated.is_empty());
    }

    #[test]
    fn test_self_comparison_is_empty() {
        let items = [
            "foo-1.0-1.fc41.x86_64",
            "foo-1.0-1.fc41.i686",
            "bar-3.2-0.rc1.fc42.noarch",
            "kernel-6.13.0-1.fc42.x86_64",
            "kernel-6.12.9-1.fc42.x86_64",
        ];
        let result = classify(&set(&items), &set(&items));
        assert!(result.is_empty());
        assert_eq!(result.unchanged, items.len());
    }

    #[test]
    fn test_repeated_classification_is_identical() {
        let initial = set(&["foo-1.0-1.fc41.x86_64", "bar-1-1.fc41.noarch", "gone-1-1.fc41.x86_64"]);
        let final_set = set(&["foo-1.2-1.fc41.x86_64", "bar-1-1.fc41.noarch", "new-1-1.fc41.x86_64"]);

        let first = classify(&initial, &final_set);
        let second = classify(&initial, &final_set);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let forward = set(&["b-1-1.fc41.x86_64", "a-1-1.fc41.x86_64", "c-1-1.fc41.x86_64"]);
        let reverse = set(&["c-1-1.fc41.x86_64", "a-1-1.fc41.x86_64", "b-1-1.fc41.x86_64"]);
        let target = set(&["a-2-1.fc41.x86_64", "d-1-1.fc41.x86_64"]);

        assert_eq!(classify(&forward, &target), classify(&reverse, &target));
    }

    #[test]
    fn test_dist_tag_only_change_is_unchanged() {
        let result = classify(
            &set(&["foo-1.0-1.fc41.x86_64"]),
            &set(&["foo-1.0-1.fc42.x86_64"]),
        );
        assert!(result.is_empty());
        assert_eq!(result.unchanged, 1);
    }

    #[test]
    fn test_multi_arch_pairs_by_architecture() {
        let initial = set(&["foo-1.0-1.fc41.x86_64", "foo-1.0-1.fc41.i686"]);
        let final_set = set(&["foo-1.1-1.fc41.x86_64", "foo-1.0-1.fc41.i686"]);

        let result = classify(&initial, &final_set);
        assert_eq!(result.unchanged, 1);
        assert!(result.removed.is_empty());
        assert!(result.added.is_empty());
        assert_eq!(result.updated.len(), 1);
        assert_eq!(result.updated[0].arch, "x86_64");
        assert_eq!(result.updated[0].old, "1.0-1");
        assert_eq!(result.updated[0].new, "1.1-1");
    }

    #[test]
    fn test_dropped_architecture_is_removed() {
        let initial = set(&["foo-1.0-1.fc41.x86_64", "foo-1.0-1.fc41.i686"]);
        let final_set = set(&["foo-1.1-1.fc41.x86_64"]);

        let result = classify(&initial, &final_set);
        assert_eq!(result.updated.len(), 1);
        assert_eq!(result.updated[0].arch, "x86_64");
        assert_eq!(identifiers(&result.removed), vec!["foo-1.0-1.fc41.i686"]);
        assert!(result.added.is_empty());
    }

    #[test]
    fn test_architecture_switch_pairs_leftovers() {
        let initial = set(&["foo-1.0-1.fc41.x86_64"]);
        let final_set = set(&["foo-1.1-1.fc41.noarch"]);

        let result = classify(&initial, &final_set);
        assert!(result.removed.is_empty());
        assert!(result.added.is_empty());
        assert_eq!(result.updated.len(), 1);
        assert_eq!(result.updated[0].arch, "noarch");
        assert_eq!(result.updated[0].old_identifier, "foo-1.0-1.fc41.x86_64");
    }

    #[test]
    fn test_multiple_versions_same_arch() {
        let initial = set(&[
            "kernel-6.12.9-1.fc42.x86_64",
            "kernel-6.13.0-1.fc42.x86_64",
        ]);
        let final_set = set(&[
            "kernel-6.13.0-1.fc42.x86_64",
            "kernel-6.13.1-1.fc42.x86_64",
            "kernel-6.14.0-0.rc1.fc42.x86_64",
        ]);

        let result = classify(&initial, &final_set);
        assert_eq!(result.unchanged, 1);
        assert_eq!(result.updated.len(), 1);
        assert_eq!(result.updated[0].old, "6.12.9-1");
        assert_eq!(result.updated[0].new, "6.13.1-1");
        assert_eq!(
            identifiers(&result.added),
            vec!["kernel-6.14.0-0.rc1.fc42.x86_64"]
        );
        assert!(result.removed.is_empty());
    }

    #[test]
    fn test_leftover_versions_pair_in_version_order() {
        let initial = set(&["foo-1.2-1.fc41.x86_64", "foo-1.9-1.fc41.x86_64"]);
        let final_set = set(&["foo-1.3-1.fc41.x86_64", "foo-1.10-1.fc41.x86_64"]);

        let result = classify(&initial, &final_set);
        let transitions: Vec<(&str, &str)> = result
            .updated
            .iter()
            .map(|u| (u.old.as_str(), u.new.as_str()))
            .collect();
        assert_eq!(transitions, vec![("1.2-1", "1.3-1"), ("1.9-1", "1.10-1")]);
        assert!(result.removed.is_empty());
        assert!(result.added.is_empty());
    }

    #[test]
    fn test_rejected_entries_are_reported_by_side() {
        let initial = set(&["foo-1.0-1.fc41.x86_64", "broken"]);
        let final_set = set(&["foo-1.0-1.fc41.x86_64", "also-broken-1"]);

        let result = classify(&initial, &final_set);
        assert!(result.is_empty());
        assert_eq!(result.rejected.len(), 2);
        assert_eq!(result.rejected[0].side, Side::Initial);
        assert_eq!(result.rejected[0].identifier, "broken");
        assert_eq!(result.rejected[1].side, Side::Final);
        assert_eq!(result.summary().rejected, 2);
    }
}
