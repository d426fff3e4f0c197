/*============================================================
  Synavera Project: Syn-Syu
  Module: syncompose_core::vercmp
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Order RPM version and release strings the way rpmvercmp
    does, without shelling out to a comparison binary.

  Security / Safety Notes:
    Pure string handling; no I/O performed in this module.

  Dependencies:
    None beyond std.

  Operational Scope:
    Used by the classifier to pair leftover versions of one
    package in true version order.

  Revision History:
    2025-11-19 COD  Replaced textual version ordering with
                    segment-wise rpmvercmp ordering.
============================================================*/

use std::cmp::Ordering;

fn is_separator(c: char) -> bool {
    !c.is_ascii_alphanumeric() && c != '~' && c != '^'
}

/// Split `s` at the end of its leading digit or letter run.
fn leading_segment(s: &str, numeric: bool) -> (&str, &str) {
    let end = s
        .find(|c: char| {
            if numeric {
                !c.is_ascii_digit()
            } else {
                !c.is_ascii_alphabetic()
            }
        })
        .unwrap_or(s.len());
    s.split_at(end)
}

/// Compare two version (or release) strings segment by segment.
///
/// Numeric segments compare numerically and beat alphabetic ones, `~` sorts
/// before everything including the end of the string, and `^` sorts after
/// the end of the string but before any further segment.
pub fn rpmvercmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let (mut one, mut two) = (a, b);
    loop {
        one = one.trim_start_matches(is_separator);
        two = two.trim_start_matches(is_separator);

        if one.starts_with('~') || two.starts_with('~') {
            if !one.starts_with('~') {
                return Ordering::Greater;
            }
            if !two.starts_with('~') {
                return Ordering::Less;
            }
            one = &one[1..];
            two = &two[1..];
            continue;
        }

        if one.starts_with('^') || two.starts_with('^') {
            if one.is_empty() {
                return Ordering::Less;
            }
            if two.is_empty() {
                return Ordering::Greater;
            }
            if !one.starts_with('^') {
                return Ordering::Greater;
            }
            if !two.starts_with('^') {
                return Ordering::Less;
            }
            one = &one[1..];
            two = &two[1..];
            continue;
        }

        if one.is_empty() || two.is_empty() {
            break;
        }

        let numeric = one.starts_with(|c: char| c.is_ascii_digit());
        let (seg_one, rest_one) = leading_segment(one, numeric);
        let (seg_two, rest_two) = leading_segment(two, numeric);

        // Segments of different kinds: numbers are newer.
        if seg_two.is_empty() {
            return if numeric {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }

        let ordering = if numeric {
            let seg_one = seg_one.trim_start_matches('0');
            let seg_two = seg_two.trim_start_matches('0');
            seg_one
                .len()
                .cmp(&seg_two.len())
                .then_with(|| seg_one.cmp(seg_two))
        } else {
            seg_one.cmp(seg_two)
        };
        if ordering != Ordering::Equal {
            return ordering;
        }

        one = rest_one;
        two = rest_two;
    }

    match (one.is_empty(), two.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, _) => Ordering::Greater,
    }
}

/// Split an optional `N:` epoch off a version; a missing epoch is zero.
pub fn split_epoch(version: &str) -> (u64, &str) {
    match version.split_once(':') {
        Some((epoch, rest)) => (epoch.parse().unwrap_or(0), rest),
        None => (0, version),
    }
}

/// Compare `epoch:version` then release.
pub fn compare_evr(version_a: &str, release_a: &str, version_b: &str, release_b: &str) -> Ordering {
    let (epoch_a, version_a) = split_epoch(version_a);
    let (epoch_b, version_b) = split_epoch(version_b);
    epoch_a
        .cmp(&epoch_b)
        .then_with(|| rpmvercmp(version_a, version_b))
        .then_with(|| rpmvercmp(release_a, release_b))
}
