/*============================================================
  Synavera Project: Syn-Syu
  Module: syncompose_core::compose_index
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Read the compose directory listing, recover the compose ids
    it links to and count how many composes landed per day.

  Security / Safety Notes:
    Parses untrusted HTML with a fixed regular expression; only
    link targets matching the compose id grammar are retained.

  Dependencies:
    regex for link extraction, chrono for calendar dates.

  Operational Scope:
    Feeds the `composes`, `last` and default `diff` commands.

  Revision History:
    2025-11-12 COD  Replaced load-time counters with an index
                    value built per invocation.
  ------------------------------------------------------------
  SSE Principles Observed:
    - No ambient state; results are returned as plain values
    - Deterministic ordering for reproducible output
============================================================*/

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::LazyLock;

use chrono::{Days, NaiveDate};
use regex::Regex;

use crate::error::{Result, SyncomposeError};

static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)href\s*=\s*"([^"]*)""#).unwrap());

static COMPOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<product>[A-Za-z0-9_.]+(?:-[A-Za-z0-9_.]+)*)-(?P<date>\d{8})\.(?P<kind>[a-z]+)\.(?P<respin>\d+)/?$",
    )
    .unwrap()
});

/// Identifier of one compose, e.g. `Fedora-Rawhide-20250101.n.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComposeId {
    id: String,
    product: String,
    date: NaiveDate,
    kind: String,
    respin: u32,
}

impl ComposeId {
    /// Parse a compose id, tolerating the trailing `/` of directory links.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let captures = COMPOSE_RE
            .captures(trimmed)
            .ok_or_else(|| SyncomposeError::InvalidComposeId(raw.to_string()))?;

        let date = NaiveDate::parse_from_str(&captures["date"], "%Y%m%d")
            .map_err(|_| SyncomposeError::InvalidComposeId(raw.to_string()))?;
        let respin = captures["respin"]
            .parse()
            .map_err(|_| SyncomposeError::InvalidComposeId(raw.to_string()))?;

        Ok(Self {
            id: trimmed.trim_end_matches('/').to_string(),
            product: captures["product"].to_string(),
            date,
            kind: captures["kind"].to_string(),
            respin,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Compose type marker (`n` for nightly, `t` for test).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn respin(&self) -> u32 {
        self.respin
    }
}

impl fmt::Display for ComposeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl PartialOrd for ComposeId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ComposeId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.date, self.respin, &self.product, &self.kind).cmp(&(
            other.date,
            other.respin,
            &other.product,
            &other.kind,
        ))
    }
}

/// Composes discovered in a directory listing, oldest first.
#[derive(Debug, Default, Clone)]
pub struct ComposeIndex {
    composes: Vec<ComposeId>,
}

impl ComposeIndex {
    /// Build an index from the HTML of a compose directory listing.
    ///
    /// Sort links (`?C=M;O=A`), absolute links, parent links and aliases such
    /// as `latest-Fedora-Rawhide/` are ignored.
    pub fn from_listing(html: &str) -> Self {
        let composes: BTreeSet<ComposeId> = HREF_RE
            .captures_iter(html)
            .map(|captures| captures[1].to_string())
            .filter(|href| !href.starts_with('?') && !href.starts_with('/'))
            .filter_map(|href| ComposeId::parse(&href).ok())
            .collect();
        Self {
            composes: composes.into_iter().collect(),
        }
    }

    pub fn composes(&self) -> &[ComposeId] {
        &self.composes
    }

    pub fn len(&self) -> usize {
        self.composes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.composes.is_empty()
    }

    pub fn latest(&self) -> Option<&ComposeId> {
        self.composes.last()
    }

    /// The two most recent composes as `(previous, latest)`.
    pub fn latest_pair(&self) -> Option<(&ComposeId, &ComposeId)> {
        match self.composes.as_slice() {
            [.., previous, latest] => Some((previous, latest)),
            _ => None,
        }
    }

    /// Number of composes per calendar date.
    pub fn counts_by_date(&self) -> BTreeMap<NaiveDate, usize> {
        let mut counts = BTreeMap::new();
        for compose in &self.composes {
            *counts.entry(compose.date()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of composes dated on or after `since`.
    pub fn count_since(&self, since: NaiveDate) -> usize {
        self.composes
            .iter()
            .filter(|compose| compose.date() >= since)
            .count()
    }
}

/// The calendar date `days` days before `today`.
pub fn date_days_before(today: NaiveDate, days: u32) -> Result<NaiveDate> {
    today
        .checked_sub_days(Days::new(u64::from(days)))
        .ok_or_else(|| {
            SyncomposeError::Runtime(format!(
                "{days} days before {today} is outside the supported calendar range"
            ))
        })
}
