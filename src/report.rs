/*============================================================
  Synavera Project: Syn-Syu
  Module: syncompose_core::report
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Render compose classifications as REMOVED/ADDED/UPDATED
    text or as a JSON document for downstream tooling.

  Security / Safety Notes:
    Reports are written to operator-controlled paths; no
    privileged operations are performed.

  Dependencies:
    serde + serde_json for JSON output, chrono for stamps.

  Operational Scope:
    Final stage of the `diff` command.

  Revision History:
    2025-11-12 COD  Reworked the manifest writer into the diff
                    reporter.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Deterministic ordering for reproducible reports
    - Rich metadata for audit and observability
============================================================*/

use std::fmt::Write as _;
use std::fs::File;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use clap::ValueEnum;
use serde::Serialize;

use crate::classify::{Classification, ClassificationSummary};
use crate::error::{Result, SyncomposeError};

/// Output encoding for diff reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

/// JSON document wrapping a classification.
#[derive(Debug, Serialize)]
pub struct DiffReport<'a> {
    pub metadata: ReportMetadata,
    #[serde(flatten)]
    pub classification: &'a Classification,
}

/// Metadata block describing the comparison.
#[derive(Debug, Serialize)]
pub struct ReportMetadata {
    pub generated_at: String,
    pub generated_by: String,
    pub initial: String,
    #[serde(rename = "final")]
    pub final_label: String,
    pub summary: ClassificationSummary,
}

impl<'a> DiffReport<'a> {
    pub fn new(initial: &str, final_label: &str, classification: &'a Classification) -> Self {
        Self {
            metadata: ReportMetadata {
                generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                generated_by: "syncompose_core".to_string(),
                initial: initial.to_string(),
                final_label: final_label.to_string(),
                summary: classification.summary(),
            },
            classification,
        }
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(render_text(self.classification)),
            ReportFormat::Json => serde_json::to_string_pretty(self).map_err(|err| {
                SyncomposeError::Serialization(format!("Failed to encode report: {err}"))
            }),
        }
    }
}

/// Human-readable report, one line per record plus a summary line.
pub fn render_text(classification: &Classification) -> String {
    let mut out = String::new();
    for record in &classification.removed {
        let _ = writeln!(out, "REMOVED: {}", record.identifier);
    }
    for record in &classification.added {
        let _ = writeln!(out, "ADDED: {}", record.identifier);
    }
    for record in &classification.updated {
        let _ = writeln!(out, "UPDATED: {} {} -> {}", record.name, record.old, record.new);
    }
    let summary = classification.summary();
    let _ = writeln!(
        out,
        "→ removed={} added={} updated={} unchanged={}",
        summary.removed, summary.added, summary.updated, summary.unchanged
    );
    out
}

/// Persist a rendered report to the given path.
pub fn write_report(contents: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| {
            SyncomposeError::Filesystem(format!(
                "Failed to create report directory {}: {err}",
                parent.display()
            ))
        })?;
    }
    let mut file = File::create(path).map_err(|err| {
        SyncomposeError::Filesystem(format!(
            "Failed to create report file {}: {err}",
            path.display()
        ))
    })?;
    std::io::Write::write_all(&mut file, contents.as_bytes()).map_err(|err| {
        SyncomposeError::Filesystem(format!("Failed to write report {}: {err}", path.display()))
    })
}
