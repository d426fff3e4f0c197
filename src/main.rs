/*============================================================
  Synavera Project: Syn-Syu
  Module: syncompose_core (binary)
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Entry point for Syn-Compose. Tracks package-set changes
    between Rawhide composes and reports how many composes
    landed per day.

  Security / Safety Notes:
    Operates within user privileges. Performs HTTPS GET requests
    and writes only to operator-chosen log and report paths.

  Dependencies:
    clap for CLI parsing, chrono for timestamps, tokio runtime.

  Operational Scope:
    Invoked by operators or the Syn-Syu orchestrator to review
    what a new compose changed before syncing against it.

  Revision History:
    2025-11-12 COD  Authored Syn-Compose runtime.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Result-first error handling with deterministic exits
    - Structured logging following Synavera cadence
    - Configurable execution via CLI and config file
============================================================*/

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{Local, Utc};
use clap::{Parser, Subcommand};

use syncompose_core::classify::classify;
use syncompose_core::compose_index::{date_days_before, ComposeIndex};
use syncompose_core::config::SyncomposeConfig;
use syncompose_core::error::{Result, SyncomposeError};
use syncompose_core::fetch::{extract_packages, load_manifest_file, ComposeClient};
use syncompose_core::logger::Logger;
use syncompose_core::package_set::PackageSet;
use syncompose_core::report::{write_report, DiffReport, ReportFormat};

/// Command-line arguments for Syn-Compose.
#[derive(Debug, Parser)]
#[command(
    name = "Syn-Compose",
    version,
    author = "Synavera Systems",
    about = "Package-set change tracker for Rawhide composes"
)]
struct Cli {
    /// Override configuration file path.
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Explicit log file path.
    #[arg(long, value_name = "PATH", global = true)]
    log: Option<PathBuf>,
    /// Enable verbose logging to stderr.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compare the package sets of two composes.
    Diff {
        /// Initial compose id; defaults to the second most recent compose.
        initial: Option<String>,
        /// Final compose id; defaults to the most recent compose.
        #[arg(value_name = "FINAL")]
        final_id: Option<String>,
        /// Read the initial manifest from a local rpms.json.
        #[arg(long, value_name = "PATH")]
        initial_file: Option<PathBuf>,
        /// Read the final manifest from a local rpms.json.
        #[arg(long, value_name = "PATH")]
        final_file: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "text")]
        format: ReportFormat,
        /// Write the report here instead of stdout.
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Print how many composes landed on each date.
    Composes,
    /// Count composes in the last DAYS days.
    Last { days: u32 },
    /// Print the date DAYS days before today.
    Calc { days: u32 },
}

/// Where one side of a comparison comes from.
enum ManifestSource {
    Compose(String),
    File(PathBuf),
}

impl ManifestSource {
    fn label(&self) -> String {
        match self {
            ManifestSource::Compose(id) => id.clone(),
            ManifestSource::File(path) => path.display().to_string(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("[Syn-Compose] {}", err);
            err.exit_code()
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    // `calc` is pure date arithmetic; it needs neither config nor logger.
    if let Command::Calc { days } = cli.command {
        let date = date_days_before(Local::now().date_naive(), days)?;
        println!(
            "The date {days} days before today is: {}",
            date.format("%Y-%m-%d")
        );
        return Ok(ExitCode::SUCCESS);
    }

    let config = SyncomposeConfig::load_from_optional_path(cli.config.as_deref())?;

    let session_stamp = Utc::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    let log_path = cli
        .log
        .clone()
        .unwrap_or_else(|| config.log_dir().join(format!("compose_{session_stamp}.log")));
    let logger = Logger::new(Some(log_path), cli.verbose)?;
    logger.info("INIT", "Syn-Compose awakening.");

    let client = ComposeClient::new(&config.compose)?;

    let outcome = match cli.command {
        Command::Diff {
            initial,
            final_id,
            initial_file,
            final_file,
            format,
            output,
        } => {
            let output = output.or_else(|| config.report_path());
            async {
                let (before, after) =
                    resolve_sources(&client, initial, final_id, initial_file, final_file, &logger)
                        .await?;
                run_diff(&client, &config, &before, &after, format, output.as_deref(), &logger)
                    .await
            }
            .await
        }
        Command::Composes => run_composes(&client, &logger).await,
        Command::Last { days } => run_last(&client, days, &logger).await,
        Command::Calc { .. } => Ok(()),
    };

    if let Err(err) = &outcome {
        logger.error("FAILED", err.to_string());
    } else {
        logger.info("COMPLETE", "Consciousness synchronised.");
    }
    logger.finalize()?;
    outcome.map(|_| ExitCode::SUCCESS)
}

async fn resolve_sources(
    client: &ComposeClient,
    initial: Option<String>,
    final_id: Option<String>,
    initial_file: Option<PathBuf>,
    final_file: Option<PathBuf>,
    logger: &Logger,
) -> Result<(ManifestSource, ManifestSource)> {
    let mut before = initial_file
        .map(ManifestSource::File)
        .or_else(|| initial.map(ManifestSource::Compose));
    let mut after = final_file
        .map(ManifestSource::File)
        .or_else(|| final_id.map(ManifestSource::Compose));

    if before.is_none() || after.is_none() {
        let index = load_index(client, logger).await?;
        let (previous, latest) = index.latest_pair().ok_or_else(|| {
            SyncomposeError::Runtime(
                "Compose listing holds fewer than two composes; pass compose ids explicitly"
                    .into(),
            )
        })?;
        logger.info(
            "DEFAULT",
            format!("Defaulting to latest composes {previous} → {latest}"),
        );
        if after.is_none() {
            after = Some(ManifestSource::Compose(latest.to_string()));
        }
        if before.is_none() {
            before = Some(ManifestSource::Compose(previous.to_string()));
        }
    }

    match (before, after) {
        (Some(before), Some(after)) => Ok((before, after)),
        _ => Err(SyncomposeError::Runtime("Unable to resolve diff inputs".into())),
    }
}

async fn load_package_set(
    client: &ComposeClient,
    config: &SyncomposeConfig,
    source: &ManifestSource,
    logger: &Logger,
) -> Result<PackageSet> {
    let manifest = match source {
        ManifestSource::Compose(id) => {
            logger.info("FETCH", format!("Fetching manifest for {id}"));
            client.fetch_manifest(id).await?
        }
        ManifestSource::File(path) => {
            logger.info("FETCH", format!("Reading manifest {}", path.display()));
            load_manifest_file(path)?
        }
    };
    let packages = extract_packages(&manifest, &config.compose.variant, &config.compose.arch)?;
    let set = PackageSet::from_identifiers(&packages);

    for rejected in set.rejected() {
        logger.warn(
            "NEVRA",
            format!("{}: skipping {}", source.label(), rejected.error),
        );
    }
    if set.is_empty() {
        logger.warn(
            "EMPTY",
            format!("{} lists no usable packages", source.label()),
        );
    }
    logger.info(
        "PACKAGES",
        format!(
            "{}: {} packages ({} rejected)",
            source.label(),
            set.len(),
            set.rejected().len()
        ),
    );
    Ok(set)
}

async fn run_diff(
    client: &ComposeClient,
    config: &SyncomposeConfig,
    before: &ManifestSource,
    after: &ManifestSource,
    format: ReportFormat,
    output: Option<&Path>,
    logger: &Logger,
) -> Result<()> {
    let (initial, final_set) = tokio::try_join!(
        load_package_set(client, config, before, logger),
        load_package_set(client, config, after, logger),
    )?;

    let classification = classify(&initial, &final_set);
    for update in &classification.updated {
        logger.debug(
            "UPDATED",
            format!("{}.{} {} → {}", update.name, update.arch, update.old, update.new),
        );
    }
    let summary = classification.summary();
    logger.info(
        "SUMMARY",
        format!(
            "removed={} added={} updated={} unchanged={} rejected={}",
            summary.removed, summary.added, summary.updated, summary.unchanged, summary.rejected
        ),
    );

    let rendered =
        DiffReport::new(&before.label(), &after.label(), &classification).render(format)?;
    match output {
        Some(path) => {
            write_report(&rendered, path)?;
            logger.info("REPORT", format!("Report written to {}", path.display()));
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

async fn load_index(client: &ComposeClient, logger: &Logger) -> Result<ComposeIndex> {
    let listing = client.fetch_listing().await?;
    let index = ComposeIndex::from_listing(&listing);
    logger.info("INDEX", format!("Discovered {} composes", index.len()));
    if let Some(latest) = index.latest() {
        logger.debug(
            "INDEX",
            format!(
                "Latest {} ({} type={} respin={})",
                latest,
                latest.product(),
                latest.kind(),
                latest.respin()
            ),
        );
    }
    Ok(index)
}

async fn run_composes(client: &ComposeClient, logger: &Logger) -> Result<()> {
    let index = load_index(client, logger).await?;
    if index.is_empty() {
        logger.warn("EMPTY", "Compose listing contained no compose ids");
    }
    for (date, count) in index.counts_by_date() {
        println!("{}  {count}", date.format("%Y-%m-%d"));
    }
    Ok(())
}

async fn run_last(client: &ComposeClient, days: u32, logger: &Logger) -> Result<()> {
    let since = date_days_before(Local::now().date_naive(), days)?;
    let index = load_index(client, logger).await?;
    let count = index.count_since(since);
    println!(
        "→ {count} composes since {} (last {days} days)",
        since.format("%Y-%m-%d")
    );
    Ok(())
}
