use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use tscat_core::{
    Catalog, Extraction, MergeReport, PrunePolicy, Skeleton, merge, read_catalog, write_catalog,
};

use crate::config::TscatConfig;
use crate::error::{CliError, Result};

#[derive(Debug, Clone, Args)]
pub struct MergeArgs {
    /// Translated catalog to merge into. Treated as empty if it does not exist.
    #[arg(long)]
    pub existing: PathBuf,

    /// Fresh extraction: a TS file, or a JSON array of extraction tuples (`.json`).
    #[arg(long)]
    pub skeleton: PathBuf,

    /// Where to write the result (default: overwrite --existing).
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Locale of a new catalog; must match an existing one.
    #[arg(long)]
    pub locale: Option<String>,

    /// Prune vanished messages after merging.
    #[arg(long = "drop-vanished")]
    pub drop_vanished: bool,

    /// Print the outcome as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeOutcome {
    pub output: PathBuf,
    pub language: String,
    pub report: MergeReport,
    pub pruned: usize,
}

pub fn run_merge(args: MergeArgs, config: &TscatConfig) -> Result<()> {
    let json = args.json;
    let outcome = merge_files(args, config)?;
    if json {
        let text = serde_json::to_string_pretty(&outcome).map_err(|source| CliError::Json {
            path: outcome.output.clone(),
            source,
        })?;
        println!("{text}");
    } else {
        let r = &outcome.report;
        println!(
            "{} ({}): {} kept, {} added, {} resurrected, {} obsolete, {} vanished, {} pruned",
            outcome.output.display(),
            outcome.language,
            r.kept,
            r.added,
            r.resurrected,
            r.obsoleted,
            r.vanished,
            outcome.pruned
        );
    }
    Ok(())
}

/// Merge, optionally prune, and atomically write the result.
pub fn merge_files(args: MergeArgs, config: &TscatConfig) -> Result<MergeOutcome> {
    let (skeleton, skeleton_locale) = load_skeleton(&args.skeleton)?;
    let existing = load_existing(&args.existing, args.locale.as_deref(), skeleton_locale)?;

    let (mut merged, report) = merge(&existing, &skeleton)?;

    let pruned = if args.drop_vanished || config.merge.drop_vanished {
        merged.prune(PrunePolicy::VANISHED_ONLY)
    } else {
        0
    };

    merged.set_version(config.format_version());
    if merged.source_language().is_none() {
        merged.set_source_language(config.output.source_language.clone());
    }

    let output = args.output.unwrap_or(args.existing);
    write_catalog(&output, &merged)?;

    Ok(MergeOutcome {
        output,
        language: merged.language().to_string(),
        report,
        pruned,
    })
}

/// Read an extraction, returning the locale it names when it is a TS file.
fn load_skeleton(path: &Path) -> Result<(Skeleton, Option<String>)> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        let bytes = std::fs::read(path).map_err(|e| CliError::io(path, e))?;
        let extractions: Vec<Extraction> =
            serde_json::from_slice(&bytes).map_err(|source| CliError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(
            target: "tscat.cli",
            path = %path.display(),
            extractions = extractions.len(),
            "extraction list read"
        );
        return Ok((Skeleton::from_extractions(extractions), None));
    }

    let catalog = read_catalog(path)?;
    Ok((
        Skeleton::from_catalog(&catalog),
        Some(catalog.language().to_string()),
    ))
}

fn load_existing(
    path: &Path,
    locale: Option<&str>,
    skeleton_locale: Option<String>,
) -> Result<Catalog> {
    if !path.exists() {
        let language = locale
            .map(str::to_string)
            .or(skeleton_locale)
            .ok_or_else(|| {
                CliError::invalid(format!(
                    "{} does not exist; pass --locale to start a new catalog",
                    path.display()
                ))
            })?;
        tracing::info!(
            target: "tscat.cli",
            path = %path.display(),
            language = %language,
            "starting a new catalog"
        );
        return Ok(Catalog::new(language));
    }

    let catalog = read_catalog(path)?;
    if let Some(locale) = locale
        && locale != catalog.language()
    {
        return Err(CliError::invalid(format!(
            "{} is a {} catalog, not {locale}",
            path.display(),
            catalog.language()
        )));
    }
    Ok(catalog)
}
