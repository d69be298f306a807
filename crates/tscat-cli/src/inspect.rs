//! Read-only commands: `stats` and `check`.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tscat_core::{CatalogStats, read_catalog};

use crate::error::{CliError, Result};

#[derive(Debug, Clone, Args)]
pub struct StatsArgs {
    #[arg(long)]
    pub catalog: PathBuf,

    /// Print as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    #[arg(long)]
    pub catalog: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
    pub catalog: String,
    pub language: String,
    pub version: String,
    #[serde(flatten)]
    pub stats: CatalogStats,
    pub completion_percent: f64,
}

pub fn stats_summary(args: &StatsArgs) -> Result<StatsSummary> {
    let catalog = read_catalog(&args.catalog)?;
    let stats = catalog.stats();
    Ok(StatsSummary {
        catalog: args.catalog.display().to_string(),
        language: catalog.language().to_string(),
        version: catalog.version().to_string(),
        completion_percent: stats.completion_percent(),
        stats,
    })
}

pub fn run_stats(args: StatsArgs) -> Result<()> {
    let summary = stats_summary(&args)?;
    if args.json {
        let text = serde_json::to_string_pretty(&summary).map_err(|source| CliError::Json {
            path: args.catalog.clone(),
            source,
        })?;
        println!("{text}");
    } else {
        print!("{}", render_stats(&summary));
    }
    Ok(())
}

fn render_stats(summary: &StatsSummary) -> String {
    let s = &summary.stats;
    let mut out = format!(
        "{} ({}, format {})\n",
        summary.catalog, summary.language, summary.version
    );
    for (label, value) in [
        ("contexts", s.contexts),
        ("messages", s.messages),
        ("finished", s.finished),
        ("unfinished", s.unfinished),
        ("obsolete", s.obsolete),
        ("vanished", s.vanished),
    ] {
        out.push_str(&format!("  {label:<12}{value:>6}\n"));
    }
    out.push_str(&format!(
        "  {:<12}{:>5.1}%\n",
        "complete", summary.completion_percent
    ));
    out
}

pub fn run_check(args: CheckArgs) -> Result<()> {
    let catalog = read_catalog(&args.catalog)?;
    println!(
        "ok: {} ({}, {} messages in {} contexts)",
        args.catalog.display(),
        catalog.language(),
        catalog.len(),
        catalog.contexts().len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CATALOG: &str = r#"<TS version="2.0" language="fr_FR">
<context><name>Menu</name>
<message><source>Open</source><translation>Ouvrir</translation></message>
<message><source>Close</source><translation type="unfinished"></translation></message>
<message><source>Quit</source><translation>Quitter</translation></message>
<message><source>Help</source><translation type="obsolete">Aide</translation></message>
</context></TS>"#;

    #[test]
    fn summary_counts_states() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("fr_FR.ts");
        fs::write(&path, CATALOG).expect("write fixture");

        let summary = stats_summary(&StatsArgs {
            catalog: path,
            json: true,
        })
        .expect("stats");
        assert_eq!(summary.language, "fr_FR");
        assert_eq!(summary.version, "2.0");
        assert_eq!(summary.stats.messages, 4);
        assert_eq!(summary.stats.finished, 2);
        assert_eq!(summary.stats.obsolete, 1);
        assert!((summary.completion_percent - 66.666).abs() < 0.01);

        let json = serde_json::to_value(&summary).expect("serializes");
        assert_eq!(json["finished"], 2);
        assert_eq!(json["language"], "fr_FR");
    }

    #[test]
    fn rendered_table_lists_every_state() {
        let summary = StatsSummary {
            catalog: "fr_FR.ts".into(),
            language: "fr_FR".into(),
            version: "2.1".into(),
            stats: CatalogStats {
                contexts: 1,
                messages: 2,
                finished: 1,
                unfinished: 1,
                obsolete: 0,
                vanished: 0,
            },
            completion_percent: 50.0,
        };
        let text = render_stats(&summary);
        assert!(text.starts_with("fr_FR.ts (fr_FR, format 2.1)\n"));
        assert!(text.contains("  unfinished       1\n"));
        assert!(text.contains("  complete     50.0%\n"));
    }

    #[test]
    fn check_rejects_malformed_catalog() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("fr_FR.ts");
        fs::write(&path, "<TS language=\"fr_FR\"><context>").expect("write fixture");
        let error = run_check(CheckArgs { catalog: path }).expect_err("malformed");
        assert_eq!(error.exit_code(), 3);
    }
}
