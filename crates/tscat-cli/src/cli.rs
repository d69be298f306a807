use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::TscatConfig;
use crate::error::Result;
use crate::inspect::{CheckArgs, StatsArgs, run_check, run_stats};
use crate::logging;
use crate::merge::{MergeArgs, run_merge};
use crate::prune::{PruneArgs, run_prune};
use crate::resolve::{ResolveArgs, run_resolve};

#[derive(Debug, Parser)]
#[command(
    name = "tscat",
    about = "Merge, prune and inspect TS message catalogs",
    version
)]
pub struct Cli {
    /// Config file (default: ./tscat.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug). `TSCAT_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long = "log-json", global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Merge a fresh extraction into a translated catalog.
    Merge(MergeArgs),

    /// Remove obsolete and/or vanished messages.
    Prune(PruneArgs),

    /// Print translation progress.
    Stats(StatsArgs),

    /// Parse a catalog and report whether it is well formed.
    Check(CheckArgs),

    /// Look up the display text of one message.
    Resolve(ResolveArgs),
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_json);
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let config = TscatConfig::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Merge(args) => run_merge(args, &config),
        Commands::Prune(args) => run_prune(args),
        Commands::Stats(args) => run_stats(args),
        Commands::Check(args) => run_check(args),
        Commands::Resolve(args) => run_resolve(args, &config),
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands};

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tscat",
            "stats",
            "--catalog",
            "base_fr.ts",
            "-vv",
            "--log-json",
        ])
        .expect("valid arguments");
        assert_eq!(cli.verbose, 2);
        assert!(cli.log_json);
        assert!(matches!(cli.command, Commands::Stats(_)));
    }

    #[test]
    fn merge_requires_skeleton() {
        assert!(Cli::try_parse_from(["tscat", "merge", "--existing", "base_fr.ts"]).is_err());
    }

    #[test]
    fn resolve_needs_catalog_or_locale() {
        assert!(
            Cli::try_parse_from(["tscat", "resolve", "--context", "Menu", "--source", "Open"])
                .is_err()
        );
        assert!(
            Cli::try_parse_from([
                "tscat", "resolve", "--locale", "fr_FR", "--catalog", "a.ts", "--context",
                "Menu", "--source", "Open",
            ])
            .is_err()
        );
        assert!(
            Cli::try_parse_from([
                "tscat", "resolve", "--locale", "fr_FR", "--context", "Menu", "--source", "Open",
            ])
            .is_ok()
        );
    }
}
