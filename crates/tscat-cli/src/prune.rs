use std::path::PathBuf;

use clap::Args;
use tscat_core::{PrunePolicy, read_catalog, write_catalog};

use crate::error::Result;

#[derive(Debug, Clone, Args)]
pub struct PruneArgs {
    /// Catalog to prune in place.
    #[arg(long)]
    pub catalog: PathBuf,

    /// Remove obsolete (previously finished) messages.
    #[arg(long)]
    pub obsolete: bool,

    /// Remove vanished (never finished) messages.
    #[arg(long)]
    pub vanished: bool,
}

impl PruneArgs {
    /// Both tombstone kinds when no flag narrows the selection.
    #[must_use]
    pub fn policy(&self) -> PrunePolicy {
        if !self.obsolete && !self.vanished {
            return PrunePolicy::ALL;
        }
        PrunePolicy {
            obsolete: self.obsolete,
            vanished: self.vanished,
        }
    }
}

pub fn run_prune(args: PruneArgs) -> Result<()> {
    let removed = prune_file(&args)?;
    println!("{}: removed {removed} messages", args.catalog.display());
    Ok(())
}

/// Prune the catalog file; it is rewritten only when something was removed.
pub fn prune_file(args: &PruneArgs) -> Result<usize> {
    let mut catalog = read_catalog(&args.catalog)?;
    let removed = catalog.prune(args.policy());
    if removed > 0 {
        write_catalog(&args.catalog, &catalog)?;
    }
    Ok(removed)
}
