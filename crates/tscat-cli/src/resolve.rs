use std::path::PathBuf;

use clap::Args;
use tscat_lookup::{load_locale, locale_path};

use crate::config::TscatConfig;
use crate::error::Result;

#[derive(Debug, Clone, Args)]
pub struct ResolveArgs {
    /// Catalog file to look in.
    #[arg(long, conflicts_with = "locale", required_unless_present = "locale")]
    pub catalog: Option<PathBuf>,

    /// Locale tag, found under `lookup.locale_dir` via `lookup.file_pattern`.
    #[arg(long)]
    pub locale: Option<String>,

    #[arg(long)]
    pub context: String,

    #[arg(long)]
    pub source: String,

    #[arg(long)]
    pub disambiguation: Option<String>,
}

impl ResolveArgs {
    /// Catalog path named directly or derived from the locale.
    #[must_use]
    pub fn catalog_path(&self, config: &TscatConfig) -> PathBuf {
        match (&self.catalog, &self.locale) {
            (Some(path), _) => path.clone(),
            (None, Some(locale)) => locale_path(
                &config.lookup.locale_dir,
                &config.lookup.file_pattern,
                locale,
            ),
            (None, None) => PathBuf::new(),
        }
    }
}

pub fn run_resolve(args: ResolveArgs, config: &TscatConfig) -> Result<()> {
    println!("{}", resolve_text(&args, config)?);
    Ok(())
}

/// Display text for the requested message, source text on any miss.
pub fn resolve_text(args: &ResolveArgs, config: &TscatConfig) -> Result<String> {
    let translator = load_locale(args.catalog_path(config))?;
    let text = translator.resolve(&args.context, &args.source, args.disambiguation.as_deref());
    Ok(text.to_string())
}
