//! Immutable lookup snapshot.
//!
//! # Invariants
//!
//! 1. Only finished translations are indexed. Drafts, obsolete and vanished
//!    entries are invisible to `resolve`.
//! 2. `resolve` never returns an empty string for a non-empty source: every
//!    indexed text is non-empty and every miss returns the caller's source.
//! 3. The read path borrows the query strings and allocates nothing.

use ahash::AHashMap;
use tscat_core::Catalog;

/// Translations sharing one source text, keyed by disambiguation note.
type Variants = Vec<(Option<Box<str>>, Box<str>)>;

/// Read-only view of one locale's finished translations.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    locale: String,
    source_locale: Option<String>,
    entries: AHashMap<String, AHashMap<String, Variants>>,
    len: usize,
}

impl Translator {
    /// Build a snapshot from `catalog`, keeping finished translations only.
    #[must_use]
    pub fn new(catalog: &Catalog) -> Self {
        let mut entries: AHashMap<String, AHashMap<String, Variants>> = AHashMap::new();
        let mut len = 0;
        for (context, message) in catalog.iter() {
            let Some(text) = message.translation().display_text() else {
                continue;
            };
            entries
                .entry(context.to_string())
                .or_default()
                .entry(message.source().to_string())
                .or_default()
                .push((message.disambiguation().map(Box::from), Box::from(text)));
            len += 1;
        }

        let skipped = catalog.len() - len;
        tracing::debug!(
            target: "tscat.lookup",
            locale = %catalog.language(),
            finished = len,
            skipped,
            "translator snapshot built"
        );

        Self {
            locale: catalog.language().to_string(),
            source_locale: catalog.source_language().map(str::to_string),
            entries,
            len,
        }
    }

    /// A snapshot with no translations: every query falls back to source.
    #[must_use]
    pub fn empty(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            ..Self::default()
        }
    }

    /// Display text for a message, falling back to `source` on any miss.
    #[inline]
    #[must_use]
    pub fn resolve<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        disambiguation: Option<&str>,
    ) -> &'a str {
        self.try_resolve(context, source, disambiguation)
            .unwrap_or(source)
    }

    /// The finished translation for a message, if there is one.
    #[must_use]
    pub fn try_resolve(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
    ) -> Option<&str> {
        let disambiguation = disambiguation.filter(|d| !d.is_empty());
        self.entries
            .get(context)?
            .get(source)?
            .iter()
            .find(|(note, _)| note.as_deref() == disambiguation)
            .map(|(_, text)| &**text)
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    #[must_use]
    pub fn source_locale(&self) -> Option<&str> {
        self.source_locale.as_deref()
    }

    /// Number of finished translations in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
