//! Per-status message counts.

use serde::Serialize;

use crate::model::{Catalog, TranslationStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub contexts: usize,
    pub messages: usize,
    pub finished: usize,
    pub unfinished: usize,
    pub obsolete: usize,
    pub vanished: usize,
}

impl CatalogStats {
    /// Share of live messages that are finished, in `[0, 100]`.
    ///
    /// A catalog without live messages counts as complete.
    #[must_use]
    pub fn completion_percent(&self) -> f64 {
        let live = self.finished + self.unfinished;
        if live == 0 {
            return 100.0;
        }
        self.finished as f64 * 100.0 / live as f64
    }
}

impl Catalog {
    #[must_use]
    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats {
            contexts: self.contexts().len(),
            ..CatalogStats::default()
        };
        for (_, message) in self.iter() {
            stats.messages += 1;
            match message.status() {
                TranslationStatus::Finished => stats.finished += 1,
                TranslationStatus::Unfinished => stats.unfinished += 1,
                TranslationStatus::Obsolete => stats.obsolete += 1,
                TranslationStatus::Vanished => stats.vanished += 1,
            }
        }
        stats
    }
}
