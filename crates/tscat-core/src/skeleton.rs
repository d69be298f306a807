//! Extraction skeletons: what the scanner found, without translations.
//!
//! A scanner reports one [`Extraction`] per call site. [`Skeleton::from_extractions`]
//! groups those tuples by identity key, collapses repeated `(file, line)` pairs
//! and sorts each message's locations so scanner traversal order never leaks
//! into persisted diffs.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::key::normalize_note;
use crate::model::{Catalog, Location};

/// One scanner hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub context: String,
    pub source: String,
    #[serde(default)]
    pub disambiguation: Option<String>,
    pub location: Location,
    #[serde(default)]
    pub extra_comment: Option<String>,
}

/// A message as reported by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkeletonMessage {
    pub source: String,
    pub disambiguation: Option<String>,
    pub extra_comment: Option<String>,
    pub locations: Vec<Location>,
}

impl SkeletonMessage {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            disambiguation: None,
            extra_comment: None,
            locations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_disambiguation(mut self, note: impl Into<String>) -> Self {
        self.disambiguation = normalize_note(Some(note.into()));
        self
    }

    #[must_use]
    pub fn with_extra_comment(mut self, comment: impl Into<String>) -> Self {
        self.extra_comment = normalize_note(Some(comment.into()));
        self
    }

    #[must_use]
    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Self {
        self.locations.push(Location::new(file, line));
        self
    }

    pub(crate) fn disambiguation(&self) -> Option<&str> {
        self.disambiguation.as_deref().filter(|d| !d.is_empty())
    }
}

/// Messages of one context, in reported order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkeletonContext {
    pub name: String,
    pub messages: Vec<SkeletonMessage>,
}

/// The full result of one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Skeleton {
    contexts: Vec<SkeletonContext>,
}

impl Skeleton {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an already-grouped message to `context`.
    ///
    /// No collapsing happens here: pushing the same identity key twice is a
    /// malformed skeleton and is rejected by [`crate::merge`].
    pub fn push(&mut self, context: impl Into<String>, message: SkeletonMessage) {
        let context = context.into();
        match self.contexts.iter_mut().find(|c| c.name == context) {
            Some(existing) => existing.messages.push(message),
            None => self.contexts.push(SkeletonContext {
                name: context,
                messages: vec![message],
            }),
        }
    }

    /// Group raw scanner tuples into a well-formed skeleton.
    ///
    /// Contexts and messages keep first-seen order; each message's locations
    /// are deduplicated and sorted by `(file, line)`. The first non-empty
    /// developer comment reported for a key wins.
    pub fn from_extractions(extractions: impl IntoIterator<Item = Extraction>) -> Self {
        let mut contexts: Vec<SkeletonContext> = Vec::new();
        let mut context_index: AHashMap<String, usize> = AHashMap::new();
        let mut message_index: AHashMap<(usize, String, Option<String>), usize> = AHashMap::new();

        for extraction in extractions {
            let ci = *context_index
                .entry(extraction.context.clone())
                .or_insert_with(|| {
                    contexts.push(SkeletonContext {
                        name: extraction.context.clone(),
                        messages: Vec::new(),
                    });
                    contexts.len() - 1
                });
            let context = &mut contexts[ci];
            let disambiguation = normalize_note(extraction.disambiguation);
            let slot = (ci, extraction.source.clone(), disambiguation.clone());
            let mi = *message_index.entry(slot).or_insert_with(|| {
                context.messages.push(SkeletonMessage {
                    source: extraction.source,
                    disambiguation,
                    extra_comment: None,
                    locations: Vec::new(),
                });
                context.messages.len() - 1
            });
            let message = &mut context.messages[mi];
            message.locations.push(extraction.location);
            if message.extra_comment.is_none() {
                message.extra_comment = normalize_note(extraction.extra_comment);
            }
        }

        for message in contexts.iter_mut().flat_map(|c| c.messages.iter_mut()) {
            message.locations.sort();
            message.locations.dedup();
        }

        Self { contexts }
    }

    /// Treat an untranslated catalog (a scanner's TS output) as a skeleton.
    ///
    /// Translation state is ignored; tombstoned entries are skipped because a
    /// scanner never reports them.
    #[must_use]
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut skeleton = Self::new();
        for context in catalog.contexts() {
            let messages: Vec<SkeletonMessage> = context
                .messages()
                .iter()
                .filter(|m| !m.status().is_tombstone())
                .map(|m| SkeletonMessage {
                    source: m.source().to_string(),
                    disambiguation: m.disambiguation().map(str::to_string),
                    extra_comment: m.extra_comment().map(str::to_string),
                    locations: m.locations().to_vec(),
                })
                .collect();
            skeleton.contexts.push(SkeletonContext {
                name: context.name().to_string(),
                messages,
            });
        }
        skeleton
    }

    #[must_use]
    pub fn contexts(&self) -> &[SkeletonContext] {
        &self.contexts
    }

    /// Number of reported messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts.iter().map(|c| c.messages.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(context: &str, source: &str, file: &str, line: u32) -> Extraction {
        Extraction {
            context: context.into(),
            source: source.into(),
            disambiguation: None,
            location: Location::new(file, line),
            extra_comment: None,
        }
    }

    #[test]
    fn groups_by_identity_key() {
        let skeleton = Skeleton::from_extractions([
            hit("AssetLocator", "Failed to allocate memory.", "b.cpp", 9),
            hit("AssetLocator", "Failed to allocate memory.", "a.cpp", 3),
            hit("OBEngine", "INFO", "OBEngine.cpp", 231),
            hit("AssetLocator", "Failed to allocate memory.", "a.cpp", 3),
        ]);
        assert_eq!(skeleton.contexts().len(), 2);
        assert_eq!(skeleton.len(), 2);

        let asset = &skeleton.contexts()[0];
        assert_eq!(asset.name, "AssetLocator");
        assert_eq!(
            asset.messages[0].locations,
            vec![Location::new("a.cpp", 3), Location::new("b.cpp", 9)]
        );
    }

    #[test]
    fn disambiguation_splits_messages() {
        let mut verb = hit("Menu", "Open", "menu.cpp", 1);
        verb.disambiguation = Some("verb".into());
        let mut adjective = hit("Menu", "Open", "menu.cpp", 2);
        adjective.disambiguation = Some("adjective".into());
        let mut empty_note = hit("Menu", "Open", "menu.cpp", 3);
        empty_note.disambiguation = Some(String::new());

        let skeleton = Skeleton::from_extractions([verb, adjective, empty_note]);
        let notes: Vec<_> = skeleton.contexts()[0]
            .messages
            .iter()
            .map(|m| m.disambiguation.clone())
            .collect();
        assert_eq!(
            notes,
            vec![Some("verb".into()), Some("adjective".into()), None]
        );
    }

    #[test]
    fn first_extra_comment_wins() {
        let mut first = hit("Menu", "Quit", "menu.cpp", 10);
        first.extra_comment = Some("File menu".into());
        let mut second = hit("Menu", "Quit", "menu.cpp", 20);
        second.extra_comment = Some("Tray menu".into());
        let skeleton = Skeleton::from_extractions([first, second]);
        assert_eq!(
            skeleton.contexts()[0].messages[0].extra_comment.as_deref(),
            Some("File menu")
        );
    }

    #[test]
    fn push_does_not_collapse() {
        let mut skeleton = Skeleton::new();
        skeleton.push("Menu", SkeletonMessage::new("Open"));
        skeleton.push("Menu", SkeletonMessage::new("Open"));
        assert_eq!(skeleton.len(), 2);
        assert_eq!(skeleton.contexts().len(), 1);
    }

    #[test]
    fn extraction_deserializes_with_optional_fields() {
        let json = r#"{"context":"Instance","source":"Instance expected","location":{"file":"Instance.cpp","line":1068}}"#;
        let extraction: Extraction = serde_json::from_str(json).expect("valid extraction");
        assert_eq!(extraction.disambiguation, None);
        assert_eq!(extraction.location, Location::new("Instance.cpp", 1068));
    }
}
