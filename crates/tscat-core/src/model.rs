//! In-memory catalog model.
//!
//! # Invariants
//!
//! 1. **Unique contexts**: a context name appears at most once per [`Catalog`].
//! 2. **Unique keys**: `(source, disambiguation)` is unique within a [`Context`].
//! 3. **Stable order**: contexts, messages and locations keep insertion order,
//!    so persisted catalogs diff minimally.
//! 4. **Finished means text**: a `Finished` [`Translation`] never has empty text.
//!
//! Structural mutation (adding or removing messages, replacing locations) is
//! crate-private and reserved for the codec, the reconciler and pruning.
//! Translator edits go through [`Catalog::set_translation`],
//! [`Catalog::mark_unfinished`] and [`Catalog::set_translator_comment`].

use std::fmt;
use std::str::FromStr;

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{CatalogError, EditRefusal, Result};
use crate::key::{MessageKey, normalize_note};

// ---------------------------------------------------------------------------
// FormatVersion
// ---------------------------------------------------------------------------

/// Schema revision of a persisted catalog (`major.minor`).
///
/// Informational only: a lower version is a strict subset of the fields of a
/// higher one, so readers accept any version and skip what they do not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormatVersion {
    pub major: u16,
    pub minor: u16,
}

impl FormatVersion {
    /// Version written for freshly created catalogs.
    pub const CURRENT: Self = Self::new(2, 1);

    /// Version assumed when a catalog carries no version attribute.
    pub const IMPLICIT: Self = Self::new(2, 0);

    #[must_use]
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// Whether this version is newer than what this crate writes.
    #[must_use]
    pub fn is_newer_than_supported(self) -> bool {
        self > Self::CURRENT
    }
}

impl Default for FormatVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid format version `{0}`")]
pub struct InvalidVersion(pub String);

impl FromStr for FormatVersion {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || InvalidVersion(s.to_string());
        let mut parts = s.trim().split('.');
        let major = parts.next().unwrap_or_default().parse().map_err(|_| invalid())?;
        let minor = parts.next().map_or(Ok(0), str::parse::<u16>).map_err(|_| invalid())?;
        // Patch and later components are accepted but not tracked.
        if parts.any(|part| part.parse::<u16>().is_err()) {
            return Err(invalid());
        }
        Ok(Self::new(major, minor))
    }
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// A call site that referenced a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
}

impl Location {
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

// ---------------------------------------------------------------------------
// Translation
// ---------------------------------------------------------------------------

/// Lifecycle tag of a message's translated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationStatus {
    /// No usable translation; display falls back to the source text.
    #[default]
    Unfinished,
    /// Translation present and authoritative.
    Finished,
    /// Gone from the extraction, but was finished. Worth re-surfacing.
    Obsolete,
    /// Gone from the extraction and was never finished. Safe to drop.
    Vanished,
}

impl TranslationStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unfinished => "unfinished",
            Self::Finished => "finished",
            Self::Obsolete => "obsolete",
            Self::Vanished => "vanished",
        }
    }

    /// Obsolete and vanished messages are tombstones: retained but dead.
    #[must_use]
    pub const fn is_tombstone(self) -> bool {
        matches!(self, Self::Obsolete | Self::Vanished)
    }
}

impl fmt::Display for TranslationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Translated text plus its lifecycle status.
///
/// Non-finished statuses may carry text: an unfinished draft, the retained
/// text of an obsolete message, or the draft of a vanished one. Only
/// finished text is ever surfaced to end users (see [`Translation::display_text`]).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Translation {
    status: TranslationStatus,
    text: String,
}

impl Translation {
    /// Unfinished with no draft.
    #[must_use]
    pub fn unfinished() -> Self {
        Self::default()
    }

    /// Unfinished with a translator draft.
    #[must_use]
    pub fn draft(text: impl Into<String>) -> Self {
        Self {
            status: TranslationStatus::Unfinished,
            text: text.into(),
        }
    }

    /// Finished translation. Empty text degrades to unfinished.
    #[must_use]
    pub fn finished(text: impl Into<String>) -> Self {
        Self::with_status(TranslationStatus::Finished, text)
    }

    pub(crate) fn with_status(status: TranslationStatus, text: impl Into<String>) -> Self {
        let text = text.into();
        let status = if status == TranslationStatus::Finished && text.is_empty() {
            TranslationStatus::Unfinished
        } else {
            status
        };
        Self { status, text }
    }

    #[must_use]
    pub fn status(&self) -> TranslationStatus {
        self.status
    }

    /// Stored text regardless of status (may be empty).
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text fit for end users: present only when finished.
    #[must_use]
    pub fn display_text(&self) -> Option<&str> {
        (self.status == TranslationStatus::Finished).then_some(self.text.as_str())
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status == TranslationStatus::Finished
    }

    /// The message disappeared from the extraction.
    pub(crate) fn tombstoned(&self) -> Self {
        let status = match self.status {
            TranslationStatus::Finished => TranslationStatus::Obsolete,
            TranslationStatus::Unfinished => TranslationStatus::Vanished,
            dead => dead,
        };
        Self {
            status,
            text: self.text.clone(),
        }
    }

    /// The message reappeared in the extraction.
    pub(crate) fn resurrected(&self) -> Self {
        match self.status {
            TranslationStatus::Obsolete => Self::finished(self.text.clone()),
            TranslationStatus::Vanished => Self::draft(self.text.clone()),
            _ => self.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// One translatable unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    source: String,
    disambiguation: Option<String>,
    extra_comment: Option<String>,
    translator_comment: Option<String>,
    locations: Vec<Location>,
    translation: Translation,
}

impl Message {
    pub(crate) fn new(source: impl Into<String>, disambiguation: Option<String>) -> Self {
        Self {
            source: source.into(),
            disambiguation: normalize_note(disambiguation),
            extra_comment: None,
            translator_comment: None,
            locations: Vec::new(),
            translation: Translation::unfinished(),
        }
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn disambiguation(&self) -> Option<&str> {
        self.disambiguation.as_deref()
    }

    /// Developer note captured at the call site. Advisory.
    #[must_use]
    pub fn extra_comment(&self) -> Option<&str> {
        self.extra_comment.as_deref()
    }

    /// Translator-facing note. Advisory.
    #[must_use]
    pub fn translator_comment(&self) -> Option<&str> {
        self.translator_comment.as_deref()
    }

    #[must_use]
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    #[must_use]
    pub fn translation(&self) -> &Translation {
        &self.translation
    }

    #[must_use]
    pub fn status(&self) -> TranslationStatus {
        self.translation.status
    }

    #[must_use]
    pub fn key(&self, context: &str) -> MessageKey {
        MessageKey::new(context, self.source.clone(), self.disambiguation.clone())
    }

    /// Replace locations wholesale, dropping repeated `(file, line)` pairs.
    pub(crate) fn set_locations(&mut self, mut locations: Vec<Location>) {
        let mut seen = AHashSet::with_capacity(locations.len());
        locations.retain(|loc| seen.insert(loc.clone()));
        self.locations = locations;
    }

    pub(crate) fn push_location(&mut self, location: Location) {
        if !self.locations.contains(&location) {
            self.locations.push(location);
        }
    }

    pub(crate) fn set_extra_comment(&mut self, comment: Option<String>) {
        self.extra_comment = normalize_note(comment);
    }

    pub(crate) fn set_translator_comment(&mut self, comment: Option<String>) {
        self.translator_comment = normalize_note(comment);
    }

    pub(crate) fn set_translation(&mut self, translation: Translation) {
        self.translation = translation;
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Named group of messages, usually one per owning component.
#[derive(Debug, Clone)]
pub struct Context {
    name: String,
    messages: Vec<Message>,
    // source text -> positions in `messages` (one per disambiguation)
    by_source: AHashMap<String, Vec<usize>>,
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.messages == other.messages
    }
}

impl Eq for Context {}

impl Context {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: Vec::new(),
            by_source: AHashMap::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn get(&self, source: &str, disambiguation: Option<&str>) -> Option<&Message> {
        self.position(source, disambiguation)
            .map(|index| &self.messages[index])
    }

    pub(crate) fn position(&self, source: &str, disambiguation: Option<&str>) -> Option<usize> {
        let disambiguation = disambiguation.filter(|d| !d.is_empty());
        self.by_source
            .get(source)?
            .iter()
            .copied()
            .find(|&index| self.messages[index].disambiguation() == disambiguation)
    }

    pub(crate) fn message_mut(&mut self, index: usize) -> Option<&mut Message> {
        self.messages.get_mut(index)
    }

    /// Append a message; hands it back if its key is already present.
    pub(crate) fn insert(&mut self, message: Message) -> std::result::Result<usize, Message> {
        if self
            .position(message.source(), message.disambiguation())
            .is_some()
        {
            return Err(message);
        }
        let index = self.messages.len();
        self.by_source
            .entry(message.source.clone())
            .or_default()
            .push(index);
        self.messages.push(message);
        Ok(index)
    }

    /// Keep only messages matching `keep`; returns how many were removed.
    pub(crate) fn retain(&mut self, keep: impl FnMut(&Message) -> bool) -> usize {
        let before = self.messages.len();
        self.messages.retain(keep);
        let removed = before - self.messages.len();
        if removed > 0 {
            self.reindex();
        }
        removed
    }

    fn reindex(&mut self) {
        self.by_source.clear();
        for (index, message) in self.messages.iter().enumerate() {
            self.by_source
                .entry(message.source.clone())
                .or_default()
                .push(index);
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// All contexts for one target locale.
#[derive(Debug, Clone)]
pub struct Catalog {
    language: String,
    source_language: Option<String>,
    version: FormatVersion,
    contexts: Vec<Context>,
    by_name: AHashMap<String, usize>,
}

impl PartialEq for Catalog {
    fn eq(&self, other: &Self) -> bool {
        self.language == other.language
            && self.source_language == other.source_language
            && self.version == other.version
            && self.contexts == other.contexts
    }
}

impl Eq for Catalog {}

impl Catalog {
    /// Empty catalog for `language` at the current format version.
    #[must_use]
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            source_language: None,
            version: FormatVersion::CURRENT,
            contexts: Vec::new(),
            by_name: AHashMap::new(),
        }
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn source_language(&self) -> Option<&str> {
        self.source_language.as_deref()
    }

    pub fn set_source_language(&mut self, language: Option<String>) {
        self.source_language = normalize_note(language);
    }

    #[must_use]
    pub fn version(&self) -> FormatVersion {
        self.version
    }

    pub fn set_version(&mut self, version: FormatVersion) {
        self.version = version;
    }

    #[must_use]
    pub fn contexts(&self) -> &[Context] {
        &self.contexts
    }

    #[must_use]
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.by_name.get(name).map(|&index| &self.contexts[index])
    }

    #[must_use]
    pub fn get(&self, key: &MessageKey) -> Option<&Message> {
        self.context(key.context())?
            .get(key.source(), key.disambiguation())
    }

    #[must_use]
    pub fn contains(&self, key: &MessageKey) -> bool {
        self.get(key).is_some()
    }

    /// Total number of messages across all contexts, tombstones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts.iter().map(Context::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contexts.iter().all(Context::is_empty)
    }

    /// Every message paired with its context name, in persisted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Message)> {
        self.contexts.iter().flat_map(|context| {
            context
                .messages
                .iter()
                .map(move |message| (context.name(), message))
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = MessageKey> + '_ {
        self.iter().map(|(context, message)| message.key(context))
    }

    // -----------------------------------------------------------------
    // Translator edits
    // -----------------------------------------------------------------

    /// Store translator-supplied text for a live message.
    ///
    /// Non-empty text makes the message finished; empty text clears it back
    /// to unfinished. Returns the resulting status.
    pub fn set_translation(
        &mut self,
        key: &MessageKey,
        text: impl Into<String>,
    ) -> Result<TranslationStatus> {
        let message = self.editable(key)?;
        message.set_translation(Translation::finished(text));
        let status = message.status();
        tracing::debug!(target: "tscat.edit", key = %key, status = %status, "translation updated");
        Ok(status)
    }

    /// Demote a live message to unfinished, keeping its text as a draft.
    pub fn mark_unfinished(&mut self, key: &MessageKey) -> Result<()> {
        let message = self.editable(key)?;
        let draft = Translation::draft(message.translation.text.clone());
        message.set_translation(draft);
        tracing::debug!(target: "tscat.edit", key = %key, "translation marked unfinished");
        Ok(())
    }

    pub fn set_translator_comment(
        &mut self,
        key: &MessageKey,
        comment: Option<String>,
    ) -> Result<()> {
        self.editable(key)?.set_translator_comment(comment);
        Ok(())
    }

    fn editable(&mut self, key: &MessageKey) -> Result<&mut Message> {
        let refuse = |reason| CatalogError::Edit {
            key: key.clone(),
            reason,
        };
        let context_index = *self
            .by_name
            .get(key.context())
            .ok_or_else(|| refuse(EditRefusal::UnknownMessage))?;
        let context = &mut self.contexts[context_index];
        let index = context
            .position(key.source(), key.disambiguation())
            .ok_or_else(|| refuse(EditRefusal::UnknownMessage))?;
        let message = &mut context.messages[index];
        let status = message.status();
        if status.is_tombstone() {
            return Err(refuse(EditRefusal::Tombstoned(status)));
        }
        Ok(message)
    }

    // -----------------------------------------------------------------
    // Structural access (codec, reconciler, pruning)
    // -----------------------------------------------------------------

    pub(crate) fn context_index_or_insert(&mut self, name: &str) -> usize {
        if let Some(&index) = self.by_name.get(name) {
            return index;
        }
        let index = self.contexts.len();
        self.contexts.push(Context::new(name));
        self.by_name.insert(name.to_string(), index);
        index
    }

    pub(crate) fn context_at_mut(&mut self, index: usize) -> Option<&mut Context> {
        self.contexts.get_mut(index)
    }

    pub(crate) fn contexts_mut(&mut self) -> &mut [Context] {
        &mut self.contexts
    }

    /// Keep only contexts matching `keep`; returns how many were removed.
    pub(crate) fn retain_contexts(&mut self, keep: impl FnMut(&Context) -> bool) -> usize {
        let before = self.contexts.len();
        self.contexts.retain(keep);
        let removed = before - self.contexts.len();
        if removed > 0 {
            self.by_name = self
                .contexts
                .iter()
                .enumerate()
                .map(|(index, context)| (context.name.clone(), index))
                .collect();
        }
        removed
    }
}
