//! Three-way reconciliation of a fresh extraction against a translated catalog.
//!
//! # Algorithm
//!
//! 1. Validate the skeleton: an identity key reported twice within one
//!    context aborts the merge before anything is built.
//! 2. Clone the existing catalog and walk the skeleton. A known key keeps
//!    its translation (resurrecting it if it was tombstoned) and has its
//!    locations replaced; an unknown key is appended as unfinished.
//! 3. Every existing message not reported is tombstoned: finished becomes
//!    obsolete, unfinished becomes vanished, and its locations are cleared.
//!    Contexts missing from the skeleton are handled the same way and are
//!    never dropped.
//!
//! # Invariants
//!
//! 1. **All-or-nothing**: `existing` is borrowed immutably; on error no
//!    catalog is produced.
//! 2. **No silent loss**: every key of `existing` is present in the result.
//! 3. **Finished work survives**: a finished message whose key is reported
//!    keeps its exact text, whatever happened to its locations.
//! 4. **Disambiguation is identity**: messages differing only in their note
//!    never merge.
//! 5. **Stable order**: existing contexts and messages keep their positions;
//!    new messages go to the end of their context, new contexts to the end
//!    of the catalog.

use ahash::AHashSet;
use serde::Serialize;

use crate::error::{CatalogError, Result};
use crate::key::MessageKey;
use crate::model::{Catalog, Message, TranslationStatus};
use crate::skeleton::Skeleton;

/// What a merge did, for logs and CLI output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Reported keys that were already live in the catalog.
    pub kept: usize,
    /// Reported keys that were new.
    pub added: usize,
    /// Reported keys that came back from a tombstone.
    pub resurrected: usize,
    /// Finished messages that disappeared.
    pub obsoleted: usize,
    /// Unfinished messages that disappeared.
    pub vanished: usize,
    /// Tombstones that stayed tombstones.
    pub dormant: usize,
}

impl MergeReport {
    /// Whether the merge changed any translation state or membership.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.added + self.resurrected + self.obsoleted + self.vanished > 0
    }
}

/// Merge `skeleton` into a copy of `existing`.
///
/// Fails with [`CatalogError::Reconcile`] when the skeleton reports one
/// identity key twice within a context; `existing` is never modified.
pub fn merge(existing: &Catalog, skeleton: &Skeleton) -> Result<(Catalog, MergeReport)> {
    let _span = tracing::debug_span!(
        "tscat.merge",
        language = %existing.language(),
        existing = existing.len(),
        extracted = skeleton.len(),
    )
    .entered();

    validate(skeleton)?;

    let mut merged = existing.clone();
    let mut report = MergeReport::default();
    // seen[context][message] for messages that predate this merge
    let mut seen: Vec<Vec<bool>> = existing
        .contexts()
        .iter()
        .map(|context| vec![false; context.len()])
        .collect();

    for skeleton_context in skeleton.contexts() {
        let context_index = merged.context_index_or_insert(&skeleton_context.name);
        let Some(context) = merged.context_at_mut(context_index) else {
            continue;
        };

        for reported in &skeleton_context.messages {
            match context.position(&reported.source, reported.disambiguation()) {
                Some(index) => {
                    let Some(message) = context.message_mut(index) else {
                        continue;
                    };
                    if message.status().is_tombstone() {
                        message.set_translation(message.translation().resurrected());
                        report.resurrected += 1;
                    } else {
                        report.kept += 1;
                    }
                    message.set_locations(reported.locations.clone());
                    message.set_extra_comment(reported.extra_comment.clone());
                    if let Some(flag) = seen
                        .get_mut(context_index)
                        .and_then(|flags| flags.get_mut(index))
                    {
                        *flag = true;
                    }
                }
                None => {
                    let mut message = Message::new(
                        reported.source.clone(),
                        reported.disambiguation.clone(),
                    );
                    message.set_locations(reported.locations.clone());
                    message.set_extra_comment(reported.extra_comment.clone());
                    // Validation ruled out duplicates, so this cannot collide.
                    if context.insert(message).is_ok() {
                        report.added += 1;
                    }
                }
            }
        }
    }

    for (context, flags) in merged.contexts_mut().iter_mut().zip(&seen) {
        for (index, _) in flags.iter().enumerate().filter(|(_, seen)| !**seen) {
            let Some(message) = context.message_mut(index) else {
                continue;
            };
            match message.status() {
                TranslationStatus::Finished => report.obsoleted += 1,
                TranslationStatus::Unfinished => report.vanished += 1,
                TranslationStatus::Obsolete | TranslationStatus::Vanished => {
                    report.dormant += 1;
                }
            }
            message.set_translation(message.translation().tombstoned());
            message.set_locations(Vec::new());
        }
    }

    tracing::info!(
        target: "tscat.reconcile",
        language = %merged.language(),
        kept = report.kept,
        added = report.added,
        resurrected = report.resurrected,
        obsoleted = report.obsoleted,
        vanished = report.vanished,
        dormant = report.dormant,
        "catalog merged"
    );
    Ok((merged, report))
}

fn validate(skeleton: &Skeleton) -> Result<()> {
    for context in skeleton.contexts() {
        let mut keys = AHashSet::with_capacity(context.messages.len());
        for message in &context.messages {
            if !keys.insert((message.source.as_str(), message.disambiguation())) {
                let key = MessageKey::new(
                    context.name.clone(),
                    message.source.clone(),
                    message.disambiguation.clone(),
                );
                tracing::warn!(target: "tscat.reconcile", key = %key, "duplicate key in extraction");
                return Err(CatalogError::Reconcile { key });
            }
        }
    }
    Ok(())
}
