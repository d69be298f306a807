//! Explicit removal of tombstoned messages.
//!
//! The reconciler never deletes anything; pruning is the separate,
//! human-triggered step that actually discards obsolete or vanished entries.

use crate::model::{Catalog, TranslationStatus};

/// Which tombstones [`Catalog::prune`] removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrunePolicy {
    pub obsolete: bool,
    pub vanished: bool,
}

impl PrunePolicy {
    pub const ALL: Self = Self {
        obsolete: true,
        vanished: true,
    };
    pub const OBSOLETE_ONLY: Self = Self {
        obsolete: true,
        vanished: false,
    };
    pub const VANISHED_ONLY: Self = Self {
        obsolete: false,
        vanished: true,
    };

    #[must_use]
    pub fn removes(self, status: TranslationStatus) -> bool {
        match status {
            TranslationStatus::Obsolete => self.obsolete,
            TranslationStatus::Vanished => self.vanished,
            TranslationStatus::Unfinished | TranslationStatus::Finished => false,
        }
    }
}

impl Catalog {
    /// Remove tombstones selected by `policy`; returns how many went.
    ///
    /// Contexts left without messages are removed as well.
    pub fn prune(&mut self, policy: PrunePolicy) -> usize {
        let mut removed = 0;
        // emptied[i]: context i lost its last message in this call
        let mut emptied = Vec::with_capacity(self.contexts().len());
        for context in self.contexts_mut() {
            let dropped = context.retain(|message| !policy.removes(message.status()));
            emptied.push(dropped > 0 && context.is_empty());
            removed += dropped;
        }
        let contexts = if emptied.contains(&true) {
            let mut flags = emptied.into_iter();
            self.retain_contexts(|_| !flags.next().unwrap_or(false))
        } else {
            0
        };
        tracing::info!(
            target: "tscat.prune",
            language = %self.language(),
            obsolete = policy.obsolete,
            vanished = policy.vanished,
            messages = removed,
            contexts = contexts,
            "catalog pruned"
        );
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::deserialize;
    use crate::key::MessageKey;

    fn catalog() -> Catalog {
        deserialize(
            br#"<TS language="fr">
<context><name>Live</name>
<message><source>kept</source><translation>garde</translation></message>
<message><source>old</source><translation type="obsolete">vieux</translation></message>
</context>
<context><name>Gone</name>
<message><source>never</source><translation type="vanished"></translation></message>
</context>
<context><name>Empty</name></context>
</TS>"#,
        )
        .expect("fixture parses")
    }

    #[test]
    fn vanished_only_keeps_obsolete_work() {
        let mut catalog = catalog();
        assert_eq!(catalog.prune(PrunePolicy::VANISHED_ONLY), 1);
        assert!(catalog.contains(&MessageKey::new("Live", "old", None)));
        assert!(catalog.context("Gone").is_none());
        // Contexts that were already empty are not pruning's business.
        assert!(catalog.context("Empty").is_some());
    }

    #[test]
    fn already_empty_context_survives_with_or_without_emptied_peers() {
        let mut untouched = catalog();
        assert_eq!(untouched.prune(PrunePolicy::default()), 0);
        assert!(untouched.context("Empty").is_some());

        let mut emptying = catalog();
        assert_eq!(emptying.prune(PrunePolicy::ALL), 2);
        assert!(emptying.context("Gone").is_none());
        assert!(emptying.context("Empty").is_some());
        assert_eq!(
            emptying.contexts().iter().map(|c| c.name()).collect::<Vec<_>>(),
            vec!["Live", "Empty"]
        );
    }

    #[test]
    fn all_removes_every_tombstone() {
        let mut catalog = catalog();
        assert_eq!(catalog.prune(PrunePolicy::ALL), 2);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.contains(&MessageKey::new("Live", "kept", None)));
        assert!(catalog.iter().all(|(_, m)| !m.status().is_tombstone()));
    }

    #[test]
    fn default_policy_removes_nothing() {
        let mut catalog = catalog();
        let before = catalog.clone();
        assert_eq!(catalog.prune(PrunePolicy::default()), 0);
        assert_eq!(catalog, before);
    }
}
