//! Property-based invariant tests for runtime lookup.
//!
//! 1. Finished messages resolve to their translation
//! 2. Every other message resolves to exactly its source text
//! 3. Unknown queries resolve to exactly the supplied source text
//! 4. A snapshot loaded from disk answers like one built in memory

use proptest::prelude::*;
use tscat_core::{
    Catalog, MessageKey, Skeleton, SkeletonMessage, TranslationStatus, merge, write_catalog,
};
use tscat_lookup::{Translator, load_locale};

/// (context, source, note, translation, keep in second extraction)
type Row = (String, String, Option<String>, Option<String>, bool);

fn row() -> impl Strategy<Value = Row> {
    (
        "[A-Z][a-z]{0,5}",
        "[a-zA-Z .']{1,12}",
        proptest::option::of("[a-z]{1,4}"),
        proptest::option::of("[a-zA-Zéà ]{1,12}"),
        any::<bool>(),
    )
}

fn skeleton(rows: &[&Row]) -> Skeleton {
    let mut skeleton = Skeleton::new();
    let mut seen = std::collections::HashSet::new();
    for (context, source, note, _, _) in rows {
        if !seen.insert((context, source, note)) {
            continue;
        }
        let mut message = SkeletonMessage::new(source.clone());
        if let Some(note) = note {
            message = message.with_disambiguation(note.clone());
        }
        skeleton.push(context.clone(), message);
    }
    skeleton
}

fn catalog(rows: &[Row]) -> Catalog {
    let all: Vec<&Row> = rows.iter().collect();
    let (mut catalog, _) = merge(&Catalog::new("fr_FR"), &skeleton(&all)).expect("deduplicated");
    for (context, source, note, text, _) in rows {
        if let Some(text) = text {
            let key = MessageKey::new(context.clone(), source.clone(), note.clone());
            let _ = catalog.set_translation(&key, text.clone());
        }
    }
    let kept: Vec<&Row> = rows.iter().filter(|row| row.4).collect();
    let (catalog, _) = merge(&catalog, &skeleton(&kept)).expect("deduplicated");
    catalog
}

proptest! {
    #[test]
    fn resolve_follows_translation_status(rows in proptest::collection::vec(row(), 0..16)) {
        let catalog = catalog(&rows);
        let translator = Translator::new(&catalog);

        let mut finished = 0;
        for (context, message) in catalog.iter() {
            let resolved = translator.resolve(context, message.source(), message.disambiguation());
            if message.status() == TranslationStatus::Finished {
                finished += 1;
                prop_assert_eq!(resolved, message.translation().text());
            } else {
                prop_assert_eq!(resolved, message.source());
            }
        }
        prop_assert_eq!(translator.len(), finished);
    }

    #[test]
    fn unknown_queries_return_source(
        rows in proptest::collection::vec(row(), 0..8),
        source in "[0-9]{1,8}",
    ) {
        // Generated catalogs never contain digit-only sources.
        let translator = Translator::new(&catalog(&rows));
        prop_assert_eq!(translator.resolve("Ctx", &source, None), source.as_str());
        prop_assert_eq!(translator.resolve("Ctx", &source, Some("note")), source.as_str());
    }

    #[test]
    fn loaded_snapshot_matches_in_memory(rows in proptest::collection::vec(row(), 0..8)) {
        let catalog = catalog(&rows);
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("fr_FR.ts");
        write_catalog(&path, &catalog).expect("write");

        let loaded = load_locale(&path).expect("load");
        let built = Translator::new(&catalog);
        prop_assert_eq!(loaded.len(), built.len());
        for (context, message) in catalog.iter() {
            prop_assert_eq!(
                loaded.resolve(context, message.source(), message.disambiguation()),
                built.resolve(context, message.source(), message.disambiguation())
            );
        }
    }
}
