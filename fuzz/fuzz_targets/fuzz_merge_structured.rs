#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tscat_core::{Catalog, Extraction, Location, MessageKey, Skeleton, merge};

#[derive(Debug, Arbitrary)]
struct Hit {
    context: u8,
    source: u8,
    note: Option<u8>,
    line: u16,
}

#[derive(Debug, Arbitrary)]
struct Input {
    first: Vec<Hit>,
    translate: Vec<(u8, u8, String)>,
    second: Vec<Hit>,
}

fn extractions(hits: &[Hit]) -> Skeleton {
    Skeleton::from_extractions(hits.iter().map(|hit| Extraction {
        context: format!("C{}", hit.context % 4),
        source: format!("S{}", hit.source % 8),
        disambiguation: hit.note.map(|n| format!("n{}", n % 2)),
        location: Location::new("f.cpp", u32::from(hit.line)),
        extra_comment: None,
    }))
}

fuzz_target!(|input: Input| {
    let (mut catalog, _) =
        merge(&Catalog::new("xx"), &extractions(&input.first)).expect("grouped skeleton");
    for (context, source, text) in &input.translate {
        let key = MessageKey::new(format!("C{}", context % 4), format!("S{}", source % 8), None);
        let _ = catalog.set_translation(&key, text.clone());
    }

    let (merged, report) =
        merge(&catalog, &extractions(&input.second)).expect("grouped skeleton");

    // No silent loss, finished work survives.
    for (context, message) in catalog.iter() {
        let after = merged.get(&message.key(context)).expect("key retained");
        assert_eq!(after.translation().text(), message.translation().text());
    }
    assert_eq!(
        report.kept + report.added + report.resurrected,
        extractions(&input.second).len()
    );
});
