#![no_main]

use libfuzzer_sys::fuzz_target;
use tscat_core::{deserialize, serialize};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must either fail cleanly or yield a catalog that
    // survives a serialize/deserialize round trip unchanged.
    let Ok(catalog) = deserialize(data) else {
        return;
    };
    let bytes = serialize(&catalog);
    let again = deserialize(&bytes).expect("serializer output must parse");
    assert_eq!(again, catalog);
    assert_eq!(serialize(&again), bytes);
});
