#![no_main]

use libfuzzer_sys::fuzz_target;
use lingo_catalog::{parse, parse_str, write_document};

fuzz_target!(|data: &[u8]| {
    let Ok(document) = parse(data) else {
        return;
    };

    // Whatever parsed must write back to something that parses to the same tree.
    let written = write_document(&document);
    let reparsed = parse_str(&written).expect("written catalog failed to parse");
    assert_eq!(reparsed, document, "parse(write(doc)) != doc");

    // And writing is a fixed point from then on.
    assert_eq!(write_document(&reparsed), written, "writer not stable");
});
