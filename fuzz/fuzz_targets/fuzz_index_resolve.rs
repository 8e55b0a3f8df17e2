#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lingo::{CatalogIndex, PluralRule, parse};

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    catalog: &'a [u8],
    locale: &'a str,
    context: &'a str,
    source: &'a str,
    disambiguator: &'a str,
    count: Option<i64>,
}

fuzz_target!(|input: Input<'_>| {
    let Ok(document) = parse(input.catalog) else {
        return;
    };
    let index = CatalogIndex::build(&document, input.locale);
    let slots = PluralRule::for_locale(input.locale).category_count();

    for ((context, source, disambiguator), entry) in index.iter() {
        let hit = index.lookup(context, source, disambiguator).expect("iterated key not found");
        assert_eq!(hit, entry);
        if let lingo::EntryValue::Plural(forms) = entry.value() {
            assert_eq!(forms.len(), slots, "plural entry not sized to rule");
        }
    }

    let text = index.resolve(input.context, input.source, input.disambiguator, input.count, &[]);
    if !input.source.is_empty() && !input.source.contains('%') {
        assert!(!text.is_empty(), "non-empty source resolved to empty text");
    }
});
