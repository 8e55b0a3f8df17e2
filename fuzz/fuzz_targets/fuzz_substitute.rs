#![no_main]

use std::fmt::Display;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lingo::substitute;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    template: &'a str,
    args: Vec<&'a str>,
    count: Option<i64>,
}

fuzz_target!(|input: Input<'_>| {
    let args: Vec<&dyn Display> = input.args.iter().map(|a| a as &dyn Display).collect();
    let out = substitute(input.template, &args, input.count);

    // Without a '%' nothing can change.
    if !input.template.contains('%') {
        assert_eq!(out.as_ref(), input.template);
    }
    // With no args and no count every marker survives.
    if args.is_empty() && input.count.is_none() {
        assert_eq!(out.as_ref(), input.template);
    }
});
