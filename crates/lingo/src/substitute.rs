//! Positional placeholder substitution.
//!
//! | Marker | Replaced by |
//! |--------|-------------|
//! | `%1`…`%99` | positional argument (1-based) |
//! | `%L1`…`%L99` | same as `%1`…`%99` |
//! | `%n`, `%Ln` | the query's count |
//!
//! # Invariants
//!
//! 1. **Single pass**: substituted text is never scanned again, so an
//!    argument containing `%2` stays literal.
//! 2. **Longest match**: `%12` is marker 12, never marker 1 followed by `2`.
//! 3. **Unmatched markers survive**: a marker without a matching argument
//!    (or `%n` without a count) is copied verbatim.
//! 4. **No allocation without markers**: text with nothing to replace is
//!    returned borrowed.

use std::borrow::Cow;
use std::fmt::{Display, Write};

/// Replace markers in `template` with `args` and `count`.
///
/// ```
/// use lingo::substitute;
///
/// assert_eq!(substitute("%1 of %2", &[&3, &10], None), "3 of 10");
/// assert_eq!(substitute("%1 of %2", &[], None), "%1 of %2");
/// assert_eq!(substitute("%Ln file(s)", &[], Some(4)), "4 file(s)");
/// ```
#[must_use]
pub fn substitute<'a>(template: &'a str, args: &[&dyn Display], count: Option<i64>) -> Cow<'a, str> {
    let bytes = template.as_bytes();
    let mut out: Option<String> = None;
    let mut copied = 0;
    let mut pos = 0;

    while let Some(offset) = template[pos..].find('%') {
        let start = pos + offset;
        let Some((marker, end)) = marker_at(bytes, start) else {
            pos = start + 1;
            continue;
        };
        pos = end;

        let replacement: &dyn Display = match marker {
            Marker::Count => match &count {
                Some(count) => count,
                None => continue,
            },
            Marker::Arg(n) => match args.get(n - 1) {
                Some(arg) => *arg,
                None => continue,
            },
        };

        let out = out.get_or_insert_with(|| String::with_capacity(template.len() + 16));
        out.push_str(&template[copied..start]);
        let _ = write!(out, "{replacement}");
        copied = end;
    }

    match out {
        Some(mut out) => {
            out.push_str(&template[copied..]);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(template),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Count,
    Arg(usize),
}

/// Marker starting at `start` (which holds `%`) and the index just past it.
fn marker_at(bytes: &[u8], start: usize) -> Option<(Marker, usize)> {
    let mut at = start + 1;
    if bytes.get(at) == Some(&b'L') {
        at += 1;
    }
    match bytes.get(at)? {
        b'n' => Some((Marker::Count, at + 1)),
        first @ b'1'..=b'9' => {
            let mut n = usize::from(first - b'0');
            at += 1;
            if let Some(second @ b'0'..=b'9') = bytes.get(at) {
                n = n * 10 + usize::from(second - b'0');
                at += 1;
            }
            Some((Marker::Arg(n), at))
        }
        _ => None,
    }
}
