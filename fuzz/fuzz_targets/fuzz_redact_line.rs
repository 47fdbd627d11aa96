//! Fuzz target for single-line redaction.
//!
//! Checks that the filter never panics and is idempotent on arbitrary input,
//! in both IPv4 modes.

#![no_main]

use ar_redact::{Ipv4Mode, RedactionFilter, RedactionRule};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    line: String,
    strict_ipv4: bool,
}

fuzz_target!(|input: Input| {
    let mode = if input.strict_ipv4 {
        Ipv4Mode::Strict
    } else {
        Ipv4Mode::Syntactic
    };
    let filter = RedactionFilter::with_rules(RedactionRule::builtin(mode));

    let once = filter.redact_line(&input.line);
    let twice = filter.redact_line(&once.output);
    assert_eq!(once.output, twice.output);
    assert_eq!(twice.total_hits(), 0);
});
