//! Fuzz target for multi-line redaction.
//!
//! Line structure must survive: same number of line terminators in and out.

#![no_main]

use ar_redact::RedactionFilter;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let filter = RedactionFilter::new();
    let (out, stats) = filter.redact_text(text);
    assert_eq!(
        text.matches('\n').count(),
        out.matches('\n').count(),
        "line count changed"
    );
    if stats.total_hits() == 0 {
        assert_eq!(text, out);
    }
});
