//! Fuzz target for section rendering.
//!
//! Command output may contain fences and headings of its own; none of it
//! may escape the code block it is rendered in.

#![no_main]

use ar_report::markdown::{render_section, top_level_headings};
use ar_report::Section;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let mut section = Section::new("fuzz", "Fuzz");
    section.code(text, false);
    let rendered = render_section(&section);
    assert_eq!(top_level_headings(&rendered), vec!["Fuzz".to_string()]);
});
