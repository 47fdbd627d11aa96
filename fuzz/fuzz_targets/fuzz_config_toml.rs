//! Fuzz target for config.toml parsing.
//!
//! Parsing and filter construction should only ever return errors.

#![no_main]

use ar_core::AppConfig;
use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = AppConfig::from_toml(text, Path::new("fuzz.toml")) {
        let _ = config.redaction_filter();
    }
});
