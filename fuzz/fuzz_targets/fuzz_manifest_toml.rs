#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Manifest parsing and validation should never panic
        let _ = clgen::config::parse_with_warnings(content, std::path::Path::new("clgen.toml"));
    }
});
