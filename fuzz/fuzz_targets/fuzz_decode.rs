#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(header) = std::str::from_utf8(data) {
        // Reading back arbitrary header text should never panic
        let _ = clgen::decode(header);
    }
});
