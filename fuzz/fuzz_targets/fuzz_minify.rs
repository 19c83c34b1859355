#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        // Minify must never panic, and minifying its output changes nothing
        if let Ok(once) = clgen::minify(text) {
            let twice = clgen::minify(&once).expect("minified output failed to minify");
            assert_eq!(once, twice);
        }
    }
});
