#![no_main]
use libfuzzer_sys::fuzz_target;

use php_array_json::{convert_with, ConvertOptions};

fuzz_target!(|data: &[u8]| {
    // Only UTF-8 input can reach the converter.
    if let Ok(s) = std::str::from_utf8(data) {
        // Looking for panics; both policies must hold up.
        let _ = convert_with(s, &ConvertOptions::default());
        let _ = convert_with(s, &ConvertOptions::default().strict(true));
    }
});
