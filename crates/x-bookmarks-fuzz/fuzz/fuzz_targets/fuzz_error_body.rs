#![no_main]

use libfuzzer_sys::fuzz_target;
use x_bookmarks::oauth::exchange::classify_error_body;

fuzz_target!(|data: &[u8]| {
    // Any provider error body yields a message, never a panic
    let _ = classify_error_body(data);
});
