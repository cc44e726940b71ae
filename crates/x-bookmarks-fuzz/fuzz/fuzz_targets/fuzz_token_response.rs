#![no_main]

use libfuzzer_sys::fuzz_target;
use x_bookmarks::TokenResponse;

fuzz_target!(|data: &[u8]| {
    // Should never panic, only return Ok or Err
    if let Ok(token) = serde_json::from_slice::<TokenResponse>(data) {
        let _ = format!("{token:?}");
    }
});
