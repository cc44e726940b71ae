//! Fuzzing library for x-bookmarks.
//!
//! Targets cover the parsing of everything the token endpoint can send back.
//!
//! # Usage
//!
//! ```bash
//! cd crates/x-bookmarks-fuzz
//! cargo +nightly fuzz run fuzz_token_response -- -max_total_time=60
//! ```

pub use x_bookmarks::oauth;
