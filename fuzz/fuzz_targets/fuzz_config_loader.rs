//! Fuzz target for policy configuration loading.
//!
//! Goal: loading should **never panic** on any input, in either format.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_loader
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use stackguard_settings::{load_pack, Overrides};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let overrides = Overrides::default();
        let _ = load_pack(text, false, &overrides);
        let _ = load_pack(text, true, &overrides);
    }
});
