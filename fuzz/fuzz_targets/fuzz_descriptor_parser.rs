//! Fuzz target for resource descriptor input (JSON array or JSON Lines).
//!
//! Goal: parsing and evaluating against a fully configured pack should **never panic**.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_descriptor_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use stackguard_settings::{load_pack, Overrides};

const CONFIG: &str = r#"{
  "required-tags": { "requiredTags": ["Department", "Owner"] },
  "max-cpu": { "maxCpu": 1024, "maxMemory": 2048 }
}"#;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(resources) = stackguard_app::parse_descriptors(text) else {
        return;
    };
    let Ok(pack) = load_pack(CONFIG, false, &Overrides::default()) else {
        return;
    };
    let _ = stackguard_domain::evaluate(&pack, &resources);
});
