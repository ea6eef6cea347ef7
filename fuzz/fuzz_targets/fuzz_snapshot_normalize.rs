//! Fuzz target for snapshot format detection and normalisation.
//!
//! Goal: normalising a Pulumi preview, stack export or plain graph should **never panic**.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_snapshot_normalize
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = infraguard_graph::fuzz::normalize_text(text);
    }
});
