//! Fuzz target for graph decoding and evaluation.
//!
//! Goal: any JSON value either decodes to an input fault or evaluates to a report.
//! Rule faults are reported as violations; nothing may panic out of the evaluator.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_evaluate_graph
//! ```

#![no_main]

use infraguard_domain::Registry;
use infraguard_domain::policy::EffectiveConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let registry = Registry::builtin();
    let _ = infraguard_domain::evaluate_value(&value, &registry, &EffectiveConfig::default());
});
