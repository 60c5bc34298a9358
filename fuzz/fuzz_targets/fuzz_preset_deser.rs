//! Arbitrary bytes through the preset parser: must never panic, and anything
//! that parses must survive a serialize/parse cycle and validation.

#![no_main]

use libfuzzer_sys::fuzz_target;
use spaceswitch_spec::{validate_switch, SwitchSpec};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(spec) = SwitchSpec::from_json(text) else {
        return;
    };

    let _ = validate_switch(&spec);
    if let Ok(json) = spec.to_json() {
        // non-finite values do not survive JSON, everything else must
        if let Ok(reparsed) = SwitchSpec::from_json(&json) {
            assert_eq!(reparsed, spec);
        }
    }
});
