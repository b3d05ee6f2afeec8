#![no_main]

use formula::{parse, Environment, ResourceLimits};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let env = Environment::with_defaults();
        let _ = parse(s, &env, &ResourceLimits::default());
    }
});
