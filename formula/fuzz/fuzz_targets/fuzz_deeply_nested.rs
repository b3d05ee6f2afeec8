#![no_main]

use formula::Engine;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|shape: (u8, bool)| {
    let (depth, ternary) = shape;
    let engine = Engine::new();

    let mut expr = String::from("1");
    for _ in 0..depth {
        expr = if ternary {
            format!("true ? ({}) : 0", expr)
        } else {
            format!("({} + 1)", expr)
        };
    }

    let _ = engine.calculate(&expr);
});
