#![no_main]

use formula::{Engine, ErrorCode, Value, Variables};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let engine = Engine::new();
        let mut vars = Variables::new();
        vars.insert("x".to_string(), Value::Number(100.0));
        vars.insert("y".to_string(), Value::Number(0.0));

        let result = engine.calculate_with(s, &vars);
        assert_eq!(result.success, result.value.is_some());
        if let Some(error) = result.first_error() {
            assert_ne!(error.code, ErrorCode::UnexpectedException, "{}", error);
        }
    }
});
