use formula::{Engine, Value, Variables};
use std::sync::Arc;
use std::thread;

#[test]
fn test_compiled_expression_across_threads() {
    let compiled = Arc::new(
        Engine::new()
            .compile("$x % 2 == 0 ? $x / 2 : 3 * $x + 1")
            .unwrap(),
    );

    let handles: Vec<_> = (1..=16)
        .map(|n| {
            let compiled = Arc::clone(&compiled);
            thread::spawn(move || {
                let mut vars = Variables::new();
                vars.insert("x".to_string(), Value::Number(f64::from(n)));
                (n, compiled.evaluate(Some(&vars)).unwrap())
            })
        })
        .collect();

    for handle in handles {
        let (n, value) = handle.join().unwrap();
        let expected = if n % 2 == 0 { n / 2 } else { 3 * n + 1 };
        assert_eq!(value, Value::Number(f64::from(expected)), "x = {}", n);
    }
}

#[test]
fn test_engine_shared_between_threads() {
    let engine = Arc::new(Engine::new());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || engine.calculate(&format!("{} * {}", i, i)))
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let result = handle.join().unwrap();
        assert!(result.success);
        assert_eq!(result.value, Some(Value::Number((i * i) as f64)));
    }
}

#[test]
fn test_cloned_engines_diverge() {
    let base = Engine::new();
    let compiled = base.compile("pi > 3").unwrap();

    let mut custom = base.clone();
    custom
        .environment_mut()
        .add_constant("pi", Value::Number(3.0));

    assert_eq!(
        custom.evaluate("pi > 3", None).unwrap(),
        Value::Boolean(false)
    );
    assert_eq!(base.evaluate("pi > 3", None).unwrap(), Value::Boolean(true));
    assert_eq!(compiled.evaluate(None).unwrap(), Value::Boolean(true));
}
