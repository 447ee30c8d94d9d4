use loadgen_core::compute::{fibonacci, large_object, size_of_large_object};

#[test]
fn fibonacci_matches_the_sequence() {
    let expected: [u64; 11] = [0, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55];
    for (n, want) in expected.iter().enumerate() {
        assert_eq!(fibonacci(n as u32), *want);
    }
    assert_eq!(fibonacci(20), 6765);
    assert_eq!(fibonacci(30), 832_040);
}

#[test]
fn large_object_has_factor_keys_of_factor_distinct_items() {
    let object = large_object(8);
    assert_eq!(object.len(), 8);

    let mut seen = std::collections::HashSet::new();
    for (key, items) in &object {
        assert_eq!(key.len(), 10);
        assert_eq!(items.len(), 8);
        for item in items {
            assert_eq!(item.len(), 102);
            assert!(seen.insert(item.clone()), "duplicate item: {}", item);
        }
    }
    assert_eq!(seen.len(), 64);
}

#[test]
fn large_object_is_empty_for_factor_zero() {
    assert!(large_object(0).is_empty());
}

#[test]
fn size_of_large_object_is_deterministic() {
    let a = size_of_large_object(&large_object(100)).unwrap();
    let b = size_of_large_object(&large_object(100)).unwrap();
    assert_eq!(a, b);
    // 100 keys of 10 digits, 10_000 items of 102 chars, plus JSON syntax:
    // 105 * factor^2 + 15 * factor + 1.
    assert_eq!(a, 1_051_501);
}
