//! CPU- and memory-bound work.

use std::collections::BTreeMap;

use loadgen_common::Result;

/// Classic unmemoized recursion. The exponential running time is the whole
/// point; callers bound the domain to 0..=100 before invoking.
pub fn fibonacci(n: u32) -> u64 {
    if n == 0 {
        0
    } else if n == 1 {
        1
    } else {
        fibonacci(n - 1).wrapping_add(fibonacci(n - 2))
    }
}

const ITEM_PATTERN: &str = "0123456789-0123456789-0123456789-0123456789-0123456-";

/// `factor` zero-padded keys, each holding `factor` distinct ~100-byte
/// strings. Content is fully deterministic so the serialized size is
/// reproducible across runs.
pub fn large_object(factor: usize) -> BTreeMap<String, Vec<String>> {
    let mut map = BTreeMap::new();
    for entry in 0..factor {
        let items = (0..factor)
            .map(|item| format!("{}{:050}", ITEM_PATTERN, item + entry * 1_000_000))
            .collect();
        map.insert(format!("{:010}", entry), items);
    }
    map
}

/// Byte length of the compact JSON encoding. A real serialization pass, not
/// a formula: the measurement has to exercise the same encoder responses use.
pub fn size_of_large_object(object: &BTreeMap<String, Vec<String>>) -> Result<u64> {
    let bytes = serde_json::to_vec(object)?;
    Ok(bytes.len() as u64)
}
