// Mon Oct 19 2026 - Alex

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static TRAILING_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)$").expect("trailing number pattern"));

/// Next candidate name for an atomic whose rendered name is already taken
/// by an instantiation of a different size: `Foo` becomes `Foo0`, `Foo0`
/// becomes `Foo1`.
pub fn disambiguated_name(name: &str) -> String {
    if let Some(found) = TRAILING_NUMBER.find(name) {
        if let Ok(number) = found.as_str().parse::<u64>() {
            return format!("{}{}", &name[..found.start()], number + 1);
        }
    }
    format!("{}0", name)
}

/// Sizes of the atomics defined so far, keyed by rendered name.
#[derive(Debug, Clone, Default)]
pub struct AtomicRegistry {
    sizes: HashMap<String, usize>,
}

impl AtomicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, rendered: &str, size: usize) {
        self.sizes.entry(rendered.to_string()).or_insert(size);
    }

    pub fn size_of(&self, rendered: &str) -> Option<usize> {
        self.sizes.get(rendered).copied()
    }

    /// The size already recorded under `rendered` when it differs from `size`.
    pub fn conflict(&self, rendered: &str, size: usize) -> Option<usize> {
        self.size_of(rendered).filter(|defined| *defined != size)
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disambiguated_name() {
        assert_eq!(disambiguated_name("CUtlVector"), "CUtlVector0");
        assert_eq!(disambiguated_name("CUtlVector0"), "CUtlVector1");
        assert_eq!(disambiguated_name("Vector2"), "Vector3");
        assert_eq!(disambiguated_name("Buffer99"), "Buffer100");
    }

    #[test]
    fn test_registry_conflict() {
        let mut registry = AtomicRegistry::new();
        registry.record("CUtlVector<int32>", 24);
        assert_eq!(registry.conflict("CUtlVector<int32>", 24), None);
        assert_eq!(registry.conflict("CUtlVector<int32>", 32), Some(24));
        assert_eq!(registry.conflict("CUtlVector<float32>", 32), None);

        registry.record("CUtlVector<int32>", 32);
        assert_eq!(registry.size_of("CUtlVector<int32>"), Some(24));
    }
}
