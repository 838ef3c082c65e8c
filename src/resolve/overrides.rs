// Mon Oct 19 2026 - Alex

use crate::config::GeneratorConfig;
use std::collections::HashSet;

/// Names treated as already defined elsewhere. Emission for them is
/// suppressed; consistency checks still run.
#[derive(Debug, Clone, Default)]
pub struct OverrideSet {
    names: HashSet<String>,
}

impl OverrideSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        let mut set = Self::new();
        set.extend(config.override_names());
        set
    }

    pub fn insert(&mut self, name: &str) -> bool {
        self.names.insert(name.to_string())
    }

    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
