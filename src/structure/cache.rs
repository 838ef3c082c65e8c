// Mon Oct 19 2026 - Alex

use crate::schema::DefId;
use crate::structure::{ClassAlignment, ClassLayout};
use std::collections::HashMap;

/// Per-session memo of alignments and finished layouts. Once an entry is
/// fixed it is never recomputed.
pub struct LayoutCache {
    alignments: HashMap<DefId, ClassAlignment>,
    layouts: HashMap<DefId, ClassLayout>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            alignments: HashMap::new(),
            layouts: HashMap::new(),
        }
    }

    pub fn alignment(&self, id: DefId) -> Option<ClassAlignment> {
        self.alignments.get(&id).copied()
    }

    pub fn insert_alignment(&mut self, id: DefId, alignment: ClassAlignment) {
        self.alignments.entry(id).or_insert(alignment);
    }

    pub fn layout(&self, id: DefId) -> Option<&ClassLayout> {
        self.layouts.get(&id)
    }

    pub fn insert_layout(&mut self, layout: ClassLayout) {
        self.layouts.entry(layout.def).or_insert(layout);
    }

    pub fn size(&self) -> usize {
        self.layouts.len()
    }
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}
