// Mon Oct 19 2026 - Alex

use bitflags::bitflags;
use indexmap::IndexMap;

bitflags! {
    /// Switches that shape what a generation run emits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GenerateFlags: u32 {
        const ADD_COMMENTS = 1 << 0;
        /// Types of the linked SDK are taken as already defined.
        const SUPPLY_SDK = 1 << 1;
        const STATIC_ASSERTS = 1 << 2;
        const SILENT = 1 << 3;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootSelection {
    All,
    Named(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub flags: GenerateFlags,
    /// Alignments forced for classes the dump reports wrongly.
    pub alignment_overrides: IndexMap<String, usize>,
    /// Names treated as defined elsewhere, on top of the built-in lists.
    pub extra_overrides: Vec<String>,
    pub roots: RootSelection,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let mut alignment_overrides = IndexMap::new();
        alignment_overrides.insert("EngineLoopState_t".to_string(), 8);

        Self {
            flags: GenerateFlags::empty(),
            alignment_overrides,
            extra_overrides: Vec::new(),
            roots: RootSelection::All,
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flags(mut self, flags: GenerateFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_alignment_override(mut self, name: &str, alignment: usize) -> Self {
        self.alignment_overrides.insert(name.to_string(), alignment);
        self
    }

    pub fn with_overrides<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_overrides.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_roots(mut self, roots: Vec<String>) -> Self {
        self.roots = if roots.is_empty() || roots.iter().any(|r| r == "all") {
            RootSelection::All
        } else {
            RootSelection::Named(roots)
        };
        self
    }

    pub fn has_flag(&self, flag: GenerateFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn alignment_override(&self, name: &str) -> Option<usize> {
        self.alignment_overrides.get(name).copied()
    }

    /// Every name that starts out in the session's override set.
    pub fn override_names(&self) -> Vec<String> {
        let mut names: Vec<String> = std_common_types().iter().map(|s| s.to_string()).collect();
        if self.has_flag(GenerateFlags::SUPPLY_SDK) {
            names.extend(sdk_common_types().iter().map(|s| s.to_string()));
        }
        names.extend(self.extra_overrides.iter().cloned());
        names
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, alignment) in &self.alignment_overrides {
            if *alignment == 0 || !alignment.is_power_of_two() {
                return Err(format!("alignment override for {} must be a power of two, got {}", name, alignment));
            }
        }
        if let RootSelection::Named(names) = &self.roots {
            if names.iter().any(|n| n.is_empty()) {
                return Err("requested class names must not be empty".to_string());
            }
        }
        Ok(())
    }
}

/// Fixed-width names every generated header typedefs up front.
pub fn std_common_types() -> &'static [&'static str] {
    &[
        "int8", "uint8", "int16", "uint16", "int32", "uint32", "int64", "uint64", "float32", "float64", "bool",
        "char", "void",
    ]
}

/// Types a linked SDK already defines.
pub fn sdk_common_types() -> &'static [&'static str] {
    &[
        "int8", "uint8", "int16", "uint16", "int32", "uint32", "int64", "uint64", "float32", "float64",
        "CUtlVector", "VectorAligned", "Vector", "Vector2D", "Vector4D", "matrix3x4_t", "matrix3x4a_t",
        "QAngle", "Quaternion", "Color", "CUtlString", "CUtlStringToken", "CUtlMap", "CUtlOrderedMap",
        "RadianEuler", "ThreeState_t", "CBufferString", "CBufferStringN", "CUtlHashtable", "CUtlLinkedList",
        "KeyValues", "KeyValues3", "SolidType_t", "RenderMode_t", "RenderFx_t", "MoveType_t", "MoveCollide_t",
        "LifeState_t", "CEntityIdentity", "CEntityInstance", "WorldGroupId_t", "CEntityIndex", "CPlayerSlot",
        "HitGroup_t", "EntComponentInfo_t", "CVariantDefaultAllocator", "CVariant", "CVariantBase",
        "CUtlSymbolLarge", "CTransform", "HSCRIPT", "fieldtype_t", "CScriptComponent", "CEntityComponent",
        "CPhysSurfacePropertiesSoundNames", "CPhysSurfacePropertiesPhysics", "CPhysSurfacePropertiesAudio",
        "CPhysSurfaceProperties", "CHitBox", "CEntityHandle", "ChangeAccessorFieldPathIndex_t",
        "CEntityComponentHelper", "soundlevel_t", "SoundFlags_t", "RenderMultisampleType_t", "EngineLoopState_t",
        "GameTime_t", "CUtlSymbol", "EntityIOTargetType_t", "EntityDormancyType_t", "CSplitScreenSlot", "CHandle",
        "CSmartPtr", "CUtlLeanVectorFixedGrowable", "CUtlLeanVector", "CUtlVectorFixedGrowable",
        "EventClientOutput_t", "CUtlDict", "ENetworkDisconnectionReason", "CBitVec", "Flags_t",
        "CPhysSurfacePropertiesVehicle",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_alignment_override() {
        let config = GeneratorConfig::new();
        assert_eq!(config.alignment_override("EngineLoopState_t"), Some(8));
        assert_eq!(config.alignment_override("CBaseEntity"), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_override_names_follow_sdk_flag() {
        let plain = GeneratorConfig::new().override_names();
        assert!(plain.contains(&"int32".to_string()));
        assert!(!plain.contains(&"CUtlVector".to_string()));

        let sdk = GeneratorConfig::new()
            .with_flags(GenerateFlags::SUPPLY_SDK)
            .with_overrides(["CMyType"])
            .override_names();
        assert!(sdk.contains(&"CUtlVector".to_string()));
        assert!(sdk.contains(&"CMyType".to_string()));
    }

    #[test]
    fn test_roots_selection() {
        assert_eq!(GeneratorConfig::new().with_roots(vec!["all".into()]).roots, RootSelection::All);
        assert_eq!(
            GeneratorConfig::new().with_roots(vec!["CBaseEntity".into()]).roots,
            RootSelection::Named(vec!["CBaseEntity".into()])
        );
    }

    #[test]
    fn test_validate_rejects_bad_alignment() {
        let config = GeneratorConfig::new().with_alignment_override("CFoo", 3);
        assert!(config.validate().is_err());
    }
}
