use super::item::{ItemCategory, ItemDefinition, Rotation};

pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 10;
pub const DEFAULT_PRIORITY: u8 = MIN_PRIORITY;

/// Per-category state of a placed copy.
///
/// Priority only exists for artifacts and orientation only for slates, so neither can be
/// set on the wrong kind of item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacedRole {
    Artifact { priority: u8 },
    Slate { rotation: Rotation },
}

/// A copy of a catalog item occupying one grid slot.
///
/// The instance only references its definition by id; the catalog stays the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedItem {
    pub item_id: String,
    pub upgrade_level: u32,
    pub role: PlacedRole,
}

impl PlacedItem {
    /// A freshly placed copy: level 0, default priority, unrotated.
    pub fn fresh(definition: &ItemDefinition) -> Self {
        let role = match definition.category() {
            ItemCategory::Artifact => PlacedRole::Artifact {
                priority: DEFAULT_PRIORITY,
            },
            ItemCategory::Slate => PlacedRole::Slate {
                rotation: Rotation::Deg0,
            },
        };
        Self {
            item_id: definition.id.clone(),
            upgrade_level: 0,
            role,
        }
    }

    /// Builds an instance from externally supplied settings, clamped to what the
    /// definition allows.
    pub fn from_spec(definition: &ItemDefinition, spec: &CellSpec) -> Self {
        let role = match definition.category() {
            ItemCategory::Artifact => PlacedRole::Artifact {
                priority: clamp_priority(spec.priority.unwrap_or(DEFAULT_PRIORITY)),
            },
            ItemCategory::Slate => PlacedRole::Slate {
                rotation: if definition.is_rotatable() {
                    spec.rotation
                } else {
                    Rotation::Deg0
                },
            },
        };
        Self {
            item_id: definition.id.clone(),
            upgrade_level: spec.upgrade_level.min(definition.max_upgrade),
            role,
        }
    }

    pub fn category(&self) -> ItemCategory {
        match self.role {
            PlacedRole::Artifact { .. } => ItemCategory::Artifact,
            PlacedRole::Slate { .. } => ItemCategory::Slate,
        }
    }

    pub fn priority(&self) -> Option<u8> {
        match self.role {
            PlacedRole::Artifact { priority } => Some(priority),
            PlacedRole::Slate { .. } => None,
        }
    }

    pub fn rotation(&self) -> Rotation {
        match self.role {
            PlacedRole::Slate { rotation } => rotation,
            PlacedRole::Artifact { .. } => Rotation::Deg0,
        }
    }
}

/// Requested content of one cell, as produced by an external optimizer or a layout file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSpec {
    pub item_id: String,
    pub rotation: Rotation,
    pub upgrade_level: u32,
    pub priority: Option<u8>,
}

impl CellSpec {
    pub fn new(item_id: &str) -> Self {
        Self {
            item_id: item_id.to_string(),
            rotation: Rotation::Deg0,
            upgrade_level: 0,
            priority: None,
        }
    }
}

pub fn clamp_priority(priority: u8) -> u8 {
    priority.clamp(MIN_PRIORITY, MAX_PRIORITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::item::{BuffPattern, Rarity};

    #[test]
    fn fresh_artifact_has_default_priority_and_no_rotation() {
        let def = ItemDefinition::artifact("artifact_cup", Rarity::Common, 4);
        let placed = PlacedItem::fresh(&def);
        assert_eq!(placed.upgrade_level, 0);
        assert_eq!(placed.priority(), Some(DEFAULT_PRIORITY));
        assert_eq!(placed.rotation(), Rotation::Deg0);
        assert_eq!(placed.category(), ItemCategory::Artifact);
    }

    #[test]
    fn fresh_slate_has_no_priority() {
        let def = ItemDefinition::slate("slate_plain", true, BuffPattern::Fixed(vec![]));
        let placed = PlacedItem::fresh(&def);
        assert_eq!(placed.priority(), None);
        assert_eq!(placed.role, PlacedRole::Slate { rotation: Rotation::Deg0 });
    }

    #[test]
    fn from_spec_clamps_level_and_priority() {
        let def = ItemDefinition::artifact("artifact_cup", Rarity::Common, 4);
        let spec = CellSpec {
            item_id: "artifact_cup".to_string(),
            rotation: Rotation::Deg90,
            upgrade_level: 9,
            priority: Some(42),
        };
        let placed = PlacedItem::from_spec(&def, &spec);
        assert_eq!(placed.upgrade_level, 4);
        assert_eq!(placed.priority(), Some(MAX_PRIORITY));
        assert_eq!(placed.rotation(), Rotation::Deg0);

        let zero_priority = CellSpec {
            priority: Some(0),
            ..CellSpec::new("artifact_cup")
        };
        assert_eq!(
            PlacedItem::from_spec(&def, &zero_priority).priority(),
            Some(MIN_PRIORITY)
        );
    }

    #[test]
    fn from_spec_ignores_rotation_of_fixed_slates() {
        let fixed = ItemDefinition::slate("slate_fixed", false, BuffPattern::Fixed(vec![]));
        let turning = ItemDefinition::slate("slate_turning", true, BuffPattern::Fixed(vec![]));
        let spec = CellSpec {
            rotation: Rotation::Deg180,
            ..CellSpec::new("any")
        };
        assert_eq!(PlacedItem::from_spec(&fixed, &spec).rotation(), Rotation::Deg0);
        assert_eq!(
            PlacedItem::from_spec(&turning, &spec).rotation(),
            Rotation::Deg180
        );
    }
}
