use crate::core::tables;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rarity {
    Common,
    UnCommon,
    Rare,
    Legendary,
    Solidarity,
    Unknown,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::UnCommon => "UnCommon",
            Rarity::Rare => "Rare",
            Rarity::Legendary => "Legendary",
            Rarity::Solidarity => "Solidarity",
            Rarity::Unknown => "Unknown",
        }
    }

    pub fn weight(&self) -> f64 {
        tables::rarity_weight(self.as_str())
    }
}

impl FromStr for Rarity {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "common" => Rarity::Common,
            "uncommon" => Rarity::UnCommon,
            "rare" => Rarity::Rare,
            "legendary" => Rarity::Legendary,
            "solidarity" => Rarity::Solidarity,
            _ => Rarity::Unknown,
        })
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Orientation of a placed slate, in clockwise quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid rotation '{0}': expected one of 0, 90, 180, 270")]
pub struct InvalidRotationError(pub String);

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// The next orientation in the fixed 0 → 90 → 180 → 270 → 0 cycle.
    pub fn next(&self) -> Rotation {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = InvalidRotationError;
    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(InvalidRotationError(other.to_string())),
        }
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

impl FromStr for Rotation {
    type Err = InvalidRotationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u16>()
            .map_err(|_| InvalidRotationError(s.to_string()))
            .and_then(Rotation::try_from)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

/// One projected buff: a cell offset relative to the slate, the level added there, and an
/// optional effect tag.
///
/// `dy` points up the grid: a positive value moves toward lower row indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuffCoord {
    pub dx: i32,
    pub dy: i32,
    pub level: u32,
    pub effect: Option<String>,
}

impl BuffCoord {
    pub fn new(dx: i32, dy: i32, level: u32, effect: Option<&str>) -> Self {
        Self {
            dx,
            dy,
            level,
            effect: effect
                .filter(|tag| *tag != tables::NO_EFFECT_TAG)
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuffPattern {
    /// A single list used whatever the orientation.
    Fixed(Vec<BuffCoord>),
    /// One list per orientation; orientations without an entry project nothing.
    Rotating(HashMap<Rotation, Vec<BuffCoord>>),
}

impl BuffPattern {
    pub fn coords_for(&self, rotation: Rotation) -> Option<&[BuffCoord]> {
        match self {
            BuffPattern::Fixed(coords) => Some(coords),
            BuffPattern::Rotating(by_rotation) => by_rotation.get(&rotation).map(Vec::as_slice),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleType {
    TopRow,
    BottomRow,
    Edge,
    Inner,
    AdjacentHorizontalEmpty,
    GlobalTagTransform,
    GlobalStatFocus,
    GlobalPropertyBoost,
    Other(String),
}

impl RuleType {
    pub fn as_str(&self) -> &str {
        match self {
            RuleType::TopRow => "top_row",
            RuleType::BottomRow => "bottom_row",
            RuleType::Edge => "edge",
            RuleType::Inner => "inner",
            RuleType::AdjacentHorizontalEmpty => "adjacent_horizontal_empty",
            RuleType::GlobalTagTransform => "global_tag_transform",
            RuleType::GlobalStatFocus => "global_stat_focus",
            RuleType::GlobalPropertyBoost => "global_property_boost",
            RuleType::Other(name) => name,
        }
    }

    /// Global rules are resolved through a user-selected mode rather than slot geometry.
    pub fn is_global(&self) -> bool {
        matches!(
            self,
            RuleType::GlobalTagTransform | RuleType::GlobalStatFocus | RuleType::GlobalPropertyBoost
        )
    }
}

impl FromStr for RuleType {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "top_row" => RuleType::TopRow,
            "bottom_row" => RuleType::BottomRow,
            "edge" => RuleType::Edge,
            "inner" => RuleType::Inner,
            "adjacent_horizontal_empty" => RuleType::AdjacentHorizontalEmpty,
            "global_tag_transform" => RuleType::GlobalTagTransform,
            "global_stat_focus" => RuleType::GlobalStatFocus,
            "global_property_boost" => RuleType::GlobalPropertyBoost,
            other => RuleType::Other(other.to_string()),
        })
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionRule {
    pub rule: RuleType,
    pub modes: Vec<String>,
    pub unlockable: bool,
}

/// Placement condition attached to an artifact.
///
/// Only [`Condition::Structured`] conditions can be violated; a bare rule name is kept for
/// display but never blocks scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Bare(RuleType),
    Structured(ConditionRule),
}

impl Condition {
    pub fn rule(&self) -> &RuleType {
        match self {
            Condition::Bare(rule) => rule,
            Condition::Structured(structured) => &structured.rule,
        }
    }

    pub fn structured(&self) -> Option<&ConditionRule> {
        match self {
            Condition::Structured(structured) => Some(structured),
            Condition::Bare(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactTraits {
    pub rarity: Rarity,
    pub condition: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlateTraits {
    pub rotatable: bool,
    pub pattern: BuffPattern,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    Artifact(ArtifactTraits),
    Slate(SlateTraits),
}

/// Discriminant of [`ItemKind`], used where only the category matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Artifact,
    Slate,
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemCategory::Artifact => f.write_str("artifact"),
            ItemCategory::Slate => f.write_str("slate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDefinition {
    pub id: String,
    pub kind: ItemKind,
    pub max_upgrade: u32,
    pub tags: Vec<String>,
}

impl ItemDefinition {
    pub fn artifact(id: &str, rarity: Rarity, max_upgrade: u32) -> Self {
        Self {
            id: id.to_string(),
            kind: ItemKind::Artifact(ArtifactTraits {
                rarity,
                condition: None,
            }),
            max_upgrade,
            tags: Vec::new(),
        }
    }

    pub fn slate(id: &str, rotatable: bool, pattern: BuffPattern) -> Self {
        Self {
            id: id.to_string(),
            kind: ItemKind::Slate(SlateTraits { rotatable, pattern }),
            max_upgrade: 0,
            tags: Vec::new(),
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        if let ItemKind::Artifact(traits) = &mut self.kind {
            traits.condition = Some(condition);
        }
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn category(&self) -> ItemCategory {
        match self.kind {
            ItemKind::Artifact(_) => ItemCategory::Artifact,
            ItemKind::Slate(_) => ItemCategory::Slate,
        }
    }

    pub fn as_artifact(&self) -> Option<&ArtifactTraits> {
        match &self.kind {
            ItemKind::Artifact(traits) => Some(traits),
            ItemKind::Slate(_) => None,
        }
    }

    pub fn as_slate(&self) -> Option<&SlateTraits> {
        match &self.kind {
            ItemKind::Slate(traits) => Some(traits),
            ItemKind::Artifact(_) => None,
        }
    }

    pub fn is_rotatable(&self) -> bool {
        self.as_slate().is_some_and(|slate| slate.rotatable)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rarity_parses_case_insensitively() {
        assert_eq!("uncommon".parse::<Rarity>(), Ok(Rarity::UnCommon));
        assert_eq!("LEGENDARY".parse::<Rarity>(), Ok(Rarity::Legendary));
        assert_eq!("Solidarity".parse::<Rarity>(), Ok(Rarity::Solidarity));
    }

    #[test]
    fn unknown_rarity_weighs_like_common() {
        let rarity: Rarity = "Mythic".parse().unwrap();
        assert_eq!(rarity, Rarity::Unknown);
        assert_eq!(rarity.weight(), 1.0);
        assert_eq!(Rarity::Legendary.weight(), 2.5);
    }

    #[test]
    fn rotation_cycles_with_period_four() {
        let mut rotation = Rotation::Deg0;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(rotation.degrees());
            rotation = rotation.next();
        }
        assert_eq!(seen, vec![0, 90, 180, 270]);
        assert_eq!(rotation, Rotation::Deg0);
    }

    #[test]
    fn rotation_rejects_non_quarter_turns() {
        assert_eq!("180".parse::<Rotation>(), Ok(Rotation::Deg180));
        assert!("45".parse::<Rotation>().is_err());
        assert!("east".parse::<Rotation>().is_err());
        assert!(Rotation::try_from(360).is_err());
    }

    #[test]
    fn rotation_serializes_as_degrees() {
        let json = serde_json::to_string(&Rotation::Deg270).unwrap();
        assert_eq!(json, "270");
        let parsed: Rotation = serde_json::from_str("90").unwrap();
        assert_eq!(parsed, Rotation::Deg90);
        assert!(serde_json::from_str::<Rotation>("91").is_err());
    }

    #[test]
    fn buff_coord_drops_the_none_tag() {
        assert_eq!(BuffCoord::new(1, 0, 3, Some("none")).effect, None);
        assert_eq!(
            BuffCoord::new(1, 0, 3, Some("limitUnlock")).effect.as_deref(),
            Some("limitUnlock")
        );
    }

    #[test]
    fn rotating_pattern_without_entry_projects_nothing() {
        let mut by_rotation = HashMap::new();
        by_rotation.insert(Rotation::Deg0, vec![BuffCoord::new(1, 0, 1, None)]);
        let pattern = BuffPattern::Rotating(by_rotation);
        assert_eq!(pattern.coords_for(Rotation::Deg0).map(<[_]>::len), Some(1));
        assert!(pattern.coords_for(Rotation::Deg90).is_none());

        let fixed = BuffPattern::Fixed(vec![BuffCoord::new(0, 1, 2, None)]);
        assert!(fixed.coords_for(Rotation::Deg270).is_some());
    }

    #[test]
    fn rule_type_keeps_unrecognized_names() {
        assert_eq!("edge".parse::<RuleType>(), Ok(RuleType::Edge));
        let other: RuleType = "diagonal_only".parse().unwrap();
        assert_eq!(other, RuleType::Other("diagonal_only".to_string()));
        assert_eq!(other.to_string(), "diagonal_only");
        assert!(RuleType::GlobalStatFocus.is_global());
        assert!(!RuleType::Inner.is_global());
    }

    #[test]
    fn artifacts_are_never_rotatable() {
        let artifact = ItemDefinition::artifact("artifact_lamp", Rarity::Rare, 5);
        let slate = ItemDefinition::slate("slate_arrow", true, BuffPattern::Fixed(vec![]));
        assert!(!artifact.is_rotatable());
        assert!(slate.is_rotatable());
        assert_eq!(artifact.category(), ItemCategory::Artifact);
        assert_eq!(slate.category(), ItemCategory::Slate);
    }

    #[test]
    fn with_condition_is_ignored_for_slates() {
        let slate = ItemDefinition::slate("slate_fixed", false, BuffPattern::Fixed(vec![]))
            .with_condition(Condition::Bare(RuleType::Edge));
        assert!(slate.as_artifact().is_none());
    }
}
