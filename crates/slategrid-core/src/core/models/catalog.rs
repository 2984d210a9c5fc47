use super::item::{
    ArtifactTraits, BuffCoord, BuffPattern, Condition, ConditionRule, ItemCategory,
    ItemDefinition, ItemKind, Rarity, Rotation, RuleType, SlateTraits,
};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::warn;

/// The parsed item collections as delivered by the data-loading collaborator.
///
/// Category is decided by which collection a definition comes from; ids are never inspected
/// for prefixes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCatalog {
    #[serde(default)]
    pub artifacts: Vec<RawArtifact>,
    #[serde(default)]
    pub slates: Vec<RawSlate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArtifact {
    pub id: String,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub max_upgrade: u32,
    #[serde(default)]
    pub condition: Option<RawCondition>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSlate {
    pub id: String,
    #[serde(default)]
    pub max_upgrade: u32,
    #[serde(default)]
    pub rotatable: bool,
    #[serde(default, alias = "buffcoords")]
    pub buff_coords: Option<RawBuffCoords>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawCondition {
    Bare(String),
    Structured {
        #[serde(rename = "type")]
        rule: String,
        #[serde(default)]
        modes: Vec<RawMode>,
        #[serde(default)]
        unlockable: bool,
    },
}

/// A selectable global effect mode, given either as a plain name or as an object with a
/// `name` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawMode {
    Name(String),
    Described { name: String },
}

impl From<RawMode> for String {
    fn from(mode: RawMode) -> Self {
        match mode {
            RawMode::Name(name) | RawMode::Described { name } => name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawBuffCoords {
    Unkeyed(Vec<RawBuffTuple>),
    ByRotation(BTreeMap<String, Vec<RawBuffTuple>>),
}

/// A `[dx, dy, level, effectTag]` array; the tag may be omitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawBuffTuple {
    Tagged(i32, i32, u32, String),
    Untagged(i32, i32, u32),
}

impl From<RawBuffTuple> for BuffCoord {
    fn from(raw: RawBuffTuple) -> Self {
        match raw {
            RawBuffTuple::Tagged(dx, dy, level, tag) => BuffCoord::new(dx, dy, level, Some(&tag)),
            RawBuffTuple::Untagged(dx, dy, level) => BuffCoord::new(dx, dy, level, None),
        }
    }
}

impl From<RawCondition> for Condition {
    fn from(raw: RawCondition) -> Self {
        let parse = |name: &str| -> RuleType {
            let Ok(rule) = name.parse::<RuleType>();
            rule
        };
        match raw {
            RawCondition::Bare(name) => Condition::Bare(parse(&name)),
            RawCondition::Structured {
                rule,
                modes,
                unlockable,
            } => Condition::Structured(ConditionRule {
                rule: parse(&rule),
                modes: modes.into_iter().map(Into::into).collect(),
                unlockable,
            }),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Duplicate item id '{0}' in catalog")]
    DuplicateId(String),
}

/// Immutable, id-keyed mapping of every known item definition.
///
/// Built once from the parsed collections and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: HashMap<String, ItemDefinition>,
}

impl Catalog {
    pub fn new<I>(definitions: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = ItemDefinition>,
    {
        let mut items = HashMap::new();
        for definition in definitions {
            if items.contains_key(&definition.id) {
                return Err(CatalogError::DuplicateId(definition.id));
            }
            items.insert(definition.id.clone(), definition);
        }
        Ok(Self { items })
    }

    pub fn from_raw(raw: RawCatalog) -> Result<Self, CatalogError> {
        let artifacts = raw.artifacts.into_iter().map(convert_artifact);
        let slates = raw.slates.into_iter().map(convert_slate);
        Self::new(artifacts.chain(slates))
    }

    pub fn get(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.values()
    }

    pub fn of_category(&self, category: ItemCategory) -> impl Iterator<Item = &ItemDefinition> {
        self.iter().filter(move |def| def.category() == category)
    }

    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a ItemDefinition> {
        self.iter().filter(move |def| def.has_tag(tag))
    }
}

fn convert_artifact(raw: RawArtifact) -> ItemDefinition {
    let rarity = raw
        .rarity
        .as_deref()
        .map(|name| {
            let Ok(rarity) = name.parse::<Rarity>();
            rarity
        })
        .unwrap_or(Rarity::Unknown);

    ItemDefinition {
        id: raw.id,
        kind: ItemKind::Artifact(ArtifactTraits {
            rarity,
            condition: raw.condition.map(Into::into),
        }),
        max_upgrade: raw.max_upgrade,
        tags: raw.tags,
    }
}

/// Builds a slate definition. Coordinates that are missing or do not match the
/// `rotatable` flag leave the slate without any projected buff.
fn convert_slate(raw: RawSlate) -> ItemDefinition {
    let pattern = match (raw.rotatable, raw.buff_coords) {
        (false, Some(RawBuffCoords::Unkeyed(list))) => {
            BuffPattern::Fixed(list.into_iter().map(Into::into).collect())
        }
        (true, Some(RawBuffCoords::ByRotation(keyed))) => {
            let mut by_rotation: HashMap<Rotation, Vec<BuffCoord>> = HashMap::new();
            for (key, list) in keyed {
                let Ok(rotation) = key.parse::<Rotation>() else {
                    warn!(id = %raw.id, key = %key, "Ignoring buff coordinates under an invalid rotation key.");
                    continue;
                };
                by_rotation.insert(rotation, list.into_iter().map(Into::into).collect());
            }
            BuffPattern::Rotating(by_rotation)
        }
        (rotatable, coords) => {
            warn!(
                id = %raw.id,
                rotatable,
                has_coords = coords.is_some(),
                "Slate buff coordinates are missing or do not match its rotatable flag; it projects nothing."
            );
            if rotatable {
                BuffPattern::Rotating(HashMap::new())
            } else {
                BuffPattern::Fixed(Vec::new())
            }
        }
    };

    ItemDefinition {
        id: raw.id,
        kind: ItemKind::Slate(SlateTraits {
            rotatable: raw.rotatable,
            pattern,
        }),
        max_upgrade: raw.max_upgrade,
        tags: raw.tags,
    }
}
