use crate::error::{CliError, Result};
use serde::Deserialize;
use slategrid::core::models::catalog::Catalog;
use slategrid::core::models::instance::CellSpec;
use slategrid::core::models::item::Rotation;
use slategrid::engine::config::GridConfig;
use slategrid::engine::session::PlacementSession;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FilePlacement {
    pub slot: usize,
    pub item: String,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default)]
    pub upgrade_level: u32,
    pub priority: Option<u8>,
}

/// A user's owned items and their placement.
///
/// `[stock]` lists the total owned copies per item id; placements draw from them.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct LayoutFile {
    pub slot_count: Option<usize>,
    #[serde(default)]
    pub stock: BTreeMap<String, u32>,
    #[serde(default)]
    pub placements: Vec<FilePlacement>,
    #[serde(default)]
    pub global_modes: BTreeMap<String, String>,
}

impl LayoutFile {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading layout from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Builds a placement session holding this layout.
    ///
    /// A missing slot count means the configured default. The slot count is clamped to the
    /// grid bounds. Placements naming items missing from
    /// the catalog are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Config` for placements outside the grid or sharing a slot, and
    /// `CliError::Session` for unknown stock ids, placements beyond the owned copies and
    /// invalid global modes.
    pub fn into_session<'a>(
        self,
        catalog: &'a Catalog,
        config: GridConfig,
    ) -> Result<PlacementSession<'a>> {
        let slot_count = self.slot_count.unwrap_or(config.default_slots);
        let mut session = PlacementSession::new(catalog, config, slot_count);
        if session.slot_count() != slot_count {
            info!(
                requested = slot_count,
                slot_count = session.slot_count(),
                "Clamped layout slot count to the grid bounds."
            );
        }

        for (item_id, copies) in &self.stock {
            session.add_stock(item_id, *copies)?;
        }

        let mut cells: Vec<Option<CellSpec>> = vec![None; session.slot_count()];
        for placement in self.placements {
            let Some(cell) = cells.get_mut(placement.slot) else {
                return Err(CliError::Config(format!(
                    "Placement of '{}' at slot {} is outside a grid of {} slots",
                    placement.item,
                    placement.slot,
                    session.slot_count()
                )));
            };
            if cell.is_some() {
                return Err(CliError::Config(format!(
                    "Slot {} is assigned more than once",
                    placement.slot
                )));
            }
            *cell = Some(CellSpec {
                item_id: placement.item,
                rotation: placement.rotation,
                upgrade_level: placement.upgrade_level,
                priority: placement.priority,
            });
        }
        session.replace_all(cells)?;

        for (item_id, mode) in &self.global_modes {
            session.set_global_mode(item_id, mode)?;
        }

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slategrid::core::models::item::{
        BuffPattern, Condition, ConditionRule, ItemDefinition, Rarity, RuleType,
    };
    use slategrid::engine::config::GridConfigBuilder;
    use slategrid::engine::error::SessionError;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;

    fn catalog() -> Catalog {
        let mut turns = HashMap::new();
        turns.insert(Rotation::Deg0, vec![]);
        Catalog::new(vec![
            ItemDefinition::artifact("artifact_cup", Rarity::Common, 5),
            ItemDefinition::artifact("artifact_prism", Rarity::Rare, 1).with_condition(
                Condition::Structured(ConditionRule {
                    rule: RuleType::GlobalTagTransform,
                    modes: vec!["fire".to_string()],
                    unlockable: false,
                }),
            ),
            ItemDefinition::slate("slate_turn", true, BuffPattern::Rotating(turns)),
        ])
        .unwrap()
    }

    fn config() -> GridConfig {
        GridConfigBuilder::new()
            .width(4)
            .min_slots(4)
            .max_slots(16)
            .default_slots(10)
            .max_possible_score(100.0)
            .build()
            .unwrap()
    }

    fn parse(toml: &str) -> LayoutFile {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn layout_file_builds_a_session() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layout.toml");
        fs::write(
            &path,
            r#"
            slot-count = 8

            [stock]
            artifact_cup = 3
            artifact_prism = 1
            slate_turn = 1

            [[placements]]
            slot = 1
            item = "artifact_cup"
            upgrade-level = 2
            priority = 4

            [[placements]]
            slot = 6
            item = "slate_turn"
            rotation = 180

            [global-modes]
            artifact_prism = "fire"
            "#,
        )
        .unwrap();

        let catalog = catalog();
        let layout = LayoutFile::from_file(&path).unwrap();
        let session = layout.into_session(&catalog, config()).unwrap();

        assert_eq!(session.slot_count(), 8);
        let cup = session.grid().get(1).unwrap();
        assert_eq!((cup.upgrade_level, cup.priority()), (2, Some(4)));
        assert_eq!(session.grid().get(6).unwrap().rotation(), Rotation::Deg180);
        assert_eq!(session.unplaced("artifact_cup"), 2);
        assert_eq!(session.unplaced("slate_turn"), 0);
        assert_eq!(
            session.global_modes().get("artifact_prism").map(String::as_str),
            Some("fire")
        );
    }

    #[test]
    fn missing_slot_count_uses_default_and_large_counts_are_clamped() {
        let catalog = catalog();
        let session = parse("").into_session(&catalog, config()).unwrap();
        assert_eq!(session.slot_count(), 10);

        let session = parse("slot-count = 99").into_session(&catalog, config()).unwrap();
        assert_eq!(session.slot_count(), 16);
    }

    #[test]
    fn placements_beyond_owned_copies_are_rejected() {
        let catalog = catalog();
        let layout = parse(
            r#"
            [stock]
            artifact_cup = 1
            [[placements]]
            slot = 0
            item = "artifact_cup"
            [[placements]]
            slot = 1
            item = "artifact_cup"
            "#,
        );
        assert!(matches!(
            layout.into_session(&catalog, config()),
            Err(CliError::Session(SessionError::NoStock { .. }))
        ));
    }

    #[test]
    fn out_of_grid_and_duplicate_slots_are_config_errors() {
        let catalog = catalog();
        let outside = parse(
            r#"
            [stock]
            artifact_cup = 1
            [[placements]]
            slot = 10
            item = "artifact_cup"
            "#,
        );
        assert!(matches!(
            outside.into_session(&catalog, config()),
            Err(CliError::Config(_))
        ));

        let doubled = parse(
            r#"
            [stock]
            artifact_cup = 2
            [[placements]]
            slot = 0
            item = "artifact_cup"
            [[placements]]
            slot = 0
            item = "artifact_cup"
            "#,
        );
        assert!(matches!(
            doubled.into_session(&catalog, config()),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn invalid_rotation_and_unknown_keys_fail_to_parse() {
        assert!(toml::from_str::<LayoutFile>("[[placements]]\nslot = 0\nitem = \"x\"\nrotation = 45\n").is_err());
        assert!(toml::from_str::<LayoutFile>("height = 3\n").is_err());
    }

    #[test]
    fn unknown_stock_and_modes_are_session_errors() {
        let catalog = catalog();
        assert!(matches!(
            parse("[stock]\nartifact_ghost = 1\n").into_session(&catalog, config()),
            Err(CliError::Session(SessionError::CatalogMiss { .. }))
        ));
        assert!(matches!(
            parse("[global-modes]\nartifact_prism = \"water\"\n").into_session(&catalog, config()),
            Err(CliError::Session(SessionError::InvalidMode { .. }))
        ));
    }
}
