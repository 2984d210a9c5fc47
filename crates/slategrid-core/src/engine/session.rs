use super::config::GridConfig;
use super::error::SessionError;
use super::events::{ChangeCallback, ChangeNotifier, GridChange, ReplaceSummary};
use crate::core::models::catalog::Catalog;
use crate::core::models::grid::PlacementGrid;
use crate::core::models::instance::{CellSpec, PlacedItem, PlacedRole, clamp_priority};
use crate::core::models::item::ItemDefinition;
use crate::core::models::stock::Stock;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Selected global effect mode per artifact id.
pub type GlobalEffectModes = BTreeMap<String, String>;

/// The single owner of a placement: the grid, the unplaced stock and the user's global
/// effect mode selections, checked against an immutable catalog.
///
/// Every mutation either applies completely (including its stock adjustment) or leaves the
/// session untouched. Successful mutations return a [`GridChange`] and are broadcast to
/// subscribed observers.
#[derive(Debug)]
pub struct PlacementSession<'a> {
    catalog: &'a Catalog,
    config: GridConfig,
    pub(crate) grid: PlacementGrid,
    pub(crate) stock: Stock,
    pub(crate) global_modes: GlobalEffectModes,
    pub(crate) notifier: ChangeNotifier<'a>,
}

impl<'a> PlacementSession<'a> {
    /// Creates an empty session.
    ///
    /// # Arguments
    ///
    /// * `catalog` - The item catalog every placement is validated against.
    /// * `config` - Grid width, slot bounds and score normalization.
    /// * `slot_count` - Initial slot count, clamped to the configured bounds.
    pub fn new(catalog: &'a Catalog, config: GridConfig, slot_count: usize) -> Self {
        let slot_count = config.clamp_slot_count(slot_count);
        Self {
            catalog,
            grid: PlacementGrid::new(config.width, slot_count),
            config,
            stock: Stock::new(),
            global_modes: default_modes(catalog),
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn grid(&self) -> &PlacementGrid {
        &self.grid
    }

    pub fn stock(&self) -> &Stock {
        &self.stock
    }

    pub fn global_modes(&self) -> &GlobalEffectModes {
        &self.global_modes
    }

    pub fn slot_count(&self) -> usize {
        self.grid.slot_count()
    }

    /// Registers an observer that receives every committed change.
    pub fn subscribe(&mut self, callback: ChangeCallback<'a>) {
        self.notifier.subscribe(callback);
    }

    pub fn unplaced(&self, item_id: &str) -> u32 {
        self.stock.count(item_id)
    }

    pub fn placed_count(&self, item_id: &str) -> u32 {
        let placed = self
            .grid
            .occupied()
            .filter(|(_, _, item)| item.item_id == item_id)
            .count();
        u32::try_from(placed).unwrap_or(u32::MAX)
    }

    /// Total copies owned: unplaced plus placed.
    pub fn owned(&self, item_id: &str) -> u32 {
        self.unplaced(item_id)
            .saturating_add(self.placed_count(item_id))
    }

    /// Adds owned copies of an item to the unplaced pool.
    pub fn add_stock(&mut self, item_id: &str, copies: u32) -> Result<GridChange, SessionError> {
        self.definition(item_id)?;
        self.stock.add(item_id, copies);
        debug!(item_id, copies, "Added copies to stock.");
        Ok(self.emit(GridChange::StockChanged {
            item_id: item_id.to_string(),
            unplaced: self.stock.count(item_id),
        }))
    }

    /// Sets the total number of owned copies of an item.
    ///
    /// Placed copies are never taken off the grid, so the owned count cannot drop below the
    /// number of copies currently placed.
    pub fn set_owned(&mut self, item_id: &str, owned: u32) -> Result<GridChange, SessionError> {
        self.definition(item_id)?;
        let placed = self.placed_count(item_id);
        if owned < placed {
            warn!(
                item_id,
                owned, placed, "Owned count is below the placed count; keeping placed copies."
            );
        }
        self.stock.set(item_id, owned.saturating_sub(placed));
        Ok(self.emit(GridChange::StockChanged {
            item_id: item_id.to_string(),
            unplaced: self.stock.count(item_id),
        }))
    }

    /// Places a fresh copy of `item_id` into `slot`.
    ///
    /// The new copy starts at upgrade level 0, priority 1 (artifacts) and rotation 0. If the
    /// slot was occupied, the displaced copy goes back to stock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OutOfRange` if `slot` is outside the grid.
    /// Returns `SessionError::CatalogMiss` if `item_id` is not in the catalog.
    /// Returns `SessionError::NoStock` if no unplaced copy of `item_id` is left.
    pub fn place(&mut self, slot: usize, item_id: &str) -> Result<GridChange, SessionError> {
        self.check_slot(slot)?;
        let definition = self.definition(item_id)?;

        // A displaced copy of the same item counts as available stock.
        let replaces_same = self
            .grid
            .get(slot)
            .is_some_and(|current| current.item_id == item_id);
        if !replaces_same && !self.stock.take(item_id) {
            return Err(SessionError::NoStock {
                item_id: item_id.to_string(),
            });
        }
        let displaced = self
            .grid
            .insert(slot, PlacedItem::fresh(definition))
            .and_then(|(_, displaced)| displaced)
            .map(|old| {
                if !replaces_same {
                    self.stock.give(&old.item_id);
                }
                old.item_id
            });

        debug!(slot, item_id, ?displaced, "Placed item.");
        Ok(self.emit(GridChange::Placed {
            slot,
            item_id: item_id.to_string(),
            displaced,
        }))
    }

    /// Clears `slot` and returns its copy to stock; an empty slot is left as is.
    pub fn remove(&mut self, slot: usize) -> Result<Option<GridChange>, SessionError> {
        self.check_slot(slot)?;
        let Some(item) = self.grid.take(slot) else {
            return Ok(None);
        };
        self.stock.give(&item.item_id);
        debug!(slot, item_id = %item.item_id, "Removed item.");
        Ok(Some(self.emit(GridChange::Removed {
            slot,
            item_id: item.item_id,
        })))
    }

    /// Advances the orientation of a rotatable slate by a quarter turn.
    ///
    /// Empty slots, artifacts and non-rotatable slates are left untouched.
    pub fn rotate(&mut self, slot: usize) -> Result<Option<GridChange>, SessionError> {
        self.check_slot(slot)?;
        let Some(item_id) = self.grid.get(slot).map(|item| item.item_id.clone()) else {
            return Ok(None);
        };
        let rotatable = match self.catalog.get(&item_id) {
            Some(definition) => definition.is_rotatable(),
            None => {
                warn!(slot, item_id = %item_id, "Cannot rotate an item missing from the catalog.");
                false
            }
        };
        if !rotatable {
            return Ok(None);
        }
        let Some(item) = self.grid.get_mut(slot) else {
            return Ok(None);
        };
        let PlacedRole::Slate { rotation } = &mut item.role else {
            return Ok(None);
        };
        *rotation = rotation.next();
        let rotation = *rotation;

        debug!(slot, %rotation, "Rotated slate.");
        Ok(Some(self.emit(GridChange::Rotated { slot, rotation })))
    }

    /// Exchanges the contents of two slots, empty or not.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<GridChange, SessionError> {
        self.check_slot(a)?;
        self.check_slot(b)?;
        self.grid.swap(a, b);
        debug!(a, b, "Swapped slots.");
        Ok(self.emit(GridChange::Swapped { a, b }))
    }

    /// Changes the slot count, clamped to the configured bounds.
    ///
    /// Copies in truncated slots go back to stock; new slots start empty. Retained slots keep
    /// their order and contents. Returns `None` if the clamped count is unchanged.
    pub fn resize(&mut self, slot_count: usize) -> Option<GridChange> {
        let from = self.grid.slot_count();
        let to = self.config.clamp_slot_count(slot_count);
        if from == to {
            return None;
        }
        let returned: Vec<String> = self
            .grid
            .set_slot_count(to)
            .into_iter()
            .map(|item| item.item_id)
            .collect();
        for item_id in &returned {
            self.stock.give(item_id);
        }
        debug!(from, to, returned = returned.len(), "Resized grid.");
        Some(self.emit(GridChange::Resized { from, to, returned }))
    }

    /// Replaces the whole board with an externally produced one.
    ///
    /// Every current copy returns to stock first. `cells` is truncated or padded with empty
    /// cells to the live slot count. Cells naming items missing from the catalog are skipped
    /// with a warning. Settings in each cell are clamped to what the item allows.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoStock` if the board uses more copies of an item than are
    /// owned; the session is then left exactly as it was.
    pub fn replace_all(&mut self, cells: Vec<Option<CellSpec>>) -> Result<GridChange, SessionError> {
        self.replace_board(cells).map(GridChange::Replaced)
    }

    pub(crate) fn replace_board(
        &mut self,
        cells: Vec<Option<CellSpec>>,
    ) -> Result<ReplaceSummary, SessionError> {
        self.transaction(|session| {
            let returned = session.grid.clear();
            for item in &returned {
                session.stock.give(&item.item_id);
            }

            let slot_count = session.grid.slot_count();
            if cells.len() != slot_count {
                debug!(
                    provided = cells.len(),
                    slot_count, "Fitting external board to the live slot count."
                );
            }

            let mut summary = ReplaceSummary {
                returned: returned.len(),
                ..ReplaceSummary::default()
            };
            for (slot, spec) in cells.into_iter().take(slot_count).enumerate() {
                let Some(spec) = spec else {
                    continue;
                };
                let Some(definition) = session.catalog.get(&spec.item_id) else {
                    warn!(slot, item_id = %spec.item_id, "Skipping board cell with an unknown item.");
                    summary.skipped += 1;
                    continue;
                };
                if !session.stock.take(&spec.item_id) {
                    return Err(SessionError::NoStock {
                        item_id: spec.item_id,
                    });
                }
                session
                    .grid
                    .insert(slot, PlacedItem::from_spec(definition, &spec));
                summary.placed += 1;
            }

            session.emit(GridChange::Replaced(summary));
            Ok(summary)
        })
    }

    /// Sets the upgrade level of the copy in `slot`, clamped to `[0, max_upgrade]`.
    pub fn set_upgrade_level(
        &mut self,
        slot: usize,
        level: u32,
    ) -> Result<Option<GridChange>, SessionError> {
        self.check_slot(slot)?;
        let Some(item_id) = self.grid.get(slot).map(|item| item.item_id.clone()) else {
            return Ok(None);
        };
        let max_upgrade = self.definition(&item_id)?.max_upgrade;
        let Some(item) = self.grid.get_mut(slot) else {
            return Ok(None);
        };
        item.upgrade_level = level.min(max_upgrade);
        Ok(Some(self.emit(GridChange::InstanceUpdated { slot })))
    }

    /// Sets the priority of the artifact in `slot`, clamped to `[1, 10]`.
    pub fn set_priority(
        &mut self,
        slot: usize,
        priority: u8,
    ) -> Result<Option<GridChange>, SessionError> {
        self.check_slot(slot)?;
        let Some(item) = self.grid.get_mut(slot) else {
            return Ok(None);
        };
        match &mut item.role {
            PlacedRole::Artifact { priority: current } => *current = clamp_priority(priority),
            PlacedRole::Slate { .. } => {
                return Err(SessionError::NotAnArtifact {
                    item_id: item.item_id.clone(),
                });
            }
        }
        Ok(Some(self.emit(GridChange::InstanceUpdated { slot })))
    }

    /// Selects a global effect mode for an artifact.
    ///
    /// The mode must be one of the modes declared by the artifact's structured condition.
    /// Selections are forwarded to the optimizer; local scoring does not interpret them.
    pub fn set_global_mode(&mut self, item_id: &str, mode: &str) -> Result<GridChange, SessionError> {
        let definition = self.definition(item_id)?;
        let artifact = definition
            .as_artifact()
            .ok_or_else(|| SessionError::NotAnArtifact {
                item_id: item_id.to_string(),
            })?;
        let declared = artifact
            .condition
            .as_ref()
            .and_then(|condition| condition.structured())
            .is_some_and(|rule| rule.modes.iter().any(|m| m == mode));
        if !declared {
            return Err(SessionError::InvalidMode {
                item_id: item_id.to_string(),
                mode: mode.to_string(),
            });
        }
        self.global_modes
            .insert(item_id.to_string(), mode.to_string());
        Ok(self.emit(GridChange::GlobalModeChanged {
            item_id: item_id.to_string(),
            mode: Some(mode.to_string()),
        }))
    }

    pub fn clear_global_mode(&mut self, item_id: &str) -> Option<GridChange> {
        self.global_modes.remove(item_id)?;
        Some(self.emit(GridChange::GlobalModeChanged {
            item_id: item_id.to_string(),
            mode: None,
        }))
    }

    /// Empties the board and the stock and resets every global mode to its default.
    ///
    /// The slot count is kept.
    pub fn clear(&mut self) -> GridChange {
        let removed = self.grid.clear().len();
        self.stock = Stock::new();
        self.global_modes = default_modes(self.catalog);
        debug!(removed, "Cleared session.");
        self.emit(GridChange::Cleared { removed })
    }

    fn check_slot(&self, index: usize) -> Result<(), SessionError> {
        if self.grid.contains(index) {
            Ok(())
        } else {
            Err(SessionError::OutOfRange {
                index,
                slot_count: self.grid.slot_count(),
            })
        }
    }

    fn definition(&self, item_id: &str) -> Result<&'a ItemDefinition, SessionError> {
        self.catalog.get(item_id).ok_or_else(|| {
            warn!(item_id, "Item is not in the catalog; ignoring.");
            SessionError::CatalogMiss {
                item_id: item_id.to_string(),
            }
        })
    }

    fn emit(&mut self, change: GridChange) -> GridChange {
        self.notifier.notify(&change);
        change
    }
}

/// The first declared mode of every artifact that declares any.
fn default_modes(catalog: &Catalog) -> GlobalEffectModes {
    catalog
        .iter()
        .filter_map(|definition| {
            let rule = definition.as_artifact()?.condition.as_ref()?.structured()?;
            let mode = rule.modes.first()?;
            Some((definition.id.clone(), mode.clone()))
        })
        .collect()
}
