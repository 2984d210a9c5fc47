use crate::core::models::catalog::Catalog;
use crate::core::models::grid::PlacementGrid;
use tracing::{debug, warn};

/// Per-slot buff level and active effect tag, derived from the slates on a grid.
///
/// Never stored on a session; recompute it with [`propagate`] after every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuffMap {
    levels: Vec<u32>,
    effects: Vec<Option<String>>,
}

impl BuffMap {
    pub fn empty(slot_count: usize) -> Self {
        Self {
            levels: vec![0; slot_count],
            effects: vec![None; slot_count],
        }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    #[inline]
    pub fn level(&self, slot: usize) -> u32 {
        self.levels.get(slot).copied().unwrap_or(0)
    }

    #[inline]
    pub fn effect(&self, slot: usize) -> Option<&str> {
        self.effects.get(slot).and_then(|effect| effect.as_deref())
    }

    pub fn levels(&self) -> &[u32] {
        &self.levels
    }

    pub fn effects(&self) -> &[Option<String>] {
        &self.effects
    }
}

/// Projects every slate's buff pattern onto the grid.
///
/// Slates are visited in ascending slot order. For a slate at `(x, y)` each pattern entry
/// `(dx, dy, level, effect)` targets `(x + dx, y - dy)`; targets outside the grid or past
/// the live slot count are dropped. Levels add up, while an effect tag overwrites whatever
/// an earlier slate wrote to the same cell.
///
/// Slates missing from the catalog and slates with no pattern for their current rotation
/// contribute nothing.
///
/// # Arguments
///
/// * `grid` - The placement to project buffs onto.
/// * `catalog` - Definitions for the placed items.
///
/// # Return
///
/// A [`BuffMap`] with one entry per slot of `grid`.
pub fn propagate(grid: &PlacementGrid, catalog: &Catalog) -> BuffMap {
    let mut map = BuffMap::empty(grid.slot_count());

    for (slot, _, item) in grid.occupied() {
        let Some(definition) = catalog.get(&item.item_id) else {
            warn!(slot, item_id = %item.item_id, "Placed item is not in the catalog; no buffs projected.");
            continue;
        };
        let Some(slate) = definition.as_slate() else {
            continue;
        };
        let rotation = item.rotation();
        let Some(coords) = slate.pattern.coords_for(rotation) else {
            debug!(slot, item_id = %item.item_id, %rotation, "Slate has no buff pattern for its rotation.");
            continue;
        };

        let (x, y) = grid.coords(slot);
        for coord in coords {
            let target_x = x as i64 + i64::from(coord.dx);
            let target_y = y as i64 - i64::from(coord.dy);
            let Some(target) = grid.index_at(target_x, target_y) else {
                continue;
            };
            map.levels[target] += coord.level;
            if let Some(effect) = &coord.effect {
                map.effects[target] = Some(effect.clone());
            }
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::instance::{CellSpec, PlacedItem};
    use crate::core::models::item::{BuffCoord, BuffPattern, ItemDefinition, Rotation};
    use std::collections::HashMap;

    fn place(grid: &mut PlacementGrid, catalog: &Catalog, slot: usize, id: &str, rotation: Rotation) {
        let spec = CellSpec {
            rotation,
            ..CellSpec::new(id)
        };
        let definition = catalog.get(id).unwrap();
        grid.insert(slot, PlacedItem::from_spec(definition, &spec)).unwrap();
    }

    fn catalog() -> Catalog {
        let mut arrow = HashMap::new();
        arrow.insert(Rotation::Deg0, vec![BuffCoord::new(1, 0, 2, None)]);
        arrow.insert(Rotation::Deg90, vec![BuffCoord::new(0, -1, 2, None)]);
        arrow.insert(Rotation::Deg180, vec![BuffCoord::new(-1, 0, 2, None)]);
        arrow.insert(Rotation::Deg270, vec![BuffCoord::new(0, 1, 2, None)]);

        let mut partial = HashMap::new();
        partial.insert(Rotation::Deg0, vec![BuffCoord::new(1, 0, 1, None)]);

        Catalog::new(vec![
            ItemDefinition::slate(
                "slate_right",
                false,
                BuffPattern::Fixed(vec![BuffCoord::new(1, 0, 3, Some("none"))]),
            ),
            ItemDefinition::slate(
                "slate_star",
                false,
                BuffPattern::Fixed(vec![
                    BuffCoord::new(0, 1, 1, Some("limitUnlock")),
                    BuffCoord::new(0, -1, 1, Some("focus")),
                    BuffCoord::new(-1, 0, 1, None),
                    BuffCoord::new(1, 0, 1, None),
                ]),
            ),
            ItemDefinition::slate("slate_arrow", true, BuffPattern::Rotating(arrow)),
            ItemDefinition::slate("slate_partial", true, BuffPattern::Rotating(partial)),
        ])
        .unwrap()
    }

    #[test]
    fn single_slate_buffs_its_right_neighbour() {
        let catalog = catalog();
        let mut grid = PlacementGrid::new(6, 6);
        place(&mut grid, &catalog, 0, "slate_right", Rotation::Deg0);
        let map = propagate(&grid, &catalog);
        assert_eq!(map.levels(), &[0, 3, 0, 0, 0, 0]);
        assert!(map.effects().iter().all(Option::is_none));
    }

    #[test]
    fn positive_dy_points_to_the_row_above() {
        let catalog = catalog();
        let mut grid = PlacementGrid::new(3, 9);
        place(&mut grid, &catalog, 4, "slate_star", Rotation::Deg0);
        let map = propagate(&grid, &catalog);
        assert_eq!(map.levels(), &[0, 1, 0, 1, 0, 1, 0, 1, 0]);
        assert_eq!(map.effect(1), Some("limitUnlock"));
        assert_eq!(map.effect(7), Some("focus"));
        assert_eq!(map.effect(3), None);
    }

    #[test]
    fn targets_outside_the_grid_or_slot_count_are_dropped() {
        let catalog = catalog();
        // 3 wide, 7 slots: the last row only has slot 6.
        let mut grid = PlacementGrid::new(3, 7);
        place(&mut grid, &catalog, 2, "slate_right", Rotation::Deg0);
        place(&mut grid, &catalog, 6, "slate_star", Rotation::Deg0);
        let map = propagate(&grid, &catalog);
        assert_eq!(map.levels(), &[0, 0, 0, 1, 0, 0, 0]);
        assert_eq!(map.effect(3), Some("limitUnlock"));
    }

    #[test]
    fn levels_accumulate_and_last_effect_wins() {
        let catalog = catalog();
        let mut grid = PlacementGrid::new(3, 9);
        place(&mut grid, &catalog, 1, "slate_star", Rotation::Deg0);
        place(&mut grid, &catalog, 3, "slate_arrow", Rotation::Deg0);
        place(&mut grid, &catalog, 7, "slate_star", Rotation::Deg0);
        let map = propagate(&grid, &catalog);
        // Slot 4 is below slot 1, right of slot 3 and above slot 7.
        assert_eq!(map.level(4), 4);
        assert_eq!(map.effect(4), Some("limitUnlock"));
    }

    #[test]
    fn four_rotations_restore_the_buff_map() {
        let catalog = catalog();
        let mut grid = PlacementGrid::new(3, 9);
        place(&mut grid, &catalog, 4, "slate_arrow", Rotation::Deg0);
        let original = propagate(&grid, &catalog);
        assert_eq!(original.level(5), 2);

        let mut rotation = Rotation::Deg0;
        let mut targets = Vec::new();
        for _ in 0..4 {
            rotation = rotation.next();
            place(&mut grid, &catalog, 4, "slate_arrow", rotation);
            let map = propagate(&grid, &catalog);
            targets.push(map.levels().iter().position(|&level| level > 0));
        }
        assert_eq!(targets, vec![Some(7), Some(3), Some(1), Some(5)]);
        assert_eq!(propagate(&grid, &catalog), original);
    }

    #[test]
    fn missing_rotation_entry_and_unknown_items_contribute_nothing() {
        let catalog = catalog();
        let mut grid = PlacementGrid::new(3, 3);
        place(&mut grid, &catalog, 0, "slate_partial", Rotation::Deg90);
        grid.insert(
            1,
            PlacedItem::fresh(&ItemDefinition::slate(
                "slate_ghost",
                false,
                BuffPattern::Fixed(vec![BuffCoord::new(1, 0, 5, None)]),
            )),
        );
        let map = propagate(&grid, &catalog);
        assert_eq!(map, BuffMap::empty(3));
    }
}
