use crate::core::models::grid::PlacementGrid;
use crate::core::models::item::RuleType;

/// Checks a placement rule against the position of `slot` on `grid`.
///
/// Rows and columns come from the grid width; the number of rows counts a partial last row.
/// Only the horizontal neighbours matter for [`RuleType::AdjacentHorizontalEmpty`], and a
/// grid boundary (including the missing tail of a partial last row) counts as empty.
///
/// Global rules and unrecognized rules are always eligible: they are not resolved from
/// slot geometry.
pub fn is_eligible(slot: usize, rule: &RuleType, grid: &PlacementGrid) -> bool {
    let width = grid.width();
    let total_rows = grid.height();
    let (col, row) = grid.coords(slot);

    let is_edge = || row == 0 || row + 1 == total_rows || col == 0 || col + 1 == width;

    match rule {
        RuleType::TopRow => row == 0,
        RuleType::BottomRow => row + 1 == total_rows,
        RuleType::Edge => is_edge(),
        RuleType::Inner => !is_edge(),
        RuleType::AdjacentHorizontalEmpty => {
            let left_empty = col == 0 || grid.is_empty_at(slot - 1);
            let right_empty = col + 1 == width || grid.is_empty_at(slot + 1);
            left_empty && right_empty
        }
        RuleType::GlobalTagTransform
        | RuleType::GlobalStatFocus
        | RuleType::GlobalPropertyBoost
        | RuleType::Other(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::instance::PlacedItem;
    use crate::core::models::item::{ItemDefinition, Rarity};

    fn grid(width: usize, slot_count: usize, occupied: &[usize]) -> PlacementGrid {
        let mut grid = PlacementGrid::new(width, slot_count);
        let def = ItemDefinition::artifact("artifact_cup", Rarity::Common, 0);
        for &slot in occupied {
            grid.insert(slot, PlacedItem::fresh(&def));
        }
        grid
    }

    fn eligible_slots(rule: &RuleType, grid: &PlacementGrid) -> Vec<usize> {
        (0..grid.slot_count())
            .filter(|&slot| is_eligible(slot, rule, grid))
            .collect()
    }

    #[test]
    fn row_rules_use_ceiling_row_count() {
        let grid = grid(6, 14, &[]);
        assert_eq!(eligible_slots(&RuleType::TopRow, &grid), (0..6).collect::<Vec<_>>());
        assert_eq!(eligible_slots(&RuleType::BottomRow, &grid), vec![12, 13]);
        assert!(!is_eligible(7, &RuleType::TopRow, &grid));
    }

    #[test]
    fn inner_is_the_complement_of_edge() {
        let grid = grid(4, 12, &[]);
        let inner = eligible_slots(&RuleType::Inner, &grid);
        assert_eq!(inner, vec![5, 6]);
        for slot in 0..12 {
            assert_ne!(
                is_eligible(slot, &RuleType::Edge, &grid),
                is_eligible(slot, &RuleType::Inner, &grid)
            );
        }
    }

    #[test]
    fn single_row_grid_has_no_inner_slots() {
        let grid = grid(6, 6, &[]);
        assert!(eligible_slots(&RuleType::Inner, &grid).is_empty());
    }

    #[test]
    fn adjacent_horizontal_empty_ignores_vertical_neighbours() {
        // Row 0: [x . x] Row 1: [. . .]
        let grid = grid(3, 6, &[0, 2]);
        let rule = RuleType::AdjacentHorizontalEmpty;
        assert!(!is_eligible(1, &rule, &grid));
        assert!(is_eligible(0, &rule, &grid));
        assert!(is_eligible(2, &rule, &grid));
        assert!(is_eligible(4, &rule, &grid));
    }

    #[test]
    fn adjacent_horizontal_empty_treats_row_ends_as_boundaries() {
        // Slot 2 ends row 0; slot 3 starts row 1 and must not count as its neighbour.
        let grid = grid(3, 7, &[3]);
        let rule = RuleType::AdjacentHorizontalEmpty;
        assert!(is_eligible(2, &rule, &grid));
        assert!(!is_eligible(4, &rule, &grid));
        // Slot 6 is alone on a partial last row.
        assert!(is_eligible(6, &rule, &grid));
    }

    #[test]
    fn global_and_unknown_rules_are_always_eligible() {
        let grid = grid(3, 9, &[3, 5]);
        for rule in [
            RuleType::GlobalTagTransform,
            RuleType::GlobalStatFocus,
            RuleType::GlobalPropertyBoost,
            RuleType::Other("corner".to_string()),
        ] {
            assert_eq!(eligible_slots(&rule, &grid).len(), 9, "{rule}");
        }
    }
}
