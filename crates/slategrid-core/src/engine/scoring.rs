use super::buffs::{self, BuffMap};
use super::eligibility::is_eligible;
use super::session::GlobalEffectModes;
use crate::core::models::catalog::Catalog;
use crate::core::models::grid::PlacementGrid;
use crate::core::models::item::{ArtifactTraits, Condition};
use crate::core::tables::LIMIT_UNLOCK_TAG;
use tracing::{trace, warn};

/// Upper bound of the displayed score.
pub const SCORE_CEILING: f64 = 100.0;

/// Scoring annotations for one slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotReport {
    /// Buff level received from slates.
    pub level: u32,
    /// Active effect tag, if any slate set one.
    pub effect: Option<String>,
    /// Whether the artifact in this slot breaks its placement condition.
    pub violated: bool,
    /// Amount added to the raw total by the artifact in this slot.
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Normalized score in `[0, 100]`.
    pub score: f64,
    /// Sum of artifact contributions before normalization.
    pub raw_total: f64,
    pub slots: Vec<SlotReport>,
}

impl Evaluation {
    pub fn violations(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, report)| report.violated)
            .map(|(slot, _)| slot)
    }
}

pub struct Scorer<'a> {
    grid: &'a PlacementGrid,
    catalog: &'a Catalog,
    max_possible_score: f64,
}

impl<'a> Scorer<'a> {
    pub fn new(grid: &'a PlacementGrid, catalog: &'a Catalog, max_possible_score: f64) -> Self {
        Self {
            grid,
            catalog,
            max_possible_score,
        }
    }

    /// Recomputes the buff map and scores the grid.
    pub fn score(&self, global_modes: &GlobalEffectModes) -> Evaluation {
        let buffs = buffs::propagate(self.grid, self.catalog);
        self.score_with(&buffs, global_modes)
    }

    /// Scores the grid against an already propagated buff map.
    ///
    /// Each artifact contributes `(buff level + upgrade level) × rarity weight × priority`
    /// unless it violates its placement condition. Slates never contribute.
    ///
    /// Global effect mode selections are resolved by the external optimizer and are not
    /// interpreted here.
    ///
    /// # Arguments
    ///
    /// * `buffs` - Buff map of the same grid, as returned by [`buffs::propagate`].
    /// * `_global_modes` - The user's global effect mode selections.
    pub fn score_with(&self, buffs: &BuffMap, _global_modes: &GlobalEffectModes) -> Evaluation {
        let mut slots: Vec<SlotReport> = (0..self.grid.slot_count())
            .map(|slot| SlotReport {
                level: buffs.level(slot),
                effect: buffs.effect(slot).map(str::to_string),
                ..SlotReport::default()
            })
            .collect();

        let mut raw_total = 0.0;
        for (slot, _, item) in self.grid.occupied() {
            let Some(definition) = self.catalog.get(&item.item_id) else {
                warn!(slot, item_id = %item.item_id, "Placed item is not in the catalog; scoring it as zero.");
                continue;
            };
            let Some(artifact) = definition.as_artifact() else {
                continue;
            };

            if self.is_violated(slot, artifact, buffs) {
                trace!(slot, item_id = %item.item_id, "Artifact violates its placement condition.");
                slots[slot].violated = true;
                continue;
            }

            let effective_level = buffs.level(slot) + item.upgrade_level;
            let priority = item.priority().unwrap_or(1);
            let contribution =
                f64::from(effective_level) * artifact.rarity.weight() * f64::from(priority);
            slots[slot].contribution = contribution;
            raw_total += contribution;
        }

        Evaluation {
            score: self.normalize(raw_total),
            raw_total,
            slots,
        }
    }

    fn is_violated(&self, slot: usize, artifact: &ArtifactTraits, buffs: &BuffMap) -> bool {
        let Some(Condition::Structured(condition)) = &artifact.condition else {
            return false;
        };
        let unlocked = condition.unlockable && buffs.effect(slot) == Some(LIMIT_UNLOCK_TAG);
        !(unlocked || is_eligible(slot, &condition.rule, self.grid))
    }

    fn normalize(&self, raw_total: f64) -> f64 {
        (SCORE_CEILING * raw_total / self.max_possible_score).min(SCORE_CEILING)
    }
}
