use phf::{Map, phf_map};

/// Score multiplier applied per artifact rarity, keyed by the canonical rarity name.
pub static RARITY_WEIGHTS: Map<&'static str, f64> = phf_map! {
    "Common" => 1.0,
    "UnCommon" => 1.2,
    "Rare" => 1.5,
    "Legendary" => 2.5,
    "Solidarity" => 2.0,
};

/// Weight used for rarities missing from [`RARITY_WEIGHTS`].
pub const DEFAULT_RARITY_WEIGHT: f64 = 1.0;

/// Effect tag that lets an `unlockable` artifact ignore its geometric condition.
pub const LIMIT_UNLOCK_TAG: &str = "limitUnlock";

/// Effect tag value meaning "no effect" in raw buff coordinates.
pub const NO_EFFECT_TAG: &str = "none";

pub fn rarity_weight(name: &str) -> f64 {
    RARITY_WEIGHTS
        .get(name)
        .copied()
        .unwrap_or(DEFAULT_RARITY_WEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_rarities_have_fixed_weights() {
        assert_eq!(rarity_weight("Common"), 1.0);
        assert_eq!(rarity_weight("UnCommon"), 1.2);
        assert_eq!(rarity_weight("Rare"), 1.5);
        assert_eq!(rarity_weight("Legendary"), 2.5);
        assert_eq!(rarity_weight("Solidarity"), 2.0);
    }

    #[test]
    fn unknown_rarity_falls_back_to_default_weight() {
        assert_eq!(rarity_weight("Mythic"), DEFAULT_RARITY_WEIGHT);
        assert_eq!(rarity_weight(""), DEFAULT_RARITY_WEIGHT);
    }
}
