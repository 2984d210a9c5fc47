use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid grid bounds: {0}")]
    InvalidBounds(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    /// Number of columns.
    pub width: usize,
    /// Lower bound of the slot count.
    pub min_slots: usize,
    /// Upper bound of the slot count.
    pub max_slots: usize,
    /// Slot count of a fresh grid, within the bounds.
    pub default_slots: usize,
    /// Raw total that maps to a displayed score of 100.
    pub max_possible_score: f64,
}

impl GridConfig {
    pub fn clamp_slot_count(&self, slot_count: usize) -> usize {
        slot_count.clamp(self.min_slots, self.max_slots)
    }
}

#[derive(Default)]
pub struct GridConfigBuilder {
    width: Option<usize>,
    min_slots: Option<usize>,
    max_slots: Option<usize>,
    default_slots: Option<usize>,
    max_possible_score: Option<f64>,
}

impl GridConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }
    pub fn min_slots(mut self, slots: usize) -> Self {
        self.min_slots = Some(slots);
        self
    }
    pub fn max_slots(mut self, slots: usize) -> Self {
        self.max_slots = Some(slots);
        self
    }
    /// Falls back to `min_slots` when unset; clamped to the bounds on build.
    pub fn default_slots(mut self, slots: usize) -> Self {
        self.default_slots = Some(slots);
        self
    }
    pub fn max_possible_score(mut self, score: f64) -> Self {
        self.max_possible_score = Some(score);
        self
    }

    pub fn build(self) -> Result<GridConfig, ConfigError> {
        let mut config = GridConfig {
            width: self.width.ok_or(ConfigError::MissingParameter("width"))?,
            min_slots: self
                .min_slots
                .ok_or(ConfigError::MissingParameter("min_slots"))?,
            max_slots: self
                .max_slots
                .ok_or(ConfigError::MissingParameter("max_slots"))?,
            default_slots: 0,
            max_possible_score: self
                .max_possible_score
                .ok_or(ConfigError::MissingParameter("max_possible_score"))?,
        };

        if config.width == 0 {
            return Err(ConfigError::InvalidBounds(
                "width must be at least 1".to_string(),
            ));
        }
        if config.min_slots == 0 || config.min_slots > config.max_slots {
            return Err(ConfigError::InvalidBounds(format!(
                "expected 1 <= min_slots <= max_slots, got {}..{}",
                config.min_slots, config.max_slots
            )));
        }
        if !(config.max_possible_score.is_finite() && config.max_possible_score > 0.0) {
            return Err(ConfigError::InvalidBounds(format!(
                "max_possible_score must be positive, got {}",
                config.max_possible_score
            )));
        }
        config.default_slots =
            config.clamp_slot_count(self.default_slots.unwrap_or(config.min_slots));
        Ok(config)
    }
}
