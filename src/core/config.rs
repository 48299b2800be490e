//! Simulation configuration with documented constants
//!
//! All tunables of the work-assignment core are collected here. Values can be
//! loaded from a TOML file; any key left out keeps its default.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{DelveError, Result};
use crate::core::types::Position;

/// Configuration for the simulation systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the single shared RNG stream
    ///
    /// Order selection and resource drops both draw from it, so two worlds
    /// built from the same seed and driven the same way replay identically.
    pub seed: u64,

    // === ORDER SCHEDULING ===
    /// Every N steps the low-priority tier is consulted before the normal one
    pub low_prio_orders_every: u64,

    /// Every N steps the very-low-priority tier is consulted first of all
    ///
    /// Must be larger than `low_prio_orders_every`, otherwise demoted orders
    /// would be served more often than fresh ones.
    pub very_low_prio_orders_every: u64,

    /// Maximum number of outstanding orders, `None` for unbounded
    pub order_capacity: Option<usize>,

    // === MINING ===
    /// Percent chance that mining a rock voxel drops a boulder
    pub rock_drop_chance: u32,

    // === WORLD ===
    /// Inclusive bounds of the voxel volume
    pub world_bounds: BoundsConfig,
}

/// Inclusive voxel volume bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsConfig {
    pub lo: [i32; 3],
    pub hi: [i32; 3],
}

impl BoundsConfig {
    pub fn lo(&self) -> Position {
        Position::from_array(self.lo)
    }

    pub fn hi(&self) -> Position {
        Position::from_array(self.hi)
    }
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            lo: [-64, -64, -64],
            hi: [64, 64, 64],
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            low_prio_orders_every: 3,
            very_low_prio_orders_every: 6,
            order_capacity: None,
            rock_drop_chance: 25,
            world_bounds: BoundsConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.low_prio_orders_every == 0 || self.very_low_prio_orders_every == 0 {
            return Err(DelveError::InvalidConfig(
                "order cadences must be positive".into(),
            ));
        }

        if self.very_low_prio_orders_every <= self.low_prio_orders_every {
            return Err(DelveError::InvalidConfig(format!(
                "very_low_prio_orders_every ({}) should be > low_prio_orders_every ({})",
                self.very_low_prio_orders_every, self.low_prio_orders_every
            )));
        }

        if self.rock_drop_chance > 100 {
            return Err(DelveError::InvalidConfig(format!(
                "rock_drop_chance ({}) is a percentage and must be <= 100",
                self.rock_drop_chance
            )));
        }

        let (lo, hi) = (self.world_bounds.lo(), self.world_bounds.hi());
        if lo.cmpgt(hi).any() {
            return Err(DelveError::InvalidConfig(format!(
                "world_bounds lo {:?} must not exceed hi {:?}",
                self.world_bounds.lo, self.world_bounds.hi
            )));
        }

        Ok(())
    }
}
