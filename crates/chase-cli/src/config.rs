//! Runner configuration, loaded from `chase.yaml`.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use chase_core::{ensure_non_negative, ensure_positive};
use chase_grid::{BakeConfig, BakeTiming, GridSpec, Obstacle, ObstacleLayout, Vec3};
use chase_steer::{InputConfig, SteeringConfig, TargetTrackingConfig};

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "chase.yaml";

/// Every tunable of a headless run. Each section may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaseConfig {
    pub grid: GridSpec,
    pub bake: BakeConfig,
    pub timing: BakeTiming,
    pub steering: SteeringConfig,
    pub input: InputConfig,
    pub tracking: TargetTrackingConfig,
    pub level: LevelConfig,
    pub simulation: SimulationConfig,
}

/// Obstacles placed on the floor. Defaults to the stock level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub obstacles: Vec<Obstacle>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            obstacles: ObstacleLayout::default_level().iter().cloned().collect(),
        }
    }
}

impl LevelConfig {
    pub fn layout(&self) -> ObstacleLayout {
        ObstacleLayout::from_obstacles(self.obstacles.iter().cloned())
    }
}

/// Point-mass integration and the scripted target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed physics step in seconds.
    pub step: f32,
    /// Horizontal velocity damping per second.
    pub damping: f32,
    pub gravity: f32,
    /// Seconds the scripted target holds each direction of its square patrol.
    pub target_leg_seconds: f32,
    pub target_spawn: Vec3,
    /// One autonomous pursuer per entry.
    pub pursuer_spawns: Vec<Vec3>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            step: 1.0 / 60.0,
            damping: 0.5,
            gravity: 9.81,
            target_leg_seconds: 2.0,
            target_spawn: Vec3::new(0.0, 0.5, -8.0),
            pursuer_spawns: vec![Vec3::new(-8.0, 0.5, -14.0), Vec3::new(8.0, 0.5, -14.0)],
        }
    }
}

impl ChaseConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "No config file; using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.grid.validate().context("invalid grid section")?;
        self.bake.validate().context("invalid bake section")?;
        self.timing.validate().context("invalid timing section")?;
        self.steering.validate().context("invalid steering section")?;
        self.input.validate().context("invalid input section")?;
        self.tracking.validate().context("invalid tracking section")?;
        self.simulation.validate()?;

        let mut seen = HashSet::new();
        for obstacle in &self.level.obstacles {
            if !seen.insert(&obstacle.id) {
                bail!("duplicate obstacle id `{}` in level", obstacle.id);
            }
        }
        Ok(())
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("step", self.step).context("invalid simulation section")?;
        ensure_non_negative("damping", self.damping).context("invalid simulation section")?;
        ensure_non_negative("gravity", self.gravity).context("invalid simulation section")?;
        ensure_positive("target_leg_seconds", self.target_leg_seconds)
            .context("invalid simulation section")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        ChaseConfig::default().validate().unwrap();
    }

    #[test]
    fn default_level_has_six_obstacles() {
        assert_eq!(LevelConfig::default().layout().len(), 6);
    }

    #[test]
    fn duplicate_obstacle_ids_are_rejected() {
        let mut config = ChaseConfig::default();
        let first = config.level.obstacles[0].clone();
        config.level.obstacles.push(first);

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate obstacle id"));
    }

    #[test]
    fn zero_step_is_rejected() {
        let mut config = ChaseConfig::default();
        config.simulation.step = 0.0;
        assert!(config.validate().is_err());
    }
}
