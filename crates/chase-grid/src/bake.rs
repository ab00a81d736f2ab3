//! Walkability baking: one downward ray per cell center.

use chase_core::{ensure_positive, ConfigError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{NavGrid, Vec3, WalkabilityMask};

/// First intersection along a cast ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
}

/// Ray query service provided by the physics collaborator.
///
/// The baker only ever casts straight down (`direction == Vec3::DOWN`); implementations never
/// have to expose collider geometry.
pub trait RayCaster {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;
}

impl<T: RayCaster + ?Sized> RayCaster for &T {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        (**self).cast_ray(origin, direction, max_distance)
    }
}

/// Gameplay tolerances for what counts as floor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BakeConfig {
    /// Height rays start from; must clear every obstacle.
    pub ray_origin_height: f32,
    /// Longest cast; anything below `ray_origin_height - max_ray_distance` reads as void.
    pub max_ray_distance: f32,
    /// Nominal floor height surface heights are measured against.
    pub floor_height: f32,
    /// Surfaces higher than this above the floor block movement.
    pub too_high: f32,
    /// Surfaces lower than this (negative) below the floor are pits.
    pub too_low: f32,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self {
            ray_origin_height: 5.0,
            max_ray_distance: 20.0,
            floor_height: 0.0,
            too_high: 0.2,
            too_low: -0.5,
        }
    }
}

impl BakeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("max_ray_distance", self.max_ray_distance)?;
        let finite = self.too_low.is_finite() && self.too_high.is_finite();
        if !finite || self.too_low >= self.too_high {
            return Err(ConfigError::InvertedRange {
                low_field: "too_low",
                low: self.too_low,
                high_field: "too_high",
                high: self.too_high,
            });
        }
        if self.ray_origin_height <= self.floor_height + self.too_high {
            return Err(ConfigError::InvertedRange {
                low_field: "floor_height + too_high",
                low: self.floor_height + self.too_high,
                high_field: "ray_origin_height",
                high: self.ray_origin_height,
            });
        }
        Ok(())
    }
}

/// Why a cell ended up walkable or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellClass {
    Floor,
    /// Wall or obstacle too tall to traverse.
    TooHigh,
    /// Floor recessed too far.
    TooLow,
    /// Nothing under the cell at all.
    Void,
}

impl CellClass {
    pub fn is_walkable(self) -> bool {
        matches!(self, CellClass::Floor)
    }
}

/// Tally of one bake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BakeReport {
    pub floor: usize,
    pub too_high: usize,
    pub too_low: usize,
    pub void: usize,
    /// Grid version after the batch was applied (0 for a sample that was never applied).
    pub version: u64,
}

impl BakeReport {
    pub fn blocked(&self) -> usize {
        self.too_high + self.too_low + self.void
    }

    fn record(&mut self, class: CellClass) {
        match class {
            CellClass::Floor => self.floor += 1,
            CellClass::TooHigh => self.too_high += 1,
            CellClass::TooLow => self.too_low += 1,
            CellClass::Void => self.void += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GridBaker {
    config: BakeConfig,
}

impl GridBaker {
    pub fn new(config: BakeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BakeConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: BakeConfig) {
        self.config = config;
    }

    /// Classify the first hit of a downward ray cast from `ray_origin_height`.
    pub fn classify(&self, hit: Option<RayHit>) -> CellClass {
        let Some(hit) = hit else {
            return CellClass::Void;
        };
        let surface = self.config.ray_origin_height - hit.distance - self.config.floor_height;
        if surface > self.config.too_high {
            CellClass::TooHigh
        } else if surface < self.config.too_low {
            CellClass::TooLow
        } else {
            CellClass::Floor
        }
    }

    /// Sample every cell without touching the grid.
    pub fn sample(&self, grid: &NavGrid, caster: &dyn RayCaster) -> (WalkabilityMask, BakeReport) {
        let mut mask = grid.uniform_mask(false);
        let mut report = BakeReport::default();

        for cell in grid.cells() {
            let origin = Vec3::new(cell.world_x, self.config.ray_origin_height, cell.world_z);
            let hit = caster.cast_ray(origin, Vec3::DOWN, self.config.max_ray_distance);
            let class = self.classify(hit);
            report.record(class);
            mask.set(cell.coord(), class.is_walkable());
        }

        (mask, report)
    }

    /// Sample the scene and replace the grid's walkability as one batch (one version bump).
    pub fn bake(&self, grid: &mut NavGrid, caster: &dyn RayCaster) -> BakeReport {
        tracing::info!(cells = grid.len(), "Baking navigation grid");
        let (mask, mut report) = self.sample(grid, caster);
        grid.apply_walkability(&mask);
        report.version = grid.version();
        tracing::info!(
            floor = report.floor,
            too_high = report.too_high,
            too_low = report.too_low,
            void = report.void,
            version = report.version,
            "Bake complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit_at_height(config: &BakeConfig, height: f32) -> Option<RayHit> {
        Some(RayHit {
            distance: config.ray_origin_height - height,
        })
    }

    #[test]
    fn classifies_against_thresholds() {
        let baker = GridBaker::default();
        let config = *baker.config();

        assert_eq!(baker.classify(None), CellClass::Void);
        assert_eq!(baker.classify(hit_at_height(&config, 0.0)), CellClass::Floor);
        assert_eq!(baker.classify(hit_at_height(&config, 0.15)), CellClass::Floor);
        assert_eq!(baker.classify(hit_at_height(&config, -0.4)), CellClass::Floor);
        assert_eq!(baker.classify(hit_at_height(&config, 1.0)), CellClass::TooHigh);
        assert_eq!(baker.classify(hit_at_height(&config, -1.0)), CellClass::TooLow);
    }

    #[test]
    fn thresholds_are_tunable() {
        let baker = GridBaker::new(BakeConfig {
            too_high: 1.5,
            ..BakeConfig::default()
        });
        let config = *baker.config();
        assert_eq!(baker.classify(hit_at_height(&config, 1.0)), CellClass::Floor);
    }

    #[test]
    fn validate_rejects_inverted_thresholds() {
        let config = BakeConfig {
            too_high: -1.0,
            too_low: 0.5,
            ..BakeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedRange { .. })
        ));
        assert!(BakeConfig::default().validate().is_ok());
    }
}
