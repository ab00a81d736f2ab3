//! Headless runner for chase navigation.
//!
//! Bakes the configured level against an analytic [`BoxScene`], answers path queries and runs
//! point-mass pursuit simulations. The `chase` binary is a thin shell over this crate.

#![forbid(unsafe_code)]

pub mod config;
pub mod render;
pub mod sim;

use anyhow::Result;

use chase_grid::{BakeReport, BoxScene, GridBaker, NavGrid, Vec2};

pub use config::{ChaseConfig, LevelConfig, SimulationConfig, DEFAULT_CONFIG_FILE};
pub use render::{render_ascii, render_path};
pub use sim::{AgentSummary, Body, Simulation, SimulationSummary};

/// Bake the configured level with its obstacles posed at `time` seconds.
pub fn bake_level(config: &ChaseConfig, time: f32) -> Result<(NavGrid, BakeReport)> {
    let mut grid = NavGrid::from_spec(config.grid)?;
    let scene = BoxScene::from_layout(
        &config.level.layout(),
        time,
        config.grid.map_width,
        config.grid.map_height,
    );
    let report = GridBaker::new(config.bake).bake(&mut grid, &scene);
    Ok((grid, report))
}

/// Parse `X,Z` world coordinates.
pub fn parse_point(s: &str) -> Result<Vec2, String> {
    let (x, z) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Z but got `{s}`"))?;
    let x: f32 = x
        .trim()
        .parse()
        .map_err(|e| format!("bad X in `{s}`: {e}"))?;
    let z: f32 = z
        .trim()
        .parse()
        .map_err(|e| format!("bad Z in `{s}`: {e}"))?;
    if !x.is_finite() || !z.is_finite() {
        return Err(format!("coordinates must be finite, got `{s}`"));
    }
    Ok(Vec2::new(x, z))
}
