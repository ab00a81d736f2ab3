//! `chase` - headless navigation runner.
//!
//! - `chase grid` - bake the level and print the walkability map
//! - `chase path --from X,Z --to X,Z` - print the path between two points
//! - `chase simulate --seconds S` - run the pursuers against a scripted target

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use chase_cli::{
    bake_level, parse_point, render_ascii, render_path, ChaseConfig, Simulation,
    DEFAULT_CONFIG_FILE,
};
use chase_grid::{find_path, GridCell, Vec2};

#[derive(Parser)]
#[command(name = "chase")]
#[command(about = "Grid navigation and pursuit runner", version)]
struct Cli {
    /// YAML config file (defaults to ./chase.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bake the level and print an ASCII walkability map
    Grid {
        /// Level time at which animated obstacles are sampled
        #[arg(long, default_value_t = 0.0)]
        time: f32,
    },

    /// Find a path between two world points
    Path {
        /// Start as X,Z
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        from: Vec2,

        /// Goal as X,Z
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        to: Vec2,

        /// Also draw the path on the map
        #[arg(long)]
        map: bool,
    },

    /// Run the pursuers against a scripted target
    Simulate {
        #[arg(long, default_value_t = 10.0)]
        seconds: f32,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    if cli.json_logs {
        fmt().json().with_env_filter(filter).init();
    } else {
        fmt().with_env_filter(filter).with_target(false).init();
    }

    let config = match &cli.config {
        Some(path) => ChaseConfig::load(path)?,
        None => ChaseConfig::load_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    config.validate()?;

    match cli.command {
        Commands::Grid { time } => show_grid(&config, time),
        Commands::Path { from, to, map } => show_path(&config, from, to, map),
        Commands::Simulate { seconds, json } => simulate(config, seconds, json),
    }
}

fn show_grid(config: &ChaseConfig, time: f32) -> Result<()> {
    let (grid, report) = bake_level(config, time)?;

    println!(
        "{}x{} cells, {} walkable, {} blocked (too high {}, too low {}, void {})",
        grid.cols(),
        grid.rows(),
        report.floor,
        report.blocked(),
        report.too_high,
        report.too_low,
        report.void,
    );
    print!("{}", render_ascii(&grid, &[]));
    Ok(())
}

fn show_path(config: &ChaseConfig, from: Vec2, to: Vec2, map: bool) -> Result<()> {
    let (grid, _) = bake_level(config, 0.0)?;
    let path = find_path(&grid, from, to);

    if path.is_empty() {
        println!(
            "No path from ({}, {}) to ({}, {})",
            from.x, from.z, to.x, to.z
        );
        return Ok(());
    }

    println!("{} cells, {} moves", path.len(), path.len() - 1);
    print!("{}", render_path(&path));
    if map {
        let marks: Vec<_> = path.iter().map(GridCell::coord).collect();
        println!();
        print!("{}", render_ascii(&grid, &marks));
    }
    Ok(())
}

fn simulate(config: ChaseConfig, seconds: f32, json: bool) -> Result<()> {
    let mut sim = Simulation::new(config)?;
    let summary = sim.run(seconds);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{:.2}s simulated, {} steps, {} bakes, {} re-plans, {} restarts",
        summary.seconds, summary.steps, summary.bakes, summary.replans, summary.restarts
    );
    for agent in &summary.agents {
        println!(
            "  {:<8} {:?} at ({:.2}, {:.2}, {:.2}), {:.2} from target",
            agent.name,
            agent.role,
            agent.position.x,
            agent.position.y,
            agent.position.z,
            agent.distance_to_target,
        );
    }
    Ok(())
}
