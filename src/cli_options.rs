/*
cli_options.rs

Copyright 2025 Hervé Quatremain

This file is part of Pipepower.

Pipepower is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Pipepower is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Pipepower. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Process command-line options.
//!
//! These options are intended for developers tuning the generator. Pipepower generates
//! boards, optionally applies rotations, and prints the result.
//!
//! # Examples
//!
//! Generate an unshuffled board and show where the power leaks:
//!
//! ```text
//! $ pipepower -W 8 -H 6 --seed 42 --no-shuffle --leaks
//! ```
//!
//! Generate 100 boards with a custom configuration and print some statistics:
//!
//! ```text
//! $ pipepower -c 100 --config tuning.json --summary
//! ```

use clap::Parser;
use log::{debug, error};
use rand::Rng;
use serde::Serialize;
use std::env;
use std::path::PathBuf;

use crate::config::{COPYRIGHT_NOTICE, GeneratorConfig};
use crate::game::Game;
use crate::generator::GenerationResult;
use crate::grid::Grid;
use crate::power_flow::DropPoint;
use crate::rotation::Rotation;

/// Rotation requested from the command line.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RotateArg {
    column: usize,
    row: usize,
    rotation: Rotation,
}

/// Parse `COLUMN,ROW` or `COLUMN,ROW,ccw`.
fn parse_rotate_arg(s: &str) -> Result<RotateArg, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() < 2 || parts.len() > 3 {
        return Err(format!("expected COLUMN,ROW[,ccw], got {s:?}"));
    }
    let column: usize = parts[0]
        .parse()
        .map_err(|e| format!("invalid column {:?}: {e}", parts[0]))?;
    let row: usize = parts[1]
        .parse()
        .map_err(|e| format!("invalid row {:?}: {e}", parts[1]))?;
    let rotation: Rotation = match parts.get(2) {
        None => Rotation::Clockwise,
        Some(&"cw") => Rotation::Clockwise,
        Some(&"ccw") => Rotation::CounterClockwise,
        Some(other) => return Err(format!("invalid rotation {other:?}, expected cw or ccw")),
    };
    Ok(RotateArg {
        column,
        row,
        rotation,
    })
}

/// Generate Pipepower boards for developers.
#[derive(Parser)]
#[command(about, long_about = None, version, long_version = COPYRIGHT_NOTICE)]
struct Args {
    /// Number of columns
    #[arg(short = 'W', long, default_value_t = 10)]
    width: usize,

    /// Number of rows
    #[arg(short = 'H', long, default_value_t = 10)]
    height: usize,

    /// Seed for the random number generator (random if not set)
    #[arg(short = 'S', long)]
    seed: Option<u64>,

    /// Number of boards to generate
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// JSON file with the generator parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Probability of accepting an eligible tile as an end tile
    #[arg(short, long)]
    acceptance: Option<f64>,

    /// Do not rotate the tiles after generation (shows the solution)
    #[arg(long, default_value_t = false)]
    no_shuffle: bool,

    /// Rotate a tile after generation, as COLUMN,ROW or COLUMN,ROW,ccw (repeatable)
    #[arg(short, long, value_parser = parse_rotate_arg)]
    rotate: Vec<RotateArg>,

    /// Print the openings of the powered tiles that leak
    #[arg(short, long, default_value_t = false)]
    leaks: bool,

    /// Print the boards in JSON
    #[arg(short, long, default_value_t = false)]
    json: bool,

    /// Print some statistics after generating the boards
    #[arg(short, long, default_value_t = false)]
    summary: bool,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// Board printed with `--json`.
#[derive(Serialize)]
struct BoardDump<'a> {
    seed: u64,
    index: usize,
    moves: usize,
    victory: bool,
    generation: &'a GenerationResult,
    grid: &'a Grid,
    leaks: Vec<DropPoint>,
}

/// Build the generator parameters from the configuration file and the options.
fn build_config(args: &Args) -> Result<GeneratorConfig, String> {
    let mut config: GeneratorConfig = match &args.config {
        Some(path) => GeneratorConfig::load(path).map_err(|e| e.to_string())?,
        None => GeneratorConfig::default(),
    };
    if let Some(acceptance) = args.acceptance {
        config.endpoint_acceptance = acceptance;
    }
    if args.no_shuffle {
        config.shuffle = false;
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Parse and process command-line options, and return the exit code.
pub fn run() -> u8 {
    let args: Args = Args::parse();

    if args.debug {
        println!("DEBUG");
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();

    let config: GeneratorConfig = match build_config(&args) {
        Ok(c) => c,
        Err(e) => {
            error!("{e}");
            eprintln!("pipepower: {e}");
            return 1;
        }
    };
    let seed: u64 = args.seed.unwrap_or_else(|| rand::rng().random());
    debug!("Seed = {seed}  Config = {config:?}");

    let mut game: Game = match Game::new(args.width, args.height, &config, seed) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("pipepower: {e}");
            return 1;
        }
    };

    let mut total: f32 = 0.0;
    let mut max: f32 = 0.0;
    let mut end_tiles: usize = 0;
    let mut short_boards: usize = 0;
    let mut abandoned: usize = 0;

    for i in 0..args.count {
        if i > 0
            && let Err(e) = game.next_board()
        {
            eprintln!("pipepower: {e}");
            return 1;
        }

        for r in &args.rotate {
            if let Err(e) = game.rotate(r.column, r.row, r.rotation) {
                eprintln!("pipepower: {e}");
                return 1;
            }
        }

        let generation: &GenerationResult = game.generation();
        total += generation.duration;
        if generation.duration > max {
            max = generation.duration;
        }
        end_tiles += generation.end_tiles.len();
        if generation.end_tiles.len() < generation.target_end_tiles {
            short_boards += 1;
        }
        abandoned += generation.abandoned_no_direction + generation.abandoned_step_budget;

        if args.json {
            let dump: BoardDump = BoardDump {
                seed,
                index: i,
                moves: game.moves(),
                victory: game.is_victory(),
                generation,
                grid: game.grid(),
                leaks: game.slime_drop_points(),
            };
            match serde_json::to_string_pretty(&dump) {
                Ok(s) => println!("{s}"),
                Err(e) => {
                    eprintln!("pipepower: {e}");
                    return 1;
                }
            }
            continue;
        }

        print_board(&game, i, args.leaks);
    }

    if args.summary && args.count > 0 {
        println!(
            "
        total time = {}s
      average time = {}s
          max time = {}s
 average end tiles = {}
   short of target = {}
    abandoned paths = {}",
            total,
            total / args.count as f32,
            max,
            end_tiles as f32 / args.count as f32,
            short_boards,
            abandoned
        );
    }
    0
}

/// Print a board in text mode.
fn print_board(game: &Game, index: usize, leaks: bool) {
    let grid: &Grid = game.grid();
    let generation: &GenerationResult = game.generation();

    println!("Board {} ({}x{})", index + 1, grid.width(), grid.height());
    print!("{grid}");
    if let Some(start) = grid.start_tile() {
        println!("Start tile: {start}");
    }
    let ends: Vec<String> = grid.end_tiles().iter().map(|c| c.to_string()).collect();
    println!(
        "End tiles ({}/{}): {}",
        ends.len(),
        generation.target_end_tiles,
        ends.join(" ")
    );
    println!(
        "Powered: {}/{}  Moves: {}  Solved: {}",
        grid.powered_tiles().len(),
        grid.area(),
        game.moves(),
        game.is_victory()
    );

    if leaks {
        for point in game.slime_drop_points() {
            let (x, y) = point.position();
            println!("Leak: {} {} at ({x}, {y})", point.tile, point.direction);
        }
    }
    println!();
}
