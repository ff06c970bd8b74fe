/*
generator.rs

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

//! Generate random boards.
//!
//! A board is generated in three passes over a fresh [`Grid`]:
//!
//! * The start tile is placed away from the border with a single opening facing the board
//!   center. Then [`path_carver::PathCarver`] repeatedly carves paths from the start tile, each
//!   ending on a new end tile. The openings of a path are applied to the grid only when the
//!   path reaches a valid end tile; abandoned paths leave the grid untouched.
//!   Carving stops when the targeted number of end tiles is reached or when the attempt budget
//!   is exhausted. Ending up with fewer end tiles than targeted is not an error.
//!
//! * [`filler::Filler`] gives random openings to all the other tiles.
//!
//! * [`shuffler::shuffle`] randomly rotates every tile so that the solution is not visible.
//!
//! All the random draws come from the generator's seeded random number generator, so that a
//! given seed always produces the same board.

pub mod filler;
pub mod path;
pub mod path_carver;
pub mod shuffler;

use log::{Level, debug, log_enabled};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::time::Instant;

use crate::config::{ConfigError, GeneratorConfig};
use crate::grid::Grid;
use crate::power_flow;
use crate::tile::{Connections, Coord, Direction};
use filler::Filler;
use path_carver::{CarveError, PathCarver};

/// Outcome of a board generation.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct GenerationResult {
    pub start_tile: Option<Coord>,

    /// End tiles, in the order they were placed.
    pub end_tiles: Vec<Coord>,

    /// Number of end tiles the carver aimed for.
    pub target_end_tiles: usize,

    /// Number of paths the carver tried.
    pub carve_attempts: usize,

    /// Paths abandoned because they reached a tile with no way out.
    pub abandoned_no_direction: usize,

    /// Paths abandoned because they did not find an end tile within the step budget.
    pub abandoned_step_budget: usize,

    /// Duration in seconds it took to generate the board.
    pub duration: f32,
}

/// Board generator.
pub struct Generator {
    config: GeneratorConfig,
    seed: u64,
    rng: StdRng,
}

impl Generator {
    /// Create a generator that draws from a random number generator seeded with `seed`.
    ///
    /// # Errors
    ///
    /// The method returns an error if the configuration is not valid.
    pub fn new(config: &GeneratorConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            seed,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Seed the generator was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a board on a fresh grid: place the start tile, carve the paths to the end
    /// tiles, fill the remaining tiles, shuffle, and compute the powered tiles.
    pub fn generate_board(&mut self, grid: &mut Grid) -> GenerationResult {
        let start_time: Instant = Instant::now();
        let mut result: GenerationResult = GenerationResult {
            target_end_tiles: self
                .config
                .target_end_tiles(grid.width(), grid.height()),
            ..GenerationResult::default()
        };

        let start: Coord = self.place_start_tile(grid);
        result.start_tile = Some(start);
        debug!(
            "Start tile = {start}  Board = {}x{}  Target end tiles = {}",
            grid.width(),
            grid.height(),
            result.target_end_tiles
        );

        let mut carver: PathCarver = PathCarver::new(&self.config, grid);
        while result.carve_attempts < self.config.max_carve_attempts
            && grid.end_tiles().len() < result.target_end_tiles
        {
            result.carve_attempts += 1;
            match carver.carve(grid, &mut self.rng) {
                Ok(_) => (),
                Err(CarveError::NoEligibleDirection) => result.abandoned_no_direction += 1,
                Err(CarveError::StepBudgetExhausted) => result.abandoned_step_budget += 1,
                Err(CarveError::NoStartTile) => {
                    debug!("The start tile has no opening, no path can be carved");
                    break;
                }
            }
        }

        Filler::new(&self.config).fill(grid, &mut self.rng);
        if self.config.shuffle {
            shuffler::shuffle(grid, &mut self.rng);
        }
        power_flow::recompute_power(grid);

        result.end_tiles = grid.end_tiles().to_vec();
        result.duration = start_time.elapsed().as_secs_f32();
        debug!(
            "End tiles = {}/{}  Attempts = {}  Duration = {}",
            result.end_tiles.len(),
            result.target_end_tiles,
            result.carve_attempts,
            result.duration
        );
        if log_enabled!(Level::Debug) {
            for line in grid.to_string().lines() {
                debug!("{line}");
            }
        }
        result
    }

    /// Choose the start tile and open its single connection toward the board center.
    fn place_start_tile(&mut self, grid: &mut Grid) -> Coord {
        let column: usize = random_away_from_border(
            grid.width(),
            self.config.start_margin,
            &mut self.rng,
        );
        let row: usize = random_away_from_border(
            grid.height(),
            self.config.start_margin,
            &mut self.rng,
        );
        let start: Coord = Coord::new(column, row);

        let center_column: isize = grid.width().div_ceil(2) as isize;
        let center_row: isize = grid.height().div_ceil(2) as isize;
        let dx: isize = column as isize - center_column;
        let dy: isize = row as isize - center_row;
        let toward_center: Direction = if dx.abs() > dy.abs() {
            if dx < 0 {
                Direction::East
            } else {
                Direction::West
            }
        } else if dy < 0 {
            Direction::South
        } else {
            Direction::North
        };

        // On tiny boards, the center might be on the wrong side: use any side with a neighbor
        let allowed: Connections = grid.on_board_directions(start);
        let direction: Option<Direction> = if allowed.contains(toward_center) {
            Some(toward_center)
        } else {
            allowed.iter().next()
        };

        if grid.set_start_tile(start).is_ok()
            && let Some(d) = direction
            && let Ok(tile) = grid.tile_mut(start)
        {
            tile.set_connections(Connections::from_directions(&[d]));
        }
        start
    }
}

/// Draw a position in `[margin, size - 1 - margin]`, the margin being reduced on small sizes.
fn random_away_from_border<R: Rng + ?Sized>(size: usize, margin: usize, rng: &mut R) -> usize {
    let margin: usize = margin.min(size.saturating_sub(1) / 2);
    rng.random_range(margin..size - margin)
}
