/*
path_carver.rs

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

//! Carve a random path from the start tile to a new end tile.

use log::debug;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::path::{Path, PathStep};
use crate::config::GeneratorConfig;
use crate::grid::Grid;
use crate::tile::{Connections, Coord, Direction};

/// Type of errors.
///
/// None of these errors is fatal: the grid is left untouched and another attempt can be made.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarveError {
    /// The grid has no start tile, or the start tile has no opening to leave from.
    NoStartTile,

    /// The path reached a tile with no way out.
    NoEligibleDirection,

    /// The path did not find a valid end tile within the step budget.
    StepBudgetExhausted,
}

/// [`PathCarver`] object.
pub struct PathCarver {
    /// Generation parameters.
    config: GeneratorConfig,

    /// Maximum number of steps for a path. Bounded by the board area.
    pub max_step_attempts: usize,

    /// Number of steps it took to carve, or abandon, the last path.
    pub iteration: usize,
}

impl PathCarver {
    /// Create the object for the given board.
    pub fn new(config: &GeneratorConfig, grid: &Grid) -> Self {
        Self {
            config: config.clone(),
            max_step_attempts: grid.area(),
            iteration: 0,
        }
    }

    /// Carve one path and, if it reaches a valid end tile, apply its openings to the grid and
    /// register the end tile.
    ///
    /// Return the coordinates of the new end tile.
    ///
    /// # Errors
    ///
    /// The method returns an error if the attempt was abandoned. In that case the grid is not
    /// modified.
    pub fn carve<R: Rng + ?Sized>(
        &mut self,
        grid: &mut Grid,
        rng: &mut R,
    ) -> Result<Coord, CarveError> {
        let min_distance: usize = self
            .config
            .min_endpoint_distance(grid.width(), grid.end_tiles().len());
        let path: Path = self.find_path(grid, min_distance, rng)?;

        let end: Coord = match path.last() {
            Some(step) => step.coord,
            None => return Err(CarveError::NoEligibleDirection),
        };
        path.commit(grid);
        grid.add_end_tile(end);
        debug!(
            "New end tile {end} after {} steps (path length {}, minimum distance {min_distance})",
            self.iteration,
            path.len()
        );
        Ok(end)
    }

    /// Walk from the start tile until the walk can stop on a valid end tile.
    fn find_path<R: Rng + ?Sized>(
        &mut self,
        grid: &Grid,
        min_distance: usize,
        rng: &mut R,
    ) -> Result<Path, CarveError> {
        self.iteration = 0;

        // The first tile in the path is in the direction of the start tile's opening
        let start: Coord = grid.start_tile().ok_or(CarveError::NoStartTile)?;
        let start_direction: Direction = grid
            .tile(start)
            .ok()
            .and_then(|t| t.connections().iter().next())
            .ok_or(CarveError::NoStartTile)?;
        let first: Coord = grid
            .neighbor_coord(start, start_direction)
            .ok_or(CarveError::NoStartTile)?;

        let mut path: Path = Path::new(self.config.min_path_length * 2);
        path.push(first, start_direction.opposite());

        while self.iteration < self.max_step_attempts {
            self.iteration += 1;

            let Some(current) = path.last().cloned() else {
                return Err(CarveError::NoEligibleDirection);
            };
            let eligible: Vec<Direction> = Direction::ALL
                .into_iter()
                .filter(|d| Self::is_eligible(grid, &path, &current, *d))
                .collect();
            if eligible.is_empty() {
                debug!(
                    "    Back: no eligible direction from {} (path length {})",
                    current.coord,
                    path.len()
                );
                return Err(CarveError::NoEligibleDirection);
            }

            let candidates: Vec<Direction> = Self::weight_directions(grid, &current, &eligible);
            let Some(direction) = candidates.choose(rng).copied() else {
                return Err(CarveError::NoEligibleDirection);
            };
            if path.advance(direction, grid).is_none() {
                return Err(CarveError::NoEligibleDirection);
            }

            if path.len() >= self.config.min_path_length
                && let Some(last) = path.last()
                && self.is_end_tile(grid, last, min_distance)
                && rng.random_bool(self.config.endpoint_acceptance)
            {
                return Ok(path);
            }
        }
        debug!("    Back: step budget of {} exhausted", self.max_step_attempts);
        Err(CarveError::StepBudgetExhausted)
    }

    /// Whether the path can leave the `current` tile in the given direction.
    fn is_eligible(grid: &Grid, path: &Path, current: &PathStep, direction: Direction) -> bool {
        // A junction tile (three or more openings) can only be left through an existing opening
        let openings: Connections = match grid.tile(current.coord) {
            Ok(t) => t.connections().union(current.connections),
            Err(_) => return false,
        };
        if openings.count() >= 3 && !openings.contains(direction) {
            return false;
        }

        let Some(target) = grid.neighbor(current.coord, direction) else {
            return false;
        };
        let target_coord: Coord = target.coord();
        grid.start_tile() != Some(target_coord)
            && (target.connection_count() < 3 || target.opposite_is_open(direction))
            && !path.contains(target_coord)
            && !grid.is_end_tile(target_coord)
    }

    /// Build the list of candidate directions, where a direction can appear several times to
    /// weight the random choice.
    ///
    /// Every end tile adds weight to the directions that lead away from its quadrant, on both
    /// axes: an end tile left of the center column favors east, one right of it favors west,
    /// one above the center row favors south, and one below it favors north.
    /// Among the candidates, directions toward tiles with no openings yet are preferred.
    fn weight_directions(grid: &Grid, current: &PathStep, eligible: &[Direction]) -> Vec<Direction> {
        let mut weighted: Vec<Direction> = eligible.to_vec();
        let center_column: isize = grid.width().div_ceil(2) as isize;
        let center_row: isize = grid.height().div_ceil(2) as isize;

        for end in grid.end_tiles() {
            let horizontal: Direction = if (end.column as isize) < center_column {
                Direction::East
            } else {
                Direction::West
            };
            if eligible.contains(&horizontal) {
                weighted.push(horizontal);
            }

            let vertical: Direction = if (end.row as isize) < center_row {
                Direction::South
            } else {
                Direction::North
            };
            if eligible.contains(&vertical) {
                weighted.push(vertical);
            }
        }

        let unexplored: Vec<Direction> = weighted
            .iter()
            .filter(|d| {
                grid.neighbor(current.coord, **d)
                    .is_some_and(|t| t.connections().is_empty())
            })
            .copied()
            .collect();

        if !unexplored.is_empty() {
            unexplored
        } else if !weighted.is_empty() {
            weighted
        } else {
            eligible.to_vec()
        }
    }

    /// Whether the last tile of the path can become an end tile, before the random draw.
    fn is_end_tile(&self, grid: &Grid, last: &PathStep, min_distance: usize) -> bool {
        // The end tile must not branch: its only opening is the one the path came in through
        let openings: Connections = match grid.tile(last.coord) {
            Ok(t) => t.connections().union(last.connections),
            Err(_) => return false,
        };
        if openings.count() != 1 {
            return false;
        }

        if self.config.avoid_edge_endpoints
            && grid.on_board_directions(last.coord) != Connections::ALL
        {
            return false;
        }

        grid.end_tiles()
            .iter()
            .chain(grid.start_tile().iter())
            .all(|c| c.distance(last.coord) >= min_distance)
    }
}
