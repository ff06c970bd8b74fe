/*
power_flow.rs

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

//! Propagate power from the start tile.
//!
//! Power flows between two adjacent tiles only when both tiles have an opening facing each
//! other. An opening that faces a closed side, or the board border, does not carry power: the
//! presentation layer shows those as leaks (see [`slime_drop_points`]).

use log::debug;
use serde::Serialize;
use std::collections::{HashSet, VecDeque};

use crate::grid::Grid;
use crate::tile::{Coord, Direction, Tile};

/// Result of a power propagation.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct PowerReport {
    /// Powered tiles, in traversal order from the start tile.
    pub powered: Vec<Coord>,

    /// Tiles that were not powered before the propagation.
    pub newly_powered: Vec<Coord>,

    /// Tiles that lost power.
    pub newly_unpowered: Vec<Coord>,

    /// Whether all the end tiles are powered.
    pub victory: bool,
}

/// Opening of a powered tile that does not connect to a matching opening.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropPoint {
    pub tile: Coord,
    pub direction: Direction,
}

impl DropPoint {
    /// Position of the leak on the board, in tile units: the middle of the tile side, the
    /// board's top-left corner being (0, 0).
    pub fn position(&self) -> (f32, f32) {
        let (dx, dy) = self.direction.offset();
        (
            self.tile.column as f32 + 0.5 + dx as f32 * 0.5,
            self.tile.row as f32 + 0.5 + dy as f32 * 0.5,
        )
    }
}

/// Recompute which tiles are powered, update their powered flag, and report the changes.
///
/// Without a start tile nothing is powered.
pub fn recompute_power(grid: &mut Grid) -> PowerReport {
    let powered: Vec<Coord> = match grid.start_tile() {
        Some(start) => traverse(grid, start),
        None => Vec::new(),
    };
    let powered_set: HashSet<Coord> = powered.iter().copied().collect();
    let previous: Vec<Coord> = grid.replace_powered_tiles(powered.clone());

    let mut newly_unpowered: Vec<Coord> = Vec::new();
    for coord in previous.into_iter().filter(|c| !powered_set.contains(c)) {
        if let Ok(tile) = grid.tile_mut(coord)
            && tile.powered
        {
            tile.powered = false;
            newly_unpowered.push(coord);
        }
    }

    let mut newly_powered: Vec<Coord> = Vec::new();
    for coord in &powered {
        if let Ok(tile) = grid.tile_mut(*coord)
            && !tile.powered
        {
            tile.powered = true;
            newly_powered.push(*coord);
        }
    }

    let victory: bool = is_victory(grid);
    debug!(
        "Powered tiles = {}  (+{} -{})  Victory = {victory}",
        powered.len(),
        newly_powered.len(),
        newly_unpowered.len()
    );
    PowerReport {
        powered,
        newly_powered,
        newly_unpowered,
        victory,
    }
}

/// Breadth-first walk through mutually open connections.
fn traverse(grid: &Grid, start: Coord) -> Vec<Coord> {
    let max_steps: usize = grid.area() + 1;
    let mut visited: Vec<Coord> = Vec::with_capacity(grid.area());
    let mut seen: HashSet<Coord> = HashSet::from([start]);
    let mut queue: VecDeque<Coord> = VecDeque::from([start]);

    while let Some(coord) = queue.pop_front() {
        if visited.len() >= max_steps {
            break;
        }
        visited.push(coord);

        let Ok(tile) = grid.tile(coord) else {
            continue;
        };
        for d in tile.connections().iter() {
            if let Some(other) = grid.neighbor(coord, d)
                && other.opposite_is_open(d)
                && seen.insert(other.coord())
            {
                queue.push_back(other.coord());
            }
        }
    }
    visited
}

/// Whether the board is solved: there is a start tile and all the end tiles are powered.
pub fn is_victory(grid: &Grid) -> bool {
    grid.start_tile().is_some()
        && grid
            .end_tiles()
            .iter()
            .all(|c| grid.tile(*c).is_ok_and(Tile::is_powered))
}

/// List the openings of powered tiles that lead nowhere: off the board, or to a neighbor
/// without a matching opening.
///
/// The list is derived from the last propagation; call [`recompute_power`] first.
pub fn slime_drop_points(grid: &Grid) -> Vec<DropPoint> {
    let mut points: Vec<DropPoint> = Vec::new();
    for coord in grid.powered_tiles() {
        let Ok(tile) = grid.tile(*coord) else {
            continue;
        };
        for d in tile.connections().iter() {
            let matched: bool = grid
                .neighbor(*coord, d)
                .is_some_and(|other| other.opposite_is_open(d));
            if !matched {
                points.push(DropPoint {
                    tile: *coord,
                    direction: d,
                });
            }
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Connections;

    fn set(grid: &mut Grid, column: usize, row: usize, dirs: &[Direction]) {
        grid.tile_at_mut(column, row)
            .unwrap()
            .set_connections(Connections::from_directions(dirs));
    }

    #[test]
    fn test_mutual_opening() {
        let mut grid = Grid::new(2, 1).unwrap();
        grid.set_start_tile(Coord::new(0, 0)).unwrap();
        set(&mut grid, 0, 0, &[Direction::East]);

        let report = recompute_power(&mut grid);
        assert_eq!(report.powered, vec![Coord::new(0, 0)]);
        assert!(!grid.tile_at(1, 0).unwrap().is_powered());

        set(&mut grid, 1, 0, &[Direction::West]);
        let report = recompute_power(&mut grid);
        assert_eq!(report.powered, vec![Coord::new(0, 0), Coord::new(1, 0)]);
        assert_eq!(report.newly_powered, vec![Coord::new(1, 0)]);
        assert!(grid.tile_at(1, 0).unwrap().is_powered());
    }

    #[test]
    fn test_one_sided_opening_does_not_propagate() {
        let mut grid = Grid::new(2, 1).unwrap();
        grid.set_start_tile(Coord::new(0, 0)).unwrap();
        set(&mut grid, 1, 0, &[Direction::West]);
        let report = recompute_power(&mut grid);
        assert_eq!(report.powered, vec![Coord::new(0, 0)]);
    }

    #[test]
    fn test_idempotent() {
        let mut grid = Grid::new(3, 1).unwrap();
        grid.set_start_tile(Coord::new(0, 0)).unwrap();
        set(&mut grid, 0, 0, &[Direction::East]);
        set(&mut grid, 1, 0, &[Direction::West, Direction::East]);
        set(&mut grid, 2, 0, &[Direction::West]);

        let first = recompute_power(&mut grid);
        assert_eq!(first.newly_powered.len(), 3);
        let second = recompute_power(&mut grid);
        assert_eq!(first.powered, second.powered);
        assert!(second.newly_powered.is_empty());
        assert!(second.newly_unpowered.is_empty());
    }

    #[test]
    fn test_power_loss() {
        let mut grid = Grid::new(3, 1).unwrap();
        grid.set_start_tile(Coord::new(0, 0)).unwrap();
        set(&mut grid, 0, 0, &[Direction::East]);
        set(&mut grid, 1, 0, &[Direction::West, Direction::East]);
        set(&mut grid, 2, 0, &[Direction::West]);
        recompute_power(&mut grid);

        grid.tile_at_mut(1, 0).unwrap().rotate_clockwise();
        let report = recompute_power(&mut grid);
        assert_eq!(report.powered, vec![Coord::new(0, 0)]);
        assert_eq!(
            report.newly_unpowered,
            vec![Coord::new(1, 0), Coord::new(2, 0)]
        );
        assert!(report.newly_powered.is_empty());
        assert!(!grid.tile_at(2, 0).unwrap().is_powered());
    }

    #[test]
    fn test_victory_needs_every_end_tile() {
        // Start in the middle, one end tile on each side
        let mut grid = Grid::new(3, 1).unwrap();
        grid.set_start_tile(Coord::new(1, 0)).unwrap();
        grid.add_end_tile(Coord::new(0, 0));
        grid.add_end_tile(Coord::new(2, 0));
        set(&mut grid, 1, 0, &[Direction::West, Direction::East]);
        set(&mut grid, 0, 0, &[Direction::East]);
        set(&mut grid, 2, 0, &[Direction::North]);

        let report = recompute_power(&mut grid);
        assert!(grid.tile_at(0, 0).unwrap().is_powered());
        assert!(!report.victory);

        set(&mut grid, 2, 0, &[Direction::West]);
        let report = recompute_power(&mut grid);
        assert!(report.victory);
        assert!(is_victory(&grid));
    }

    #[test]
    fn test_no_start_tile() {
        let mut grid = Grid::new(2, 2).unwrap();
        let report = recompute_power(&mut grid);
        assert!(report.powered.is_empty());
        assert!(!report.victory);
    }

    #[test]
    fn test_loops_are_visited_once() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set_start_tile(Coord::new(0, 0)).unwrap();
        set(&mut grid, 0, 0, &[Direction::East, Direction::South]);
        set(&mut grid, 1, 0, &[Direction::West, Direction::South]);
        set(&mut grid, 0, 1, &[Direction::North, Direction::East]);
        set(&mut grid, 1, 1, &[Direction::North, Direction::West]);
        let report = recompute_power(&mut grid);
        assert_eq!(report.powered.len(), 4);
        let unique: HashSet<Coord> = report.powered.iter().copied().collect();
        assert_eq!(unique.len(), 4);
        assert!(slime_drop_points(&grid).is_empty());
    }

    #[test]
    fn test_slime_drop_points() {
        let mut grid = Grid::new(2, 1).unwrap();
        grid.set_start_tile(Coord::new(0, 0)).unwrap();
        set(&mut grid, 0, 0, &[Direction::East, Direction::North]);
        set(&mut grid, 1, 0, &[Direction::West, Direction::South]);
        recompute_power(&mut grid);

        let points = slime_drop_points(&grid);
        assert_eq!(
            points,
            vec![
                DropPoint {
                    tile: Coord::new(0, 0),
                    direction: Direction::North
                },
                DropPoint {
                    tile: Coord::new(1, 0),
                    direction: Direction::South
                },
            ]
        );
        assert_eq!(points[0].position(), (0.5, 0.0));
        assert_eq!(points[1].position(), (1.5, 1.0));
    }
}
