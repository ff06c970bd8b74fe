/*
path.rs

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

//! Path being carved from the start tile.
//!
//! The openings of the path are kept aside until the path reaches a valid end tile. Only then
//! are they applied to the grid (see [`Path::commit`]).

use std::collections::HashSet;

use crate::grid::Grid;
use crate::tile::{Connections, Coord, Direction};

/// A tile of the path with the openings the path adds to it.
#[derive(Debug, Clone, PartialEq)]
pub struct PathStep {
    pub coord: Coord,

    /// Pending openings: the inbound one, and the outbound one once the path moves on.
    pub connections: Connections,
}

/// Path object.
#[derive(Debug, Default, Clone)]
pub struct Path {
    /// Path as an ordered list of steps.
    steps: Vec<PathStep>,

    /// Instead of looking for the tile in the [`Path::steps`] vector, this
    /// [`std::collections::HashSet`] speeds up the lookup.
    visited: HashSet<Coord>,
}

impl Path {
    /// Create a [`Path`] object.
    pub fn new(capacity: usize) -> Self {
        Self {
            steps: Vec::with_capacity(capacity),
            visited: HashSet::with_capacity(capacity),
        }
    }

    /// Add a tile to the path, entered from the given side.
    pub fn push(&mut self, coord: Coord, inbound: Direction) {
        self.steps.push(PathStep {
            coord,
            connections: Connections::from_directions(&[inbound]),
        });
        self.visited.insert(coord);
    }

    /// Extend the path from its last tile in the given direction.
    ///
    /// Return the coordinates of the new last tile, or None if the move leaves the board or the
    /// path is empty.
    pub fn advance(&mut self, direction: Direction, grid: &Grid) -> Option<Coord> {
        let last: &mut PathStep = self.steps.last_mut()?;
        let next: Coord = grid.neighbor_coord(last.coord, direction)?;
        last.connections.insert(direction);
        self.push(next, direction.opposite());
        Some(next)
    }

    /// Get the number of tiles in the path.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether the tile is in the path or not.
    pub fn contains(&self, coord: Coord) -> bool {
        self.visited.contains(&coord)
    }

    /// Return the last step in the path.
    pub fn last(&self) -> Option<&PathStep> {
        self.steps.last()
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Open every pending connection on the grid tiles.
    pub fn commit(&self, grid: &mut Grid) {
        for step in &self.steps {
            if let Ok(tile) = grid.tile_mut(step.coord) {
                tile.open_connections(step.connections);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_records_both_sides() {
        let mut grid = Grid::new(4, 4).unwrap();
        let mut path = Path::new(4);
        path.push(Coord::new(1, 1), Direction::West);
        assert_eq!(
            path.advance(Direction::South, &grid),
            Some(Coord::new(1, 2))
        );
        assert_eq!(path.len(), 2);
        assert!(path.contains(Coord::new(1, 1)));
        assert_eq!(
            path.steps()[0].connections,
            Connections::from_directions(&[Direction::West, Direction::South])
        );
        assert_eq!(
            path.last().unwrap().connections,
            Connections::from_directions(&[Direction::North])
        );

        // Nothing is applied before the commit
        assert!(grid.tile_at(1, 1).unwrap().connections().is_empty());
        path.commit(&mut grid);
        assert_eq!(grid.tile_at(1, 1).unwrap().connection_count(), 2);
        assert!(grid.tile_at(1, 2).unwrap().is_open(Direction::North));
    }

    #[test]
    fn test_advance_off_board() {
        let grid = Grid::new(2, 2).unwrap();
        let mut path = Path::new(2);
        path.push(Coord::new(0, 0), Direction::East);
        assert_eq!(path.advance(Direction::North, &grid), None);
        assert_eq!(path.len(), 1);
    }
}
