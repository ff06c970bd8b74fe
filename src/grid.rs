/*
grid.rs

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

//! Rectangular board of tiles.
//!
//! The [`Grid`] owns all its [`Tile`] objects in a flat vector indexed by column, then row.
//! Tiles never refer back to the grid: neighbor lookups go through [`Grid::neighbor`].

use serde::Serialize;
use std::error::Error;
use std::fmt;

use crate::tile::{Connections, Coord, Direction, Tile};

/// Glyphs for unpowered tiles, indexed by connection mask.
const LIGHT_GLYPHS: [char; 16] = [
    '·', '╵', '╶', '└', '╷', '│', '┌', '├', '╴', '┘', '─', '┴', '┐', '┤', '┬', '┼',
];

/// Glyphs for powered tiles, indexed by connection mask.
const HEAVY_GLYPHS: [char; 16] = [
    '•', '╹', '╺', '┗', '╻', '┃', '┏', '┣', '╸', '┛', '━', '┻', '┓', '┫', '┳', '╋',
];

/// Type of errors.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// The board must have at least one column and one row.
    InvalidDimensions { width: usize, height: usize },

    /// No tile at the given coordinates.
    OutOfBounds { column: usize, row: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GridError::InvalidDimensions { width, height } => {
                write!(f, "invalid board dimensions {width}x{height}")
            }
            GridError::OutOfBounds { column, row } => {
                write!(f, "no tile at column {column}, row {row}")
            }
        }
    }
}

impl Error for GridError {}

/// The board.
#[derive(Serialize, Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,

    /// Tiles, `height` consecutive tiles per column.
    tiles: Vec<Tile>,

    /// Power source. Only set once the board is generated.
    start_tile: Option<Coord>,

    /// Target tiles in the order the path carver placed them.
    end_tiles: Vec<Coord>,

    /// Tiles reached by the last power propagation, in traversal order.
    powered_tiles: Vec<Coord>,
}

impl Grid {
    /// Create a board where every tile has no opening.
    ///
    /// # Errors
    ///
    /// The method returns an error if the width or the height is zero.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }

        let mut tiles: Vec<Tile> = Vec::with_capacity(width * height);
        for column in 0..width {
            for row in 0..height {
                tiles.push(Tile::new(column, row));
            }
        }

        Ok(Self {
            width,
            height,
            tiles,
            start_tile: None,
            end_tiles: Vec::new(),
            powered_tiles: Vec::new(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of tiles on the board.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    fn index(&self, column: usize, row: usize) -> Option<usize> {
        if column < self.width && row < self.height {
            Some(column * self.height + row)
        } else {
            None
        }
    }

    /// Whether the coordinates are on the board.
    pub fn contains(&self, coord: Coord) -> bool {
        self.index(coord.column, coord.row).is_some()
    }

    /// Return the tile at the given coordinates.
    pub fn tile_at(&self, column: usize, row: usize) -> Result<&Tile, GridError> {
        match self.index(column, row) {
            Some(i) => Ok(&self.tiles[i]),
            None => Err(GridError::OutOfBounds { column, row }),
        }
    }

    /// Return the tile at the given coordinates for modification.
    pub fn tile_at_mut(&mut self, column: usize, row: usize) -> Result<&mut Tile, GridError> {
        match self.index(column, row) {
            Some(i) => Ok(&mut self.tiles[i]),
            None => Err(GridError::OutOfBounds { column, row }),
        }
    }

    /// Same as [`Grid::tile_at`], from a [`Coord`].
    pub fn tile(&self, coord: Coord) -> Result<&Tile, GridError> {
        self.tile_at(coord.column, coord.row)
    }

    /// Same as [`Grid::tile_at_mut`], from a [`Coord`].
    pub fn tile_mut(&mut self, coord: Coord) -> Result<&mut Tile, GridError> {
        self.tile_at_mut(coord.column, coord.row)
    }

    /// Coordinates of the adjacent tile in the given direction, or None if it would be off the
    /// board.
    pub fn neighbor_coord(&self, coord: Coord, direction: Direction) -> Option<Coord> {
        coord.step(direction, self.width, self.height)
    }

    /// Return the adjacent tile in the given direction, or None if it would be off the board.
    pub fn neighbor(&self, coord: Coord, direction: Direction) -> Option<&Tile> {
        let c: Coord = self.neighbor_coord(coord, direction)?;
        self.tile(c).ok()
    }

    /// Directions that lead to another tile from the given coordinates.
    pub fn on_board_directions(&self, coord: Coord) -> Connections {
        let mut c: Connections = Connections::NONE;
        for d in Direction::ALL {
            if self.neighbor_coord(coord, d).is_some() {
                c.insert(d);
            }
        }
        c
    }

    /// Iterate over the tiles, column by column.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn start_tile(&self) -> Option<Coord> {
        self.start_tile
    }

    /// Designate the power source.
    ///
    /// # Errors
    ///
    /// The method returns an error if the coordinates are not on the board.
    pub fn set_start_tile(&mut self, coord: Coord) -> Result<(), GridError> {
        self.tile(coord)?;
        self.end_tiles.retain(|c| *c != coord);
        self.start_tile = Some(coord);
        Ok(())
    }

    pub fn end_tiles(&self) -> &[Coord] {
        &self.end_tiles
    }

    pub fn is_end_tile(&self, coord: Coord) -> bool {
        self.end_tiles.contains(&coord)
    }

    /// Add a target tile.
    ///
    /// Return `false`, and leave the list unchanged, if the tile is off the board, is the start
    /// tile, or is already a target.
    pub fn add_end_tile(&mut self, coord: Coord) -> bool {
        if !self.contains(coord) || self.start_tile == Some(coord) || self.is_end_tile(coord) {
            return false;
        }
        self.end_tiles.push(coord);
        true
    }

    /// Tiles reached by the last power propagation.
    pub fn powered_tiles(&self) -> &[Coord] {
        &self.powered_tiles
    }

    pub(crate) fn replace_powered_tiles(&mut self, powered: Vec<Coord>) -> Vec<Coord> {
        std::mem::replace(&mut self.powered_tiles, powered)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.height {
            for column in 0..self.width {
                let tile: &Tile = &self.tiles[column * self.height + row];
                let glyphs: &[char; 16] = if tile.is_powered() {
                    &HEAVY_GLYPHS
                } else {
                    &LIGHT_GLYPHS
                };
                write!(f, "{}", glyphs[tile.connections().bits() as usize])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimensions_rejected() {
        assert_eq!(
            Grid::new(0, 4).unwrap_err(),
            GridError::InvalidDimensions {
                width: 0,
                height: 4
            }
        );
        assert!(Grid::new(3, 0).is_err());
    }

    #[test]
    fn test_tiles_at_fixed_coordinates() {
        let grid = Grid::new(4, 3).unwrap();
        assert_eq!(grid.area(), 12);
        for column in 0..4 {
            for row in 0..3 {
                let tile = grid.tile_at(column, row).unwrap();
                assert_eq!((tile.column(), tile.row()), (column, row));
                assert!(tile.connections().is_empty());
                assert!(!tile.is_powered());
            }
        }
        assert_eq!(
            grid.tile_at(4, 0).unwrap_err(),
            GridError::OutOfBounds { column: 4, row: 0 }
        );
    }

    #[test]
    fn test_mutable_access_keeps_coordinates() {
        let mut grid = Grid::new(3, 1).unwrap();
        grid.set_start_tile(Coord::new(0, 0)).unwrap();
        grid.tile_at_mut(0, 0)
            .unwrap()
            .set_connections(Connections::from_directions(&[Direction::East]));
        let tile = grid.tile_at_mut(1, 0).unwrap();
        tile.set_connections(Connections::from_directions(&[Direction::West]));
        tile.rotate_clockwise();
        tile.rotate_counter_clockwise();
        assert_eq!(tile.coord(), Coord::new(1, 0));

        let report = crate::power_flow::recompute_power(&mut grid);
        assert_eq!(report.powered, vec![Coord::new(0, 0), Coord::new(1, 0)]);
        assert!(!grid.tile_at(2, 0).unwrap().is_powered());
        for (i, tile) in grid.tiles().enumerate() {
            assert_eq!((tile.column(), tile.row()), (i, 0));
        }
    }

    #[test]
    fn test_neighbor() {
        let grid = Grid::new(3, 2).unwrap();
        let corner = Coord::new(2, 1);
        assert!(grid.neighbor(corner, Direction::East).is_none());
        assert!(grid.neighbor(corner, Direction::South).is_none());
        assert_eq!(
            grid.neighbor(corner, Direction::North).map(|t| t.coord()),
            Some(Coord::new(2, 0))
        );
        assert_eq!(
            grid.on_board_directions(corner),
            Connections::from_directions(&[Direction::North, Direction::West])
        );
    }

    #[test]
    fn test_end_tiles_are_distinct() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.set_start_tile(Coord::new(2, 2)).unwrap();
        assert!(!grid.add_end_tile(Coord::new(2, 2)));
        assert!(grid.add_end_tile(Coord::new(0, 0)));
        assert!(!grid.add_end_tile(Coord::new(0, 0)));
        assert!(!grid.add_end_tile(Coord::new(5, 0)));
        assert_eq!(grid.end_tiles(), &[Coord::new(0, 0)]);
    }

    #[test]
    fn test_display() {
        let mut grid = Grid::new(2, 1).unwrap();
        grid.tile_at_mut(0, 0)
            .unwrap()
            .set_connections(Connections::from_directions(&[Direction::East]));
        grid.tile_at_mut(1, 0)
            .unwrap()
            .set_connections(Connections::from_directions(&[Direction::West]));
        assert_eq!(format!("{grid}"), "╶╴\n");
    }
}
