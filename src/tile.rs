/*
tile.rs

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

//! Board cells and their pipe openings.
//!
//! A [`Tile`] stores its fixed board coordinates, the set of open [`Direction`]s (a
//! [`Connections`] bitmask), and whether power currently reaches it.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::FromRepr;

/// Side of a tile.
///
/// The discriminant is also the bit position of the direction in a [`Connections`] mask.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, FromRepr)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Direction {
    /// All the directions, in clockwise order starting from north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Return the direction on the other side of the tile.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Column and row deltas for a one-tile move in that direction.
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Direction::North => write!(f, "north"),
            Direction::East => write!(f, "east"),
            Direction::South => write!(f, "south"),
            Direction::West => write!(f, "west"),
        }
    }
}

/// Set of open directions, stored as a 4-bit mask.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Connections(u8);

impl Connections {
    const MASK: u8 = 0b1111;

    /// No open direction.
    pub const NONE: Connections = Connections(0);

    /// The four directions open.
    pub const ALL: Connections = Connections(Self::MASK);

    /// Build a set from a list of directions. Duplicates are ignored.
    pub fn from_directions(directions: &[Direction]) -> Self {
        let mut c: Connections = Connections::NONE;
        for d in directions {
            c.insert(*d);
        }
        c
    }

    /// Return the raw mask (north is bit 0, then east, south, and west).
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whether the given direction is open.
    pub fn contains(self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    /// Open the given direction.
    pub fn insert(&mut self, direction: Direction) {
        self.0 |= direction.bit();
    }

    /// Close the given direction.
    pub fn remove(&mut self, direction: Direction) {
        self.0 &= !direction.bit();
    }

    /// Number of open directions.
    pub fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Directions open in either set.
    pub fn union(self, other: Connections) -> Connections {
        Connections(self.0 | other.0)
    }

    /// Iterate over the open directions, in clockwise order starting from north.
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        (0..4u8)
            .filter(move |i| self.0 & (1 << i) != 0)
            .filter_map(Direction::from_repr)
    }

    /// Relabel the openings for a quarter turn clockwise: the opening that was facing north
    /// now faces east, and so on.
    pub fn rotated_clockwise(self) -> Connections {
        Connections(((self.0 << 1) | (self.0 >> 3)) & Self::MASK)
    }

    /// Inverse of [`Connections::rotated_clockwise`].
    pub fn rotated_counter_clockwise(self) -> Connections {
        Connections(((self.0 >> 1) | (self.0 << 3)) & Self::MASK)
    }
}

impl fmt::Display for Connections {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for d in Direction::ALL {
            let c: char = match d {
                Direction::North => 'N',
                Direction::East => 'E',
                Direction::South => 'S',
                Direction::West => 'W',
            };
            if self.contains(d) {
                write!(f, "{c}")?;
            } else {
                write!(f, "-")?;
            }
        }
        Ok(())
    }
}

/// Board coordinates of a tile.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub column: usize,
    pub row: usize,
}

impl Coord {
    pub fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }

    /// Manhattan distance between two coordinates.
    pub fn distance(self, other: Coord) -> usize {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }

    /// Coordinates of the adjacent tile in the given direction, or None if the move leaves a
    /// `width` x `height` board.
    pub fn step(self, direction: Direction, width: usize, height: usize) -> Option<Coord> {
        let (dx, dy) = direction.offset();
        let column: usize = self.column.checked_add_signed(dx)?;
        let row: usize = self.row.checked_add_signed(dy)?;
        if column >= width || row >= height {
            None
        } else {
            Some(Coord { column, row })
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({},{})", self.column, self.row)
    }
}

/// A board cell.
///
/// The coordinates never change once the tile is created. The connections are changed by the
/// generator and by rotations, the powered flag only by [`crate::power_flow`].
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Tile {
    column: usize,
    row: usize,
    connections: Connections,
    pub(crate) powered: bool,
}

impl Tile {
    /// Create an unpowered tile with no openings.
    pub fn new(column: usize, row: usize) -> Self {
        Self {
            column,
            row,
            connections: Connections::NONE,
            powered: false,
        }
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn coord(&self) -> Coord {
        Coord::new(self.column, self.row)
    }

    pub fn connections(&self) -> Connections {
        self.connections
    }

    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// Whether the opening on the given side is open.
    pub fn is_open(&self, direction: Direction) -> bool {
        self.connections.contains(direction)
    }

    /// Whether a tile entered by moving `direction` has an opening facing back the way it was
    /// entered.
    pub fn opposite_is_open(&self, direction: Direction) -> bool {
        self.connections.contains(direction.opposite())
    }

    pub fn connection_count(&self) -> usize {
        self.connections.count()
    }

    /// Replace the openings. Only the generator does this; players rotate instead.
    pub fn set_connections(&mut self, connections: Connections) {
        self.connections = connections;
    }

    /// Add openings to the existing ones.
    pub fn open_connections(&mut self, connections: Connections) {
        self.connections = self.connections.union(connections);
    }

    pub fn rotate_clockwise(&mut self) {
        self.connections = self.connections.rotated_clockwise();
    }

    pub fn rotate_counter_clockwise(&mut self) {
        self.connections = self.connections.rotated_counter_clockwise();
    }
}
