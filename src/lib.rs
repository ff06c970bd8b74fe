/*
lib.rs

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

//! Procedural generator for rotate-the-pipes puzzles.
//!
//! A board is a rectangular [`grid::Grid`] of [`tile::Tile`] objects. Each tile has openings
//! on some of its four sides. Power flows from the start tile through mutually open sides, and
//! the board is solved when every end tile is powered. The player can only rotate tiles.

pub mod cli_options;
pub mod config;
pub mod game;
pub mod generator;
pub mod grid;
pub mod power_flow;
pub mod rotation;
pub mod tile;

pub use config::GeneratorConfig;
pub use game::{BoardEvent, Game, GameError};
pub use generator::{GenerationResult, Generator};
pub use grid::{Grid, GridError};
pub use rotation::Rotation;
pub use tile::{Connections, Coord, Direction, Tile};
