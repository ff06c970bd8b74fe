/*
rotation.rs

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

//! Player rotations.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::grid::{Grid, GridError};
use crate::power_flow::{self, PowerReport};
use crate::tile::Tile;

/// Rotation direction.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Clockwise,
    CounterClockwise,
}

/// Rotate a tile by a quarter turn and return its new state.
///
/// The powered flags are not updated: call [`power_flow::recompute_power`] afterward, or use
/// [`rotate_and_recompute`].
pub fn rotate(
    grid: &mut Grid,
    column: usize,
    row: usize,
    rotation: Rotation,
) -> Result<Tile, GridError> {
    let tile: &mut Tile = grid.tile_at_mut(column, row)?;
    match rotation {
        Rotation::Clockwise => tile.rotate_clockwise(),
        Rotation::CounterClockwise => tile.rotate_counter_clockwise(),
    }
    debug!(
        "Rotated {} {rotation:?}: {}",
        tile.coord(),
        tile.connections()
    );
    Ok(*tile)
}

/// Rotate a tile and propagate power again.
pub fn rotate_and_recompute(
    grid: &mut Grid,
    column: usize,
    row: usize,
    rotation: Rotation,
) -> Result<(Tile, PowerReport), GridError> {
    rotate(grid, column, row, rotation)?;
    let report: PowerReport = power_flow::recompute_power(grid);
    let tile: Tile = *grid.tile_at(column, row)?;
    Ok((tile, report))
}
