/*
shuffler.rs

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

//! Scramble the orientation of the tiles once the board is generated.

use log::debug;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::grid::Grid;
use crate::tile::{Connections, Coord};

/// Rotate every tile clockwise a random number of times, between 0 and 3.
///
/// Border tiles only get the rotation counts that keep their openings on the board. The
/// current orientation (0 rotation) is always one of them.
pub fn shuffle<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    let coords: Vec<Coord> = grid.tiles().map(|t| t.coord()).collect();
    let mut rotated: usize = 0;

    for coord in coords {
        let allowed: Connections = grid.on_board_directions(coord);
        let Ok(tile) = grid.tile_mut(coord) else {
            continue;
        };

        let mut turns: Vec<usize> = Vec::with_capacity(4);
        let mut c: Connections = tile.connections();
        for n in 0..4 {
            if c.bits() & !allowed.bits() == 0 {
                turns.push(n);
            }
            c = c.rotated_clockwise();
        }

        let n: usize = turns.choose(rng).copied().unwrap_or(0);
        for _ in 0..n {
            tile.rotate_clockwise();
        }
        if n > 0 {
            rotated += 1;
        }
    }
    debug!("Shuffled the board: {rotated} tiles rotated");
}
