/*
filler.rs

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

//! Give random openings to the tiles that no carved path went through.

use log::debug;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::config::GeneratorConfig;
use crate::grid::Grid;
use crate::tile::{Connections, Coord, Direction};

/// [`Filler`] object.
pub struct Filler {
    /// Weight of drawing as many openings as the tile allows, up to three.
    junction_weight: u32,

    /// Weight of drawing two openings.
    corridor_weight: u32,
}

impl Filler {
    /// Create the object.
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            junction_weight: config.junction_weight,
            corridor_weight: config.corridor_weight,
        }
    }

    /// Fill every tile that is not the start tile, an end tile, or on a carved path.
    ///
    /// Openings never point off the board. Tiles are filled independently: nothing guarantees
    /// that the openings of two adjacent tiles match.
    pub fn fill<R: Rng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) {
        let coords: Vec<Coord> = grid
            .tiles()
            .filter(|t| t.connections().is_empty())
            .map(|t| t.coord())
            .filter(|c| grid.start_tile() != Some(*c) && !grid.is_end_tile(*c))
            .collect();

        for coord in &coords {
            let mut possible: Vec<Direction> = grid.on_board_directions(*coord).iter().collect();
            if possible.is_empty() {
                continue;
            }
            possible.shuffle(rng);

            let count: usize = self.connection_count(possible.len(), rng);
            let connections: Connections = Connections::from_directions(&possible[..count]);
            if let Ok(tile) = grid.tile_mut(*coord) {
                tile.set_connections(connections);
            }
        }
        debug!("Filled {} tiles", coords.len());
    }

    /// Draw a number of openings for a tile that has `available` on-board sides.
    fn connection_count<R: Rng + ?Sized>(&self, available: usize, rng: &mut R) -> usize {
        let upper: usize = available.min(3);
        let pool: [(usize, u32); 2] = [
            (upper, self.junction_weight),
            (available.min(2), self.corridor_weight),
        ];
        match pool.choose_weighted(rng, |p| p.1) {
            Ok(p) => p.0,
            Err(_) => available.min(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_fill_respects_edges() {
        let mut grid = Grid::new(6, 4).unwrap();
        let filler = Filler::new(&GeneratorConfig::default());
        let mut rng = StdRng::seed_from_u64(3);
        filler.fill(&mut grid, &mut rng);

        for tile in grid.tiles() {
            let allowed = grid.on_board_directions(tile.coord());
            let count = tile.connection_count();
            assert!((2..=3).contains(&count), "tile {} has {count}", tile.coord());
            for d in tile.connections().iter() {
                assert!(allowed.contains(d));
            }
        }
    }

    #[test]
    fn test_fill_skips_start_end_and_carved_tiles() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.set_start_tile(Coord::new(2, 2)).unwrap();
        grid.add_end_tile(Coord::new(0, 0));
        let carved = Connections::from_directions(&[Direction::North, Direction::South]);
        grid.tile_at_mut(4, 2).unwrap().set_connections(carved);

        let filler = Filler::new(&GeneratorConfig::default());
        let mut rng = StdRng::seed_from_u64(11);
        filler.fill(&mut grid, &mut rng);

        assert!(grid.tile_at(2, 2).unwrap().connections().is_empty());
        assert!(grid.tile_at(0, 0).unwrap().connections().is_empty());
        assert_eq!(grid.tile_at(4, 2).unwrap().connections(), carved);
        assert!(!grid.tile_at(1, 1).unwrap().connections().is_empty());
    }

    #[test]
    fn test_count_follows_weights() {
        let config = GeneratorConfig {
            junction_weight: 0,
            corridor_weight: 1,
            ..GeneratorConfig::default()
        };
        let filler = Filler::new(&config);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            assert_eq!(filler.connection_count(4, &mut rng), 2);
            assert_eq!(filler.connection_count(1, &mut rng), 1);
        }

        let config = GeneratorConfig {
            junction_weight: 1,
            corridor_weight: 0,
            ..GeneratorConfig::default()
        };
        let filler = Filler::new(&config);
        assert_eq!(filler.connection_count(4, &mut rng), 3);
        assert_eq!(filler.connection_count(2, &mut rng), 2);
    }

    #[test]
    fn test_single_tile_board() {
        let mut grid = Grid::new(1, 1).unwrap();
        let filler = Filler::new(&GeneratorConfig::default());
        let mut rng = StdRng::seed_from_u64(0);
        filler.fill(&mut grid, &mut rng);
        assert!(grid.tile_at(0, 0).unwrap().connections().is_empty());
    }
}
