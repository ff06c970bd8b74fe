/*
board_generation.rs

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

use std::collections::HashSet;

use pipepower::power_flow;
use pipepower::{
    Connections, Coord, GenerationResult, Generator, GeneratorConfig, Grid, Rotation,
};

const SHAPES: [(usize, usize); 3] = [(10, 10), (12, 8), (20, 15)];

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn generate(
    width: usize,
    height: usize,
    config: &GeneratorConfig,
    seed: u64,
) -> (Grid, GenerationResult) {
    let mut generator = Generator::new(config, seed).unwrap();
    let mut grid = Grid::new(width, height).unwrap();
    let result = generator.generate_board(&mut grid);
    (grid, result)
}

#[test]
fn no_opening_leads_off_the_board() {
    init_logger();
    let config = GeneratorConfig::default();
    for (width, height) in SHAPES {
        for seed in 0..15 {
            let (grid, _) = generate(width, height, &config, seed);
            for tile in grid.tiles() {
                for d in tile.connections().iter() {
                    assert!(
                        grid.neighbor(tile.coord(), d).is_some(),
                        "{width}x{height} seed {seed}: {} opens {d} off the board",
                        tile.coord()
                    );
                }
            }
        }
    }
}

#[test]
fn end_tiles_are_distinct_and_spread_out() {
    init_logger();
    let config = GeneratorConfig::default();
    for (width, height) in SHAPES {
        for seed in 0..15 {
            let (grid, result) = generate(width, height, &config, seed);
            let start: Coord = grid.start_tile().unwrap();
            assert_eq!(result.start_tile, Some(start));
            assert_eq!(result.end_tiles, grid.end_tiles());
            assert!(result.end_tiles.len() <= result.target_end_tiles);

            let unique: HashSet<Coord> = grid.end_tiles().iter().copied().collect();
            assert_eq!(unique.len(), grid.end_tiles().len());
            assert!(!unique.contains(&start));

            for (k, end) in grid.end_tiles().iter().enumerate() {
                let min_distance: usize = config.min_endpoint_distance(width, k);
                assert!(end.distance(start) >= min_distance);
                for previous in &grid.end_tiles()[..k] {
                    assert!(end.distance(*previous) >= min_distance);
                }
            }
        }
    }
}

#[test]
fn unshuffled_boards_are_solved() {
    init_logger();
    let config = GeneratorConfig {
        shuffle: false,
        ..GeneratorConfig::default()
    };
    for (width, height) in SHAPES {
        for seed in 0..10 {
            let (grid, _) = generate(width, height, &config, seed);
            assert!(power_flow::is_victory(&grid));
            for end in grid.end_tiles() {
                let tile = grid.tile(*end).unwrap();
                assert_eq!(tile.connection_count(), 1);
                assert!(tile.is_powered());
            }
        }
    }
}

#[test]
fn same_seed_same_board() {
    init_logger();
    let config = GeneratorConfig::default();
    for (width, height) in SHAPES {
        let (a, ra) = generate(width, height, &config, 77);
        let (b, rb) = generate(width, height, &config, 77);
        assert_eq!(a.start_tile(), b.start_tile());
        assert_eq!(a.end_tiles(), b.end_tiles());
        assert_eq!(ra.carve_attempts, rb.carve_attempts);
        let masks_a: Vec<Connections> = a.tiles().map(|t| t.connections()).collect();
        let masks_b: Vec<Connections> = b.tiles().map(|t| t.connections()).collect();
        assert_eq!(masks_a, masks_b);
    }
}

#[test]
fn power_recomputation_is_idempotent() {
    init_logger();
    let config = GeneratorConfig::default();
    for seed in 0..10 {
        let (mut grid, _) = generate(12, 8, &config, seed);
        let before: Vec<Coord> = grid.powered_tiles().to_vec();
        let report = power_flow::recompute_power(&mut grid);
        assert_eq!(report.powered, before);
        assert!(report.newly_powered.is_empty());
        assert!(report.newly_unpowered.is_empty());
        assert!(report.powered.contains(&grid.start_tile().unwrap()));
    }
}

#[test]
fn four_rotations_restore_the_tile() {
    init_logger();
    let (mut grid, _) = generate(10, 10, &GeneratorConfig::default(), 5);
    let powered: Vec<Coord> = grid.powered_tiles().to_vec();
    for (column, row) in [(0, 0), (4, 7), (9, 9)] {
        let before: Connections = grid.tile_at(column, row).unwrap().connections();
        for _ in 0..4 {
            pipepower::rotation::rotate(&mut grid, column, row, Rotation::CounterClockwise)
                .unwrap();
        }
        assert_eq!(grid.tile_at(column, row).unwrap().connections(), before);
    }
    power_flow::recompute_power(&mut grid);
    assert_eq!(grid.powered_tiles(), powered);
}

#[test]
fn end_tiles_avoid_the_border_on_request() {
    init_logger();
    let config = GeneratorConfig {
        avoid_edge_endpoints: true,
        ..GeneratorConfig::default()
    };
    let mut total: usize = 0;
    for seed in 0..30 {
        let (grid, _) = generate(15, 15, &config, seed);
        for end in grid.end_tiles() {
            assert!(
                end.column > 0 && end.column < 14 && end.row > 0 && end.row < 14,
                "seed {seed}: end tile {end} is on the border"
            );
        }
        total += grid.end_tiles().len();
    }
    assert!(total > 0);
}
