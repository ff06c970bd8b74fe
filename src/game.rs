/*
game.rs

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

//! Manage the board being played.
//!
//! [`Game`] owns the [`Grid`] and the [`Generator`]. The presentation layer drives it with
//! [`Game::rotate`] and follows the state changes through the [`BoardEvent`] channel returned
//! by [`Game::events`]. When the board is solved, the presentation layer plays its animations
//! and then asks for a new board with [`Game::next_board`].

use log::{debug, info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt;

use crate::config::{ConfigError, GeneratorConfig};
use crate::generator::{GenerationResult, Generator};
use crate::grid::{Grid, GridError};
use crate::power_flow::{self, DropPoint, PowerReport};
use crate::rotation::{self, Rotation};
use crate::tile::Coord;

/// Maximum number of events waiting in the channel. Extra events are dropped.
const EVENT_CAPACITY: usize = 4096;

/// Type of errors.
#[derive(Debug)]
pub enum GameError {
    Grid(GridError),
    Config(ConfigError),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameError::Grid(e) => write!(f, "{e}"),
            GameError::Config(e) => write!(f, "{e}"),
        }
    }
}

impl Error for GameError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GameError::Grid(e) => Some(e),
            GameError::Config(e) => Some(e),
        }
    }
}

impl From<GridError> for GameError {
    fn from(e: GridError) -> Self {
        GameError::Grid(e)
    }
}

impl From<ConfigError> for GameError {
    fn from(e: ConfigError) -> Self {
        GameError::Config(e)
    }
}

/// State changes published for the presentation layer.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum BoardEvent {
    /// Power reached the tile.
    TilePowered(Coord),

    /// The tile lost power.
    TileUnpowered(Coord),

    /// All the end tiles are powered.
    Victory,

    /// A new board replaced the previous one.
    Regenerated { width: usize, height: usize },
}

/// Manage the board being played.
pub struct Game {
    /// Current board.
    grid: Grid,

    /// Generator for this board and the next ones.
    generator: Generator,

    /// Outcome of the last generation.
    generation: GenerationResult,

    /// Number of rotations the player made on the current board.
    moves: usize,

    /// Whether the current board is solved.
    solved: bool,

    /// Event channel. The game keeps one receiver so that the channel never closes, and uses
    /// it to discard the events of a board that is replaced.
    sender: async_channel::Sender<BoardEvent>,
    receiver: async_channel::Receiver<BoardEvent>,
}

impl Game {
    /// Create a [`Game`] object and generate its first board.
    ///
    /// # Errors
    ///
    /// The method returns an error if the dimensions or the configuration are not valid.
    pub fn new(
        width: usize,
        height: usize,
        config: &GeneratorConfig,
        seed: u64,
    ) -> Result<Self, GameError> {
        let mut grid: Grid = Grid::new(width, height)?;
        let mut generator: Generator = Generator::new(config, seed)?;
        let generation: GenerationResult = generator.generate_board(&mut grid);
        let (sender, receiver) = async_channel::bounded::<BoardEvent>(EVENT_CAPACITY);

        let mut game: Game = Self {
            grid,
            generator,
            generation,
            moves: 0,
            solved: false,
            sender,
            receiver,
        };
        game.solved = power_flow::is_victory(&game.grid);
        info!(
            "New {width}x{height} board (seed {seed}): {} end tiles",
            game.generation.end_tiles.len()
        );
        Ok(game)
    }

    /// Return a receiver for the board events.
    ///
    /// The receivers share the same queue: each event is delivered to only one of them.
    pub fn events(&self) -> async_channel::Receiver<BoardEvent> {
        self.receiver.clone()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Outcome of the generation of the current board.
    pub fn generation(&self) -> &GenerationResult {
        &self.generation
    }

    /// Return the number of rotations made on the current board.
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Whether the current board is solved.
    pub fn is_victory(&self) -> bool {
        self.solved
    }

    /// Rotate a tile, propagate power again, and publish the resulting events.
    ///
    /// # Errors
    ///
    /// The method returns an error if there is no tile at the given coordinates.
    pub fn rotate(
        &mut self,
        column: usize,
        row: usize,
        rotation: Rotation,
    ) -> Result<PowerReport, GameError> {
        rotation::rotate(&mut self.grid, column, row, rotation)?;
        self.moves += 1;
        Ok(self.recompute_power())
    }

    /// Propagate power and publish the resulting events.
    pub fn recompute_power(&mut self) -> PowerReport {
        let report: PowerReport = power_flow::recompute_power(&mut self.grid);

        for coord in &report.newly_unpowered {
            self.publish(BoardEvent::TileUnpowered(*coord));
        }
        for coord in &report.newly_powered {
            self.publish(BoardEvent::TilePowered(*coord));
        }

        if report.victory && !self.solved {
            info!("Board solved in {} moves", self.moves);
            self.publish(BoardEvent::Victory);
        }
        self.solved = report.victory;
        report
    }

    /// Leaking openings of the powered tiles.
    pub fn slime_drop_points(&self) -> Vec<DropPoint> {
        power_flow::slime_drop_points(&self.grid)
    }

    /// Replace the board by a new one with the same dimensions.
    ///
    /// Events of the previous board that nobody received are discarded, so that the first
    /// event a receiver gets afterward is [`BoardEvent::Regenerated`].
    pub fn next_board(&mut self) -> Result<&GenerationResult, GameError> {
        let (width, height) = (self.grid.width(), self.grid.height());
        let mut grid: Grid = Grid::new(width, height)?;
        self.generation = self.generator.generate_board(&mut grid);
        self.grid = grid;
        self.moves = 0;
        self.solved = power_flow::is_victory(&self.grid);

        let stale: usize = std::iter::from_fn(|| self.receiver.try_recv().ok()).count();
        if stale > 0 {
            debug!("Discarded {stale} events of the previous board");
        }
        debug!(
            "Regenerated {width}x{height} board: {} end tiles",
            self.generation.end_tiles.len()
        );
        self.publish(BoardEvent::Regenerated { width, height });
        Ok(&self.generation)
    }

    /// Queue an event without blocking.
    fn publish(&self, event: BoardEvent) {
        if let Err(e) = self.sender.try_send(event) {
            warn!("Board event dropped: {e}");
        }
    }
}
