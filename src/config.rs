/*
config.rs

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

//! Board generation parameters.
//!
//! The heuristics of the generator are tuned by hand. All the constants live in
//! [`GeneratorConfig`] so that they can be adjusted from a JSON file or from the command line
//! without rebuilding.

use log::debug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const COPYRIGHT_NOTICE: &str = "Copyright 2025 Hervé Quatremain
License GPLv3+: GNU GPL version 3 or later <https://gnu.org/licenses/gpl.html>.
This is free software: you are free to change and redistribute it.
There is NO WARRANTY, to the extent permitted by law.";

/// Type of errors.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file cannot be read.
    Io(std::io::Error),

    /// The configuration file is not valid JSON or has wrong value types.
    Parse(serde_json::Error),

    /// A parameter is out of range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read the configuration file: {e}"),
            ConfigError::Parse(e) => write!(f, "cannot parse the configuration file: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Parameters of the board generator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// A carved path must have at least that many tiles before its last tile can become an end
    /// tile.
    pub min_path_length: usize,

    /// Number of paths the carver tries before giving up on reaching the target number of end
    /// tiles.
    pub max_carve_attempts: usize,

    /// One end tile is targeted for every that many tiles on the board.
    pub tiles_per_end_tile: usize,

    /// Probability that a tile meeting all the end tile criteria is accepted. Lower values
    /// produce longer paths.
    pub endpoint_acceptance: f64,

    /// Weight of "as many openings as possible, up to three" in the filler's draw.
    pub junction_weight: u32,

    /// Weight of "two openings" in the filler's draw.
    pub corridor_weight: u32,

    /// Minimum distance between the start tile and the board border, when the board is large
    /// enough.
    pub start_margin: usize,

    /// Whether end tiles must stay away from the board border.
    pub avoid_edge_endpoints: bool,

    /// Whether tiles are randomly rotated after generation. Without shuffling the board is
    /// generated solved.
    pub shuffle: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_path_length: 10,
            max_carve_attempts: 50,
            tiles_per_end_tile: 30,
            endpoint_acceptance: 0.5,
            junction_weight: 3,
            corridor_weight: 4,
            start_margin: 3,
            avoid_edge_endpoints: false,
            shuffle: true,
        }
    }
}

impl GeneratorConfig {
    /// Read the configuration from a JSON file. Missing parameters take their default value.
    ///
    /// # Errors
    ///
    /// The method returns an error if the file cannot be read or parsed, or if a parameter is
    /// out of range.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!("Configuration file: {path:?}");
        let file: File = File::open(path)?;
        let reader: BufReader<File> = BufReader::new(file);
        let config: GeneratorConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Verify that the parameters are in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.endpoint_acceptance) {
            return Err(ConfigError::Invalid(format!(
                "endpoint_acceptance must be between 0 and 1 (got {})",
                self.endpoint_acceptance
            )));
        }
        if self.tiles_per_end_tile == 0 {
            return Err(ConfigError::Invalid(
                "tiles_per_end_tile must be greater than 0".to_string(),
            ));
        }
        if self.min_path_length == 0 {
            return Err(ConfigError::Invalid(
                "min_path_length must be greater than 0".to_string(),
            ));
        }
        if self.junction_weight == 0 && self.corridor_weight == 0 {
            return Err(ConfigError::Invalid(
                "junction_weight and corridor_weight cannot both be 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of end tiles the carver aims for on a `width` x `height` board.
    pub fn target_end_tiles(&self, width: usize, height: usize) -> usize {
        width * height / self.tiles_per_end_tile.max(1)
    }

    /// Minimum Manhattan distance between a new end tile and the start tile or any existing
    /// end tile. The distance shrinks as end tiles are placed.
    pub fn min_endpoint_distance(&self, width: usize, end_tile_count: usize) -> usize {
        (width / 2).saturating_sub(end_tile_count / 2).max(2)
    }
}
