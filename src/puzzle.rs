/*
puzzle.rs

Copyright 2025 Hervé Quatremain

This file is part of Dotlink.

Dotlink is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Dotlink is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Dotlink. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Puzzle as seen by the players.
//!
//! A [`Puzzle`] object is built from a generated [`Grid`]: the empty cells become stones, and
//! each path becomes a [`Pair`] of dots.
//! The object also records the parameters needed to generate the same puzzle again: the size,
//! the [`Mode`], and the seed.

use clap::ValueEnum;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

use crate::generator::flow_generator::{Generator, GeneratorConfig};
use crate::generator::grid::{Cell, Grid};
use crate::generator::path::Color;
use crate::generator::point::Point;
use crate::generator::seeded_random::{RandomSource, SeededRandom};

/// Smallest grid size accepted by the hosts.
pub const MIN_SIZE: usize = 5;

/// Largest grid size accepted by the hosts.
pub const MAX_SIZE: usize = 20;

/// Number of characters in the generated seeds.
const SEED_LENGTH: usize = 6;

/// Characters used in the generated seeds.
const SEED_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Puzzle mode.
///
/// In `Hard` mode, the two dots of a non-filler pair are never in the same row or column.
#[derive(
    Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, ValueEnum, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Normal,
    Hard,
}

impl Mode {
    pub fn is_hard(self) -> bool {
        self == Mode::Hard
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mode::Normal => write!(f, "normal"),
            Mode::Hard => write!(f, "hard"),
        }
    }
}

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum PuzzleError {
    /// The grid size is outside [`MIN_SIZE`]..=[`MAX_SIZE`].
    InvalidSize(usize),

    /// No valid puzzle could be generated for that seed.
    Exhausted { seed: String, attempts: usize },
}

impl fmt::Display for PuzzleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PuzzleError::InvalidSize(size) => write!(
                f,
                "Invalid grid size {size} (must be between {MIN_SIZE} and {MAX_SIZE})"
            ),
            PuzzleError::Exhausted { seed, attempts } => write!(
                f,
                "No puzzle found for seed {seed} after {attempts} attempts, try again with another seed"
            ),
        }
    }
}

impl Error for PuzzleError {}

/// Two dots to connect.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Pair {
    /// Number displayed on the dots.
    pub id: usize,

    pub color: Color,

    /// First dot.
    pub start: Point,

    /// Second dot.
    pub end: Point,

    /// Whether the pair comes from the filling of leftover space.
    pub is_filler: bool,

    /// Route found by the generator, which is one solution for the pair.
    pub route: Vec<Point>,
}

/// [`Puzzle`] object.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Puzzle {
    pub size: usize,

    pub mode: Mode,

    /// Seed the puzzle was generated from.
    pub seed: String,

    /// Pairs, ordered by ID.
    pub pairs: Vec<Pair>,

    /// Cells that no path can cross, row by row.
    pub stones: Vec<Point>,

    /// Number of generation attempts.
    #[serde(skip)]
    pub attempts: usize,

    /// Generation duration in seconds.
    #[serde(skip)]
    pub duration: f32,
}

/// Return a random seed made of uppercase letters and digits.
pub fn random_seed() -> String {
    let mut random: SeededRandom = SeededRandom::from_entropy();
    debug!("Seed characters drawn from {}", random.seed());
    (0..SEED_LENGTH)
        .map(|_| SEED_CHARS[random.range(0, SEED_CHARS.len())] as char)
        .collect()
}

/// Return the given seed, or a new random seed if it is missing or blank.
pub fn resolve_seed(seed: Option<&str>) -> String {
    match seed.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => {
            let s: String = random_seed();
            debug!("No seed provided, using {s}");
            s
        }
    }
}

/// Verify that the grid size can be used by the hosts.
pub fn check_size(size: usize) -> Result<(), PuzzleError> {
    if (MIN_SIZE..=MAX_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(PuzzleError::InvalidSize(size))
    }
}

impl Puzzle {
    /// Generate a puzzle.
    ///
    /// A random seed is used if `seed` is missing. The seed actually used is recorded in the
    /// returned object.
    ///
    /// # Errors
    ///
    /// The method returns an error if the size is out of range, or if the generator gives up.
    pub fn generate(size: usize, mode: Mode, seed: Option<&str>) -> Result<Self, PuzzleError> {
        Self::generate_with_config(size, mode, seed, GeneratorConfig::default())
    }

    /// Generate a puzzle with the given generator tunables.
    ///
    /// # Errors
    ///
    /// See [`Puzzle::generate`].
    pub fn generate_with_config(
        size: usize,
        mode: Mode,
        seed: Option<&str>,
        config: GeneratorConfig,
    ) -> Result<Self, PuzzleError> {
        check_size(size)?;
        let seed: String = resolve_seed(seed);

        let mut grid: Grid = Grid::new(size);
        let mut generator =
            Generator::new(&mut grid, SeededRandom::from_text(&seed), mode.is_hard())
                .with_config(config);
        let success: bool = generator.generate();
        let attempts: usize = generator.attempts;
        let duration: f32 = generator.duration;

        if !success {
            warn!("Generation failed for seed {seed} ({size}x{size}, {mode})");
            return Err(PuzzleError::Exhausted { seed, attempts });
        }

        grid.convert_empty_to_stones();
        let mut puzzle: Puzzle = Self::from_grid(&grid, mode, &seed);
        puzzle.attempts = attempts;
        puzzle.duration = duration;
        Ok(puzzle)
    }

    /// Build the object from a generated grid.
    ///
    /// Empty cells are reported as stones, whether they were converted or not.
    pub fn from_grid(grid: &Grid, mode: Mode, seed: &str) -> Self {
        let pairs: Vec<Pair> = grid
            .paths
            .iter()
            .filter_map(|path| {
                Some(Pair {
                    id: path.id,
                    color: path.color,
                    start: path.head()?,
                    end: path.tail()?,
                    is_filler: path.is_filler,
                    route: path.coordinates(),
                })
            })
            .collect();
        let mut stones: Vec<Point> = grid.stones();
        stones.extend(grid.empty_cells());
        stones.sort_unstable();

        Self {
            size: grid.size(),
            mode,
            seed: seed.to_string(),
            pairs,
            stones,
            attempts: 0,
            duration: 0.0,
        }
    }

    /// Return the pair that has a dot on the given cell.
    pub fn pair_at(&self, point: Point) -> Option<&Pair> {
        self.pairs
            .iter()
            .find(|p| p.start == point || p.end == point)
    }

    /// Build a grid with the stones and the solution routes.
    pub fn solution_grid(&self) -> Grid {
        let mut grid: Grid = Grid::new(self.size);
        for stone in &self.stones {
            grid.set_cell(*stone, Cell::Stone);
        }
        for pair in &self.pairs {
            for p in &pair.route {
                grid.set_cell(*p, Cell::Path(pair.id));
            }
        }
        grid
    }
}
