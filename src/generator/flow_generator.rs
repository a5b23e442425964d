/*
flow_generator.rs

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

//! Generate a random puzzle.
//!
//! [`Generator::generate`] runs the generation pipeline on the grid it was given, at most
//! [`GeneratorConfig::max_attempts`] times:
//!
//! 1. Greedy pairing: random pairs of dots joined by a shortest route.
//! 2. Random expansion: the dots are pushed outward into the free cells.
//! 3. Tightening: detours left by the expansion are replaced by shortest routes.
//! 4. Expansion again, to refill the space released by the tightening.
//! 5. Small void filling (see [`super::packing`]).
//! 6. Collinear merging (see [`super::packing`]).
//! 7. ID reshuffle (see [`super::packing`]).
//!
//! The attempt succeeds when the resulting paths pass [`Generator::validate_grid`].

use log::{Level, debug, info, log_enabled};
use std::time::Instant;

use super::grid::Grid;
use super::path::{End, PointType};
use super::point::{DIRECTIONS, Direction, Point};
use super::routing::shortest_route;
use super::seeded_random::RandomSource;

/// Generation tunables.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Number of attempts before giving up.
    pub max_attempts: usize,

    /// The greedy pairing stops after that many failed pairs in a row.
    pub max_consecutive_pair_failures: usize,

    /// The greedy pairing stops after that many pairs have been tried.
    pub max_pair_attempts: usize,

    /// Maximum number of rounds of the random expansion.
    pub max_expansion_rounds: usize,

    /// Maximum number of cells in a filler path created by the small void filling.
    pub void_search_depth: usize,

    /// In hard mode, number of first pairs that prefer dots in opposite quadrants.
    pub hard_spread_pairs: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 500,
            max_consecutive_pair_failures: 50,
            max_pair_attempts: 1000,
            max_expansion_rounds: 1000,
            void_search_depth: 6,
            hard_spread_pairs: 3,
        }
    }
}

/// [`Generator`] object.
///
/// The generator borrows the grid for its whole life and is the only writer during
/// [`Generator::generate`].
pub struct Generator<'a, R: RandomSource> {
    /// Grid that receives the puzzle.
    pub(super) grid: &'a mut Grid,

    /// Source for all the random decisions.
    pub(super) random: R,

    /// Forbid dots in the same row or column. The expansion applies the rule to every path,
    /// the validation only to non-filler paths.
    pub(super) hard_mode: bool,

    pub(super) config: GeneratorConfig,

    /// Number of attempts used by the last call to [`Generator::generate`].
    pub attempts: usize,

    /// Duration in seconds of the last call to [`Generator::generate`].
    pub duration: f32,
}

impl<'a, R: RandomSource> Generator<'a, R> {
    /// Create the object.
    pub fn new(grid: &'a mut Grid, random: R, hard_mode: bool) -> Self {
        Self {
            grid,
            random,
            hard_mode,
            config: GeneratorConfig::default(),
            attempts: 0,
            duration: 0.0,
        }
    }

    /// Replace the default tunables.
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Generate a puzzle in the grid.
    ///
    /// Return `true` on success: the grid then holds the paths and their labeled cells.
    /// Cells left empty are meant to become stones; converting them is up to the caller.
    /// On failure the grid content is undefined.
    pub fn generate(&mut self) -> bool {
        let start: Instant = Instant::now();
        self.attempts = 0;

        let mut success: bool = false;
        while self.attempts < self.config.max_attempts {
            self.attempts += 1;
            if self.run_attempt() {
                success = true;
                break;
            }
        }
        self.duration = start.elapsed().as_secs_f32();

        if success {
            info!(
                "Puzzle {}x{} generated: {} paths, {} attempts, {}s",
                self.grid.size(),
                self.grid.size(),
                self.grid.paths.len(),
                self.attempts,
                self.duration
            );
            if log_enabled!(Level::Debug) {
                for path in &self.grid.paths {
                    debug!(
                        "Path {}: {} cells, {} from expansion{}",
                        path.id,
                        path.len(),
                        path.extension_len(),
                        if path.is_filler { " (filler)" } else { "" }
                    );
                }
                debug!("Final grid:\n{}", self.grid.dump());
            }
        } else {
            info!(
                "No puzzle {}x{} after {} attempts ({}s)",
                self.grid.size(),
                self.grid.size(),
                self.attempts,
                self.duration
            );
        }
        success
    }

    /// Run the whole pipeline once on a cleared grid.
    fn run_attempt(&mut self) -> bool {
        self.grid.reset();

        if !self.fill_greedy() {
            debug!("Attempt {}: not enough pairs", self.attempts);
            return false;
        }
        self.expand_paths_random(false);
        self.tighten_paths();
        self.expand_paths_random(true);

        self.fill_small_voids();
        self.expand_paths_random(true);
        self.tighten_paths();
        self.expand_paths_random(true);
        self.fill_small_voids();

        self.merge_collinear_paths();
        self.shuffle_path_ids();

        let valid: bool = self.validate_grid();
        debug!(
            "Attempt {}: {} paths, {} empty cells, valid = {valid}",
            self.attempts,
            self.grid.paths.len(),
            self.grid.empty_cells().len()
        );
        valid
    }

    /// Add pairs until too many of them fail. Succeed if at least two paths exist.
    pub(super) fn fill_greedy(&mut self) -> bool {
        let mut failures: usize = 0;
        let mut tries: usize = 0;

        while failures < self.config.max_consecutive_pair_failures
            && tries < self.config.max_pair_attempts
        {
            tries += 1;
            if self.add_pair() {
                failures = 0;
            } else {
                failures += 1;
            }
        }
        self.grid.paths.len() >= 2
    }

    /// Try to join two random empty cells with a new path.
    pub(super) fn add_pair(&mut self) -> bool {
        let empties: Vec<Point> = self.grid.empty_cells();
        if empties.is_empty() {
            return false;
        }
        let a: Point = empties[self.random.range(0, empties.len())];
        let size: i32 = self.grid.size() as i32;

        let mut candidates: Vec<Point> = empties.into_iter().filter(|b| *b != a).collect();

        if self.hard_mode {
            candidates.retain(|b| b.row != a.row && b.col != a.col);

            // Spread the first pairs over the grid
            if self.grid.paths.len() < self.config.hard_spread_pairs {
                let opposite: Vec<Point> = candidates
                    .iter()
                    .copied()
                    .filter(|b| in_opposite_quadrants(size, a, *b))
                    .collect();
                if !opposite.is_empty() {
                    candidates = opposite;
                }
            }
        }

        // The first pair goes across the grid
        if self.grid.paths.is_empty() {
            let min_distance: i32 = 2 * size / 3;
            let far: Vec<Point> = candidates
                .iter()
                .copied()
                .filter(|b| a.distance(*b) >= min_distance)
                .collect();
            if !far.is_empty() {
                candidates = far;
            }
        }

        if candidates.is_empty() {
            return false;
        }
        let b: Point = candidates[self.random.range(0, candidates.len())];

        match shortest_route(self.grid, a, b) {
            Some(route) if route.len() >= 3 => {
                let id: usize = self.grid.push_path(&route, PointType::Core, false);
                debug!("Path {id}: {a} -> {b} ({} cells)", route.len());
                true
            }
            _ => false,
        }
    }

    /// Grow the paths by their dots until none can grow.
    ///
    /// `is_extension` tags the new points as [`PointType::Extension`] and lets a dot come next to
    /// the other dot of its path.
    pub(super) fn expand_paths_random(&mut self, is_extension: bool) {
        let mut rounds: usize = 0;
        while rounds < self.config.max_expansion_rounds {
            rounds += 1;
            let mut order: Vec<usize> = (0..self.grid.paths.len()).collect();
            self.random.shuffle(&mut order);

            let mut grew: bool = false;
            for index in order {
                for end in [End::Head, End::Tail] {
                    if self.try_extend(index, end, is_extension) {
                        grew = true;
                    }
                }
            }
            if !grew {
                break;
            }
        }
        debug!("Expansion (extension = {is_extension}) stopped after {rounds} rounds");
    }

    /// Move one dot of the path to an adjacent empty cell.
    fn try_extend(&mut self, index: usize, end: End, is_extension: bool) -> bool {
        let path = &self.grid.paths[index];
        let (Some(tip), Some(other)) = (path.end(end), path.end(end.other())) else {
            return false;
        };
        let id: usize = path.id;

        // When the dot was reached by a turn, going back the way the path came before that turn
        // would draw a U.
        let u_turn: Option<Direction> = match (path.step_toward(end, 0), path.step_toward(end, 1))
        {
            (Some(last), Some(before)) if last != before => Some(before.opposite()),
            _ => None,
        };

        let mut candidates: Vec<(Direction, Point)> = DIRECTIONS
            .iter()
            .map(|d| (*d, tip.step(*d)))
            .filter(|(_, p)| self.grid.is_empty(*p))
            .collect();
        self.random.shuffle(&mut candidates);

        for (dir, candidate) in candidates {
            if !is_extension && candidate.is_adjacent(other) {
                continue;
            }
            if self.hard_mode && (candidate.row == other.row || candidate.col == other.col) {
                continue;
            }
            if u_turn == Some(dir) {
                continue;
            }
            // The new cell must only touch the current dot
            if self.grid.count_neighbors_with(candidate, id) > 1 {
                continue;
            }

            let kind: PointType = if is_extension {
                PointType::Extension
            } else {
                PointType::Core
            };
            self.grid.extend_path(index, end, candidate, kind);
            return true;
        }
        false
    }

    /// Replace the paths by shorter routes between the same dots, until none gets shorter.
    pub(super) fn tighten_paths(&mut self) {
        loop {
            let mut improved: bool = false;
            for index in 0..self.grid.paths.len() {
                let path = &self.grid.paths[index];
                let (Some(head), Some(tail)) = (path.head(), path.tail()) else {
                    continue;
                };
                let current_len: usize = path.len();

                self.grid.unmark_path(index);
                if let Some(route) = shortest_route(self.grid, head, tail)
                    && route.len() < current_len
                {
                    debug!(
                        "Path {} tightened from {current_len} to {} cells",
                        self.grid.paths[index].id,
                        route.len()
                    );
                    self.grid.paths[index].set_route(&route);
                    improved = true;
                }
                self.grid.mark_path(index);
            }
            if !improved {
                break;
            }
        }
    }

    /// Whether all the paths are acceptable.
    ///
    /// Every path has at least three cells and non-adjacent dots. In hard mode, the dots of
    /// non-filler paths are neither in the same row nor in the same column.
    pub(super) fn validate_grid(&self) -> bool {
        self.grid.paths.iter().all(|path| {
            let (Some(head), Some(tail)) = (path.head(), path.tail()) else {
                return false;
            };
            if path.len() < 3 || head.is_adjacent(tail) {
                return false;
            }
            !(self.hard_mode && !path.is_filler && path.is_straight())
        })
    }
}

/// Whether the two points are in diagonally opposite quarters of the grid.
fn in_opposite_quadrants(size: i32, a: Point, b: Point) -> bool {
    let half: i32 = size / 2;
    (a.row < half) != (b.row < half) && (a.col < half) != (b.col < half)
}
