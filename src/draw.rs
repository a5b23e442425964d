/*
draw.rs

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

//! Draw puzzles as text.
//!
//! Dots are drawn with their pair number, stones with `#`, and free cells with `.`.
//! Route cells are drawn with `-`, `|`, or `+` for the turns.

use std::collections::HashMap;

use crate::generator::point::Point;
use crate::puzzle::Puzzle;
use crate::verify::Solution;

/// What to draw.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum View {
    /// Dots and stones only, as given to the player.
    #[default]
    Dots,

    /// Dots, stones, and the routes found by the generator.
    Solution,
}

/// Text drawing of a grid.
#[derive(Debug)]
pub struct Draw {
    size: usize,

    /// Text for the cells that are not free.
    labels: HashMap<Point, String>,
}

impl Draw {
    /// Create an empty drawing.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            labels: HashMap::new(),
        }
    }

    /// Draw a generated puzzle.
    pub fn puzzle(puzzle: &Puzzle, view: View) -> Self {
        let mut draw: Draw = Self::new(puzzle.size);
        draw.stones(&puzzle.stones);
        for pair in &puzzle.pairs {
            match view {
                View::Dots => draw.route(&[pair.start, pair.end], pair.id.to_string()),
                View::Solution => draw.route(&pair.route, pair.id.to_string()),
            }
        }
        draw
    }

    /// Draw the paths submitted by a player over the puzzle dots and stones.
    ///
    /// Paths are labeled with the pair number of their first dot, or `?`.
    pub fn solution(puzzle: &Puzzle, solution: &Solution) -> Self {
        let mut draw: Draw = Self::puzzle(puzzle, View::Dots);
        for path in &solution.paths {
            let label: String = path
                .first()
                .and_then(|p| puzzle.pair_at(*p))
                .map_or_else(|| "?".to_string(), |pair| pair.id.to_string());
            draw.route(path, label);
        }
        draw
    }

    /// Draw stones.
    pub fn stones(&mut self, stones: &[Point]) {
        for stone in stones {
            self.labels.insert(*stone, "#".to_string());
        }
    }

    /// Draw a route. Its two ends get the label, the other cells get a connector.
    pub fn route(&mut self, route: &[Point], label: String) {
        let l: usize = route.len();
        for (k, p) in route.iter().enumerate() {
            if k == 0 || k + 1 == l {
                self.labels.insert(*p, label.clone());
                continue;
            }
            let (prev, next) = (route[k - 1], route[k + 1]);
            let glyph: &str = if prev.row == next.row {
                "-"
            } else if prev.col == next.col {
                "|"
            } else {
                "+"
            };
            self.labels.insert(*p, glyph.to_string());
        }
    }

    /// Return the drawing, one line per row.
    pub fn render(&self) -> String {
        let width: usize = self.labels.values().map(|s| s.len()).max().unwrap_or(1) + 1;
        let mut s: String = String::with_capacity(self.size * (self.size * width + 1));

        for r in 0..self.size as i32 {
            for c in 0..self.size as i32 {
                let label: &str = self
                    .labels
                    .get(&Point::new(r, c))
                    .map_or(".", String::as_str);
                s.push_str(&format!("{label:>width$}"));
            }
            s.push('\n');
        }
        s
    }
}
