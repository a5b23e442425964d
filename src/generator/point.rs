/*
point.rs

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

//! Grid coordinates and orthogonal moves.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a cell in the grid.
///
/// Coordinates are signed so that neighbors of border cells can be computed and then rejected by
/// [`super::grid::Grid::is_valid`].
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub row: i32,
    pub col: i32,
}

impl Point {
    /// Create a [`Point`] object.
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Return the adjacent point in the given direction.
    pub fn step(self, dir: Direction) -> Self {
        let (dr, dc) = dir.delta();
        Self::new(self.row + dr, self.col + dc)
    }

    /// Return the four orthogonal neighbors, in the [`DIRECTIONS`] order.
    pub fn neighbors(self) -> [Point; 4] {
        DIRECTIONS.map(|d| self.step(d))
    }

    /// Manhattan distance between two points.
    pub fn distance(self, other: Point) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }

    /// Whether the two points are orthogonally adjacent.
    pub fn is_adjacent(self, other: Point) -> bool {
        self.distance(other) == 1
    }

    /// Direction of the single step that goes from `self` to `other`, if they are adjacent.
    pub fn direction_to(self, other: Point) -> Option<Direction> {
        match (other.row - self.row, other.col - self.col) {
            (-1, 0) => Some(Direction::Up),
            (1, 0) => Some(Direction::Down),
            (0, -1) => Some(Direction::Left),
            (0, 1) => Some(Direction::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{},{}]", self.row, self.col)
    }
}

/// Orthogonal move between two adjacent cells.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// All the directions, in the order used by every search so that results are reproducible.
pub const DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

impl Direction {
    /// Row and column offsets for the direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Direction that goes back.
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}
