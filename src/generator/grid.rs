/*
grid.rs

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

//! Board state: cell labels and the list of paths.
//!
//! The cell matrix and the path list are kept consistent by the methods that modify paths:
//! every change to the points of a path is mirrored in the cells in the same call.

use log::debug;
use serde::{Deserialize, Serialize};

use super::path::{End, Path, PointType};
use super::point::Point;

/// Label of a grid cell.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Cell {
    #[default]
    Empty,
    Stone,
    Path(usize),
}

/// Grid object.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Grid {
    /// Number of rows and columns.
    size: usize,

    /// Cell labels, row by row.
    cells: Vec<Cell>,

    /// Paths, in the order exposed to the caller. The path at index `i` has the ID `i + 1` once
    /// generation completes.
    pub paths: Vec<Path>,
}

impl Grid {
    /// Create an empty `size` x `size` grid.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
            paths: Vec::new(),
        }
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the coordinates are inside the grid.
    pub fn is_valid(&self, point: Point) -> bool {
        point.row >= 0
            && point.col >= 0
            && (point.row as usize) < self.size
            && (point.col as usize) < self.size
    }

    fn index(&self, point: Point) -> Option<usize> {
        if self.is_valid(point) {
            Some(point.row as usize * self.size + point.col as usize)
        } else {
            None
        }
    }

    /// Return the cell label, or [`None`] outside the grid.
    pub fn get(&self, point: Point) -> Option<Cell> {
        self.index(point).map(|i| self.cells[i])
    }

    /// Whether the cell is inside the grid and unclaimed.
    pub fn is_empty(&self, point: Point) -> bool {
        self.get(point) == Some(Cell::Empty)
    }

    /// Set the cell label. Coordinates outside the grid are ignored.
    pub fn set_cell(&mut self, point: Point, value: Cell) {
        if let Some(i) = self.index(point) {
            self.cells[i] = value;
        }
    }

    /// Clear all the cells and remove all the paths.
    pub fn reset(&mut self) {
        self.cells.fill(Cell::Empty);
        self.paths.clear();
    }

    /// Clear the cells but keep the paths.
    pub fn clear_cells(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Iterate over all the coordinates, row by row.
    pub fn points(&self) -> impl Iterator<Item = Point> + use<> {
        let size: i32 = self.size as i32;
        (0..size).flat_map(move |r| (0..size).map(move |c| Point::new(r, c)))
    }

    /// Return the empty cells, row by row.
    pub fn empty_cells(&self) -> Vec<Point> {
        self.points().filter(|p| self.is_empty(*p)).collect()
    }

    /// Return the cells labeled as stones, row by row.
    pub fn stones(&self) -> Vec<Point> {
        self.points()
            .filter(|p| self.get(*p) == Some(Cell::Stone))
            .collect()
    }

    /// Turn every empty cell into a stone.
    ///
    /// The generator leaves unclaimed cells empty. Hosts call this method after a successful
    /// generation, before rendering or computing hints.
    pub fn convert_empty_to_stones(&mut self) -> usize {
        let mut count: usize = 0;
        for cell in self.cells.iter_mut().filter(|c| **c == Cell::Empty) {
            *cell = Cell::Stone;
            count += 1;
        }
        debug!("{count} empty cells converted to stones");
        count
    }

    /// Number of neighbors of the point that carry the given path ID.
    pub fn count_neighbors_with(&self, point: Point, id: usize) -> usize {
        point
            .neighbors()
            .iter()
            .filter(|n| self.get(**n) == Some(Cell::Path(id)))
            .count()
    }

    /// Add a path with the next sequential ID and label its cells. Return the new ID.
    pub fn push_path(&mut self, points: &[Point], kind: PointType, is_filler: bool) -> usize {
        let id: usize = self.paths.len() + 1;
        for p in points {
            self.set_cell(*p, Cell::Path(id));
        }
        self.paths.push(Path::new(id, points, kind, is_filler));
        id
    }

    /// Label the cells of the path at the given index with its ID.
    pub fn mark_path(&mut self, index: usize) {
        let id: usize = self.paths[index].id;
        for p in self.paths[index].coordinates() {
            self.set_cell(p, Cell::Path(id));
        }
    }

    /// Clear the cells of the path at the given index. The path itself is kept.
    pub fn unmark_path(&mut self, index: usize) {
        for p in self.paths[index].coordinates() {
            self.set_cell(p, Cell::Empty);
        }
    }

    /// Extend the path at the given index by one point and label the cell.
    pub fn extend_path(&mut self, index: usize, end: End, point: Point, kind: PointType) {
        let id: usize = self.paths[index].id;
        self.paths[index].extend(end, point, kind);
        self.set_cell(point, Cell::Path(id));
    }

    /// Give the paths the IDs `1..=K` in their current order, recolor them, and label the cells.
    pub fn renumber_paths(&mut self) {
        for (i, path) in self.paths.iter_mut().enumerate() {
            path.set_id(i + 1);
        }
        for i in 0..self.paths.len() {
            self.mark_path(i);
        }
    }

    /// Text dump of the cells, one row per line.
    pub fn dump(&self) -> String {
        let mut s: String = String::with_capacity(self.size * (self.size * 3 + 1));
        for r in 0..self.size as i32 {
            for c in 0..self.size as i32 {
                match self.get(Point::new(r, c)) {
                    Some(Cell::Path(id)) => s.push_str(&format!("{id:>3}")),
                    Some(Cell::Stone) => s.push_str("  #"),
                    _ => s.push_str("  ."),
                }
            }
            s.push('\n');
        }
        s
    }
}
