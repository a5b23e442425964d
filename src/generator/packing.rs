/*
packing.rs

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

//! Last generation phases: packing the leftover cells and finalizing the paths.

use log::debug;

use super::flow_generator::Generator;
use super::path::{End, Path, PointType};
use super::point::Point;
use super::seeded_random::RandomSource;

/// Candidate merge: index of the path that keeps growing, index of the absorbed path, and
/// whether the absorbed path must be reversed first.
type Merge = (usize, usize, bool);

impl<R: RandomSource> Generator<'_, R> {
    /// Create filler paths in the empty areas. Return the number of paths created.
    ///
    /// For each empty cell, the longest thin walk through empty cells (at most
    /// [`super::flow_generator::GeneratorConfig::void_search_depth`] cells) becomes a filler path
    /// if it has at least three cells.
    /// Remaining L-shaped triples of empty cells are then registered directly.
    pub(super) fn fill_small_voids(&mut self) -> usize {
        let mut created: usize = 0;
        let starts: Vec<Point> = self.grid.points().collect();

        for start in starts {
            if !self.grid.is_empty(start) {
                continue;
            }
            let walk: Vec<Point> = self.longest_walk(start);
            if walk.len() >= 3 {
                let id: usize = self.grid.push_path(&walk, PointType::Extension, true);
                debug!("Filler path {id} from {start} ({} cells)", walk.len());
                created += 1;
            }
        }
        created += self.fill_corners();
        created
    }

    /// Depth-first search of the longest thin walk from the given empty cell.
    fn longest_walk(&self, start: Point) -> Vec<Point> {
        let mut walk: Vec<Point> = vec![start];
        let mut best: Vec<Point> = walk.clone();
        self.extend_walk(&mut walk, &mut best);
        best
    }

    fn extend_walk(&self, walk: &mut Vec<Point>, best: &mut Vec<Point>) {
        if walk.len() > best.len() {
            best.clone_from(walk);
        }
        let depth: usize = self.config.void_search_depth;
        if walk.len() >= depth {
            return;
        }
        let Some(&tip) = walk.last() else {
            return;
        };

        for next in tip.neighbors() {
            if !self.grid.is_empty(next) || walk.contains(&next) {
                continue;
            }
            // Only the current tip may touch the new cell
            let touching: usize = next
                .neighbors()
                .iter()
                .filter(|n| walk.contains(n))
                .count();
            if touching > 1 {
                continue;
            }
            walk.push(next);
            self.extend_walk(walk, best);
            walk.pop();
            if best.len() >= depth {
                return;
            }
        }
    }

    /// Register every L-shaped triple of empty cells found in a 2x2 block as a filler path.
    fn fill_corners(&mut self) -> usize {
        let mut created: usize = 0;
        let last: i32 = self.grid.size() as i32 - 1;

        for r in 0..last {
            for c in 0..last {
                // The block cells, in turning order, so that any three consecutive cells form an L
                let ring: [Point; 4] = [
                    Point::new(r, c),
                    Point::new(r, c + 1),
                    Point::new(r + 1, c + 1),
                    Point::new(r + 1, c),
                ];
                for skip in 0..4 {
                    let corner: [Point; 3] = [1, 2, 3].map(|k| ring[(skip + k) % 4]);
                    if corner.iter().all(|p| self.grid.is_empty(*p)) {
                        let id: usize = self.grid.push_path(&corner, PointType::Extension, true);
                        debug!("Filler corner path {id} at {}", corner[1]);
                        created += 1;
                        break;
                    }
                }
            }
        }
        created
    }

    /// Join paths that continue each other in a straight line. Return the number of merges.
    ///
    /// The resulting path is a filler, because its dots may now share a row or a column.
    pub(super) fn merge_collinear_paths(&mut self) -> usize {
        let mut merges: usize = 0;

        while let Some((keep, absorb, reverse)) = self.find_collinear_pair() {
            let mut absorbed: Path = self.grid.paths.remove(absorb);
            if reverse {
                absorbed.reverse();
            }
            let keep: usize = if absorb < keep { keep - 1 } else { keep };
            debug!(
                "Path {} merged into path {}",
                absorbed.id, self.grid.paths[keep].id
            );
            self.grid.paths[keep].append(&absorbed);
            self.grid.paths[keep].is_filler = true;

            // IDs stay contiguous
            self.grid.clear_cells();
            self.grid.renumber_paths();
            merges += 1;
        }
        merges
    }

    /// Find two paths where the tail of the first one continues straight into the head (or the
    /// tail) of the second one.
    fn find_collinear_pair(&self) -> Option<Merge> {
        let paths: &[Path] = &self.grid.paths;

        for (i, a) in paths.iter().enumerate() {
            let (Some(a_tail), Some(approach)) = (a.tail(), a.step_toward(End::Tail, 0)) else {
                continue;
            };
            for (j, b) in paths.iter().enumerate() {
                if i == j {
                    continue;
                }
                for (b_end, reverse) in [(End::Head, false), (End::Tail, true)] {
                    let (Some(b_dot), Some(b_next)) = (b.end(b_end), b.from_end(b_end, 1)) else {
                        continue;
                    };
                    let joint = a_tail.direction_to(b_dot);
                    let depart = b_dot.direction_to(b_next);
                    if joint == Some(approach)
                        && depart == Some(approach)
                        && merged_is_thin(a, b, reverse)
                    {
                        return Some((i, j, reverse));
                    }
                }
            }
        }
        None
    }

    /// Shuffle the order of the paths and give them new IDs and colors in that order.
    pub(super) fn shuffle_path_ids(&mut self) {
        self.random.shuffle(&mut self.grid.paths);
        self.grid.clear_cells();
        self.grid.renumber_paths();
    }
}

/// Whether joining the two paths gives a path that does not touch itself.
fn merged_is_thin(a: &Path, b: &Path, reverse: bool) -> bool {
    let mut merged: Path = a.clone();
    let mut tail: Path = b.clone();
    if reverse {
        tail.reverse();
    }
    merged.append(&tail);
    merged.is_thin()
}

#[cfg(test)]
mod tests {
    use crate::generator::grid::{Cell, Grid};
    use crate::generator::path::PointType;
    use crate::generator::point::Point;
    use crate::generator::seeded_random::SeededRandom;
    use crate::generator::seeded_random::tests::ScriptedRandom;

    use super::*;

    fn pts(v: &[(i32, i32)]) -> Vec<Point> {
        v.iter().map(|(r, c)| Point::new(*r, *c)).collect()
    }

    #[test]
    fn test_merge_collinear() {
        let mut grid = Grid::new(10);
        grid.push_path(&pts(&[(2, 2), (2, 3), (2, 4)]), PointType::Extension, true);
        grid.push_path(&pts(&[(2, 5), (2, 6), (2, 7)]), PointType::Extension, true);
        let mut generator = Generator::new(&mut grid, SeededRandom::new(1), false);

        assert_eq!(generator.merge_collinear_paths(), 1);
        assert_eq!(generator.grid.paths.len(), 1);
        let path = &generator.grid.paths[0];
        assert_eq!(path.id, 1);
        assert!(path.is_filler);
        assert_eq!(
            path.coordinates(),
            pts(&[(2, 2), (2, 3), (2, 4), (2, 5), (2, 6), (2, 7)])
        );
        for c in 2..8 {
            assert_eq!(generator.grid.get(Point::new(2, c)), Some(Cell::Path(1)));
        }
    }

    #[test]
    fn test_merge_tail_to_tail() {
        let mut grid = Grid::new(10);
        grid.push_path(&pts(&[(1, 1), (2, 1), (3, 1)]), PointType::Core, false);
        grid.push_path(&pts(&[(6, 1), (5, 1), (4, 1)]), PointType::Core, false);
        let mut generator = Generator::new(&mut grid, SeededRandom::new(1), true);

        assert_eq!(generator.merge_collinear_paths(), 1);
        let path = &generator.grid.paths[0];
        assert!(path.is_filler);
        assert_eq!(
            path.coordinates(),
            pts(&[(1, 1), (2, 1), (3, 1), (4, 1), (5, 1), (6, 1)])
        );
        assert!(generator.validate_grid());
    }

    #[test]
    fn test_no_merge_on_turn() {
        let mut grid = Grid::new(10);
        grid.push_path(&pts(&[(2, 2), (2, 3), (2, 4)]), PointType::Core, false);
        grid.push_path(&pts(&[(2, 5), (3, 5), (4, 5)]), PointType::Core, false);
        let mut generator = Generator::new(&mut grid, SeededRandom::new(1), false);
        assert_eq!(generator.merge_collinear_paths(), 0);
        assert_eq!(generator.grid.paths.len(), 2);
    }

    #[test]
    fn test_no_merge_when_touching_itself() {
        // Joining would put (3,2) next to (2,2)
        let mut grid = Grid::new(10);
        grid.push_path(
            &pts(&[(3, 2), (4, 2), (4, 3), (4, 4), (3, 4), (2, 4), (2, 3)]),
            PointType::Core,
            false,
        );
        assert!(grid.paths[0].is_thin());
        grid.push_path(&pts(&[(2, 2), (2, 1), (2, 0)]), PointType::Core, false);
        let mut generator = Generator::new(&mut grid, SeededRandom::new(1), false);
        assert_eq!(generator.merge_collinear_paths(), 0);
    }

    #[test]
    fn test_fill_small_voids() {
        // Only a 1x3 strip and a single cell are free
        let mut grid = Grid::new(3);
        grid.set_cell(Point::new(1, 0), Cell::Stone);
        grid.set_cell(Point::new(1, 1), Cell::Stone);
        grid.set_cell(Point::new(1, 2), Cell::Stone);
        grid.set_cell(Point::new(2, 0), Cell::Stone);
        grid.set_cell(Point::new(2, 1), Cell::Stone);
        let mut generator = Generator::new(&mut grid, SeededRandom::new(1), false);

        assert_eq!(generator.fill_small_voids(), 1);
        let path = &generator.grid.paths[0];
        assert!(path.is_filler);
        assert_eq!(path.coordinates(), pts(&[(0, 0), (0, 1), (0, 2)]));
        assert!(path.extension_len() == path.len());
        assert!(generator.grid.is_empty(Point::new(2, 2)));
    }

    #[test]
    fn test_fill_small_voids_depth() {
        let mut grid = Grid::new(5);
        let mut generator = Generator::new(&mut grid, SeededRandom::new(1), false);
        generator.fill_small_voids();
        for path in &generator.grid.paths {
            assert!(path.len() >= 3 && path.len() <= 6);
            assert!(path.is_thin());
        }
    }

    #[test]
    fn test_fill_corners() {
        let mut grid = Grid::new(2);
        grid.set_cell(Point::new(1, 1), Cell::Stone);
        let mut generator = Generator::new(&mut grid, SeededRandom::new(1), false);
        assert_eq!(generator.fill_corners(), 1);
        let path = &generator.grid.paths[0];
        assert_eq!(path.coordinates(), pts(&[(1, 0), (0, 0), (0, 1)]));
        assert!(!path.is_straight());
    }

    #[test]
    fn test_shuffle_path_ids() {
        let mut grid = Grid::new(6);
        grid.push_path(&pts(&[(0, 0), (0, 1), (0, 2)]), PointType::Core, false);
        grid.push_path(&pts(&[(2, 0), (2, 1), (2, 2)]), PointType::Core, false);
        grid.push_path(&pts(&[(4, 0), (4, 1), (4, 2)]), PointType::Core, false);
        // Always drawing 0 rotates the list: [a, b, c] -> [b, c, a]
        let mut generator = Generator::new(&mut grid, ScriptedRandom::new(&[0.0]), false);
        generator.shuffle_path_ids();

        let heads: Vec<Point> = generator
            .grid
            .paths
            .iter()
            .map(|p| p.head().unwrap())
            .collect();
        assert_eq!(heads, pts(&[(2, 0), (4, 0), (0, 0)]));
        assert_eq!(generator.grid.get(Point::new(0, 1)), Some(Cell::Path(3)));
        assert_eq!(generator.grid.get(Point::new(2, 1)), Some(Cell::Path(1)));
        assert_eq!(generator.grid.paths[2].color.hue, 275.0);
    }
}
