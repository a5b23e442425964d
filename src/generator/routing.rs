/*
routing.rs

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

//! Shortest route between two cells.

use std::collections::VecDeque;

use super::grid::Grid;
use super::point::Point;

/// Return the shortest 4-directional route from `from` to `to`, both included.
///
/// The route only goes through empty cells, except for `to` which can hold any label.
/// The starting cell is not checked.
/// Neighbors are explored in [`super::point::DIRECTIONS`] order, so for a given grid the same
/// route is always returned.
pub fn shortest_route(grid: &Grid, from: Point, to: Point) -> Option<Vec<Point>> {
    if !grid.is_valid(from) || !grid.is_valid(to) {
        return None;
    }
    if from == to {
        return Some(vec![from]);
    }

    let size: usize = grid.size();
    let index = |p: Point| p.row as usize * size + p.col as usize;
    let mut previous: Vec<Option<Point>> = vec![None; size * size];
    let mut visited: Vec<bool> = vec![false; size * size];
    let mut queue: VecDeque<Point> = VecDeque::new();

    visited[index(from)] = true;
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        for n in current.neighbors() {
            if !grid.is_valid(n) || visited[index(n)] {
                continue;
            }
            if n != to && !grid.is_empty(n) {
                continue;
            }
            visited[index(n)] = true;
            previous[index(n)] = Some(current);
            if n == to {
                return Some(rebuild(&previous, index, from, to));
            }
            queue.push_back(n);
        }
    }
    None
}

/// Walk the predecessor links back from `to`.
fn rebuild(
    previous: &[Option<Point>],
    index: impl Fn(Point) -> usize,
    from: Point,
    to: Point,
) -> Vec<Point> {
    let mut route: Vec<Point> = vec![to];
    let mut current: Point = to;
    while current != from {
        match previous[index(current)] {
            Some(p) => {
                route.push(p);
                current = p;
            }
            None => break,
        }
    }
    route.reverse();
    route
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::grid::Cell;

    #[test]
    fn test_straight_route() {
        let g = Grid::new(5);
        let r = shortest_route(&g, Point::new(0, 0), Point::new(0, 3)).unwrap();
        assert_eq!(
            r,
            vec![
                Point::new(0, 0),
                Point::new(0, 1),
                Point::new(0, 2),
                Point::new(0, 3)
            ]
        );
    }

    #[test]
    fn test_route_avoids_occupied_cells() {
        let mut g = Grid::new(3);
        g.set_cell(Point::new(0, 1), Cell::Path(1));
        g.set_cell(Point::new(1, 1), Cell::Path(1));
        let r = shortest_route(&g, Point::new(0, 0), Point::new(0, 2)).unwrap();
        assert_eq!(r.len(), 7);
        assert!(r.iter().all(|p| g.get(*p) == Some(Cell::Empty)));
        for w in r.windows(2) {
            assert!(w[0].is_adjacent(w[1]));
        }
    }

    #[test]
    fn test_destination_may_be_occupied() {
        let mut g = Grid::new(3);
        g.set_cell(Point::new(2, 2), Cell::Path(3));
        let r = shortest_route(&g, Point::new(2, 0), Point::new(2, 2)).unwrap();
        assert_eq!(r.len(), 3);
    }

    #[test]
    fn test_no_route() {
        let mut g = Grid::new(3);
        for r in 0..3 {
            g.set_cell(Point::new(r, 1), Cell::Stone);
        }
        assert!(shortest_route(&g, Point::new(0, 0), Point::new(0, 2)).is_none());
        assert!(shortest_route(&g, Point::new(0, 0), Point::new(0, 7)).is_none());
    }
}
