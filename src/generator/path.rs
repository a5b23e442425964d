/*
path.rs

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

//! Path connecting two dots in the grid.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::point::{Direction, Point};

/// Saturation of the path colors, in percent.
pub const COLOR_SATURATION: u8 = 70;

/// Lightness of the path colors, in percent.
pub const COLOR_LIGHTNESS: u8 = 55;

/// Hue rotation between two consecutive path IDs (golden angle).
const GOLDEN_ANGLE: f64 = 137.5;

/// How a point was added to the path.
///
/// - a `Core` point was placed when the path was routed (pairing or tightening).
/// - an `Extension` point was added by a later growing or filling pass.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PointType {
    #[default]
    Core,
    Extension,
}

/// A point in the path with its tag.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct PathPoint {
    pub point: Point,
    pub kind: PointType,
}

/// One of the two ends of a path.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum End {
    Head,
    Tail,
}

impl End {
    /// The other end.
    pub fn other(self) -> Self {
        match self {
            End::Head => End::Tail,
            End::Tail => End::Head,
        }
    }
}

/// HSL color of a path.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Color {
    pub hue: f64,
    pub saturation: u8,
    pub lightness: u8,
}

impl Color {
    /// Color for the given path ID.
    ///
    /// Consecutive IDs are one golden angle apart on the color wheel, which keeps neighbor IDs
    /// visually distinct.
    pub fn from_id(id: usize) -> Self {
        Self {
            hue: ((id.saturating_sub(1)) as f64 * GOLDEN_ANGLE) % 360.0,
            saturation: COLOR_SATURATION,
            lightness: COLOR_LIGHTNESS,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// Path object.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Path {
    /// Path ID. IDs start at 1 and follow the order of the paths in the grid.
    pub id: usize,

    /// Color derived from the ID.
    pub color: Color,

    /// Ordered list of the points. The first and last points are the dots.
    points: Vec<PathPoint>,

    /// Whether the path was created to fill leftover space rather than by the initial pairing.
    pub is_filler: bool,
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.points == other.points
    }
}

impl Path {
    /// Create a [`Path`] object with all the points tagged with the given type.
    pub fn new(id: usize, points: &[Point], kind: PointType, is_filler: bool) -> Self {
        Self {
            id,
            color: Color::from_id(id),
            points: points.iter().map(|p| PathPoint { point: *p, kind }).collect(),
            is_filler,
        }
    }

    /// Change the path ID and its color.
    pub fn set_id(&mut self, id: usize) {
        self.id = id;
        self.color = Color::from_id(id);
    }

    /// Get the number of points in the path.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Number of points added by the expansion of the dots.
    pub fn extension_len(&self) -> usize {
        self.points
            .iter()
            .filter(|p| p.kind == PointType::Extension)
            .count()
    }

    /// Return the coordinates of the points, in order.
    pub fn coordinates(&self) -> Vec<Point> {
        self.points.iter().map(|p| p.point).collect()
    }

    /// Return the point at the given end.
    pub fn end(&self, end: End) -> Option<Point> {
        match end {
            End::Head => self.points.first().map(|p| p.point),
            End::Tail => self.points.last().map(|p| p.point),
        }
    }

    /// Return the first point (dot).
    pub fn head(&self) -> Option<Point> {
        self.end(End::Head)
    }

    /// Return the last point (dot).
    pub fn tail(&self) -> Option<Point> {
        self.end(End::Tail)
    }

    /// Return the point `offset` steps inside the path from the given end.
    ///
    /// An offset of 0 is the end point itself.
    pub fn from_end(&self, end: End, offset: usize) -> Option<Point> {
        let l: usize = self.points.len();
        if offset >= l {
            return None;
        }
        match end {
            End::Head => Some(self.points[offset].point),
            End::Tail => Some(self.points[l - 1 - offset].point),
        }
    }

    /// Direction of the step that arrives at point `offset` when walking toward the given end.
    ///
    /// An offset of 0 gives the direction of the last step before reaching the end point.
    pub fn step_toward(&self, end: End, offset: usize) -> Option<Direction> {
        let to: Point = self.from_end(end, offset)?;
        let from: Point = self.from_end(end, offset + 1)?;
        from.direction_to(to)
    }

    /// Add a point at the given end.
    pub fn extend(&mut self, end: End, point: Point, kind: PointType) {
        let p = PathPoint { point, kind };
        match end {
            End::Head => self.points.insert(0, p),
            End::Tail => self.points.push(p),
        }
    }

    /// Replace the route, tagging every point as [`PointType::Core`].
    pub fn set_route(&mut self, route: &[Point]) {
        self.points = route
            .iter()
            .map(|p| PathPoint {
                point: *p,
                kind: PointType::Core,
            })
            .collect();
    }

    /// Reverse the order of the points.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Append the points of another path at the tail.
    pub fn append(&mut self, other: &Path) {
        self.points.extend_from_slice(&other.points);
    }

    /// Whether the two dots share a row or a column.
    pub fn is_straight(&self) -> bool {
        match (self.head(), self.tail()) {
            (Some(h), Some(t)) => h.row == t.row || h.col == t.col,
            _ => false,
        }
    }

    /// Whether every point touches only its predecessor and successor in the path.
    ///
    /// This rules out branching and paths that run back alongside themselves.
    pub fn is_thin(&self) -> bool {
        let l: usize = self.points.len();
        for i in 0..l {
            for j in (i + 2)..l {
                if self.points[i].point.is_adjacent(self.points[j].point) {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(v: &[(i32, i32)]) -> Vec<Point> {
        v.iter().map(|(r, c)| Point::new(*r, *c)).collect()
    }

    #[test]
    fn test_color_from_id() {
        assert_eq!(Color::from_id(1).hue, 0.0);
        assert_eq!(Color::from_id(2).hue, 137.5);
        assert_eq!(Color::from_id(3).hue, 275.0);
        assert_eq!(Color::from_id(4).hue, 52.5);
        assert_eq!(Color::from_id(2).to_string(), "hsl(137.5, 70%, 55%)");
    }

    #[test]
    fn test_extend_and_ends() {
        let mut p = Path::new(1, &pts(&[(0, 0), (0, 1), (0, 2)]), PointType::Core, false);
        p.extend(End::Head, Point::new(1, 0), PointType::Extension);
        p.extend(End::Tail, Point::new(1, 2), PointType::Extension);
        assert_eq!(p.head(), Some(Point::new(1, 0)));
        assert_eq!(p.tail(), Some(Point::new(1, 2)));
        assert_eq!(p.len(), 5);
        assert_eq!(p.extension_len(), 2);
        assert_eq!(p.step_toward(End::Tail, 0), Some(Direction::Down));
        assert_eq!(p.step_toward(End::Tail, 1), Some(Direction::Right));
        assert_eq!(p.step_toward(End::Head, 0), Some(Direction::Down));
    }

    #[test]
    fn test_thin_and_straight() {
        let p = Path::new(1, &pts(&[(0, 0), (0, 1), (0, 2)]), PointType::Core, false);
        assert!(p.is_thin());
        assert!(p.is_straight());

        // U shape of width one
        let u = Path::new(
            2,
            &pts(&[(0, 0), (0, 1), (1, 1), (1, 0)]),
            PointType::Core,
            false,
        );
        assert!(!u.is_thin());

        let l = Path::new(3, &pts(&[(0, 0), (0, 1), (1, 1)]), PointType::Core, true);
        assert!(l.is_thin());
        assert!(!l.is_straight());
    }
}
