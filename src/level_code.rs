/*
level_code.rs

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

//! Share puzzles as short text codes.
//!
//! A level code stores the grid size, the dots, and the stones, but not the routes.
//! It has three parts separated by dots, all in base 36 digits:
//!
//! ```text
//! 8.0a07...23.k0004...
//! | |          |
//! | |          +-- stone bitmap, row by row, 5 bits per digit (1 = stone)
//! | +------------- 4 digits per pair: start row, start column, end row, end column
//! +--------------- grid size
//! ```
//!
//! The last digit of the bitmap is padded with zeros on the right.
//! After decoding, [`LevelLayout::hint_routes`] recomputes a route for each pair.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt;

use crate::generator::grid::{Cell, Grid};
use crate::generator::point::Point;
use crate::generator::routing::shortest_route;
use crate::puzzle::{MAX_SIZE, MIN_SIZE, Puzzle};

/// Number of bits stored in one digit of the stone bitmap.
const BITS_PER_DIGIT: usize = 5;

/// Base of all the digits.
const RADIX: u32 = 36;

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum LevelCodeError {
    /// The code does not have the three expected parts.
    Malformed,

    /// The grid size is out of range.
    InvalidSize(u32),

    /// A character is not a valid digit.
    InvalidDigit(char),

    /// A part does not have the expected number of digits.
    Truncated,

    /// A dot is outside the grid.
    CoordinateOutOfRange(Point),

    /// A cell is used by two dots, or by a dot and a stone.
    Overlap(Point),
}

impl fmt::Display for LevelCodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LevelCodeError::Malformed => write!(f, "Malformed level code"),
            LevelCodeError::InvalidSize(s) => write!(
                f,
                "Invalid grid size {s} in level code (must be between {MIN_SIZE} and {MAX_SIZE})"
            ),
            LevelCodeError::InvalidDigit(c) => write!(f, "Invalid character {c:?} in level code"),
            LevelCodeError::Truncated => write!(f, "Truncated level code"),
            LevelCodeError::CoordinateOutOfRange(p) => {
                write!(f, "Dot {p} is outside the grid")
            }
            LevelCodeError::Overlap(p) => write!(f, "Cell {p} is used twice"),
        }
    }
}

impl Error for LevelCodeError {}

/// Puzzle layout rebuilt from a level code.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LevelLayout {
    pub size: usize,

    /// Dots to connect. The pair at index `i` has the ID `i + 1`.
    pub pairs: Vec<(Point, Point)>,

    /// Stones, row by row.
    pub stones: Vec<Point>,
}

impl LevelLayout {
    /// Build the layout of a generated puzzle.
    pub fn from_puzzle(puzzle: &Puzzle) -> Self {
        let mut stones: Vec<Point> = puzzle.stones.clone();
        stones.sort_unstable();
        Self {
            size: puzzle.size,
            pairs: puzzle.pairs.iter().map(|p| (p.start, p.end)).collect(),
            stones,
        }
    }

    /// Grid with the stones and the dots, but no routes.
    pub fn grid(&self) -> Grid {
        let mut grid: Grid = Grid::new(self.size);
        for stone in &self.stones {
            grid.set_cell(*stone, Cell::Stone);
        }
        for (i, (start, end)) in self.pairs.iter().enumerate() {
            grid.set_cell(*start, Cell::Path(i + 1));
            grid.set_cell(*end, Cell::Path(i + 1));
        }
        grid
    }

    /// Compute a shortest route for each pair, to be used as a hint.
    ///
    /// Each route only avoids the stones and the other dots, so two routes can cross.
    /// [`None`] is returned for a pair whose dots cannot be joined.
    pub fn hint_routes(&self) -> Vec<Option<Vec<Point>>> {
        let grid: Grid = self.grid();
        self.pairs
            .iter()
            .map(|(start, end)| shortest_route(&grid, *start, *end))
            .collect()
    }
}

/// Encode a generated puzzle.
pub fn encode(puzzle: &Puzzle) -> String {
    encode_layout(&LevelLayout::from_puzzle(puzzle))
}

/// Encode a puzzle layout.
pub fn encode_layout(layout: &LevelLayout) -> String {
    let mut code: String = String::new();
    code.push(digit(layout.size as u32));
    code.push('.');

    for (start, end) in &layout.pairs {
        for v in [start.row, start.col, end.row, end.col] {
            code.push(digit(v as u32));
        }
    }
    code.push('.');

    let stones: HashSet<Point> = layout.stones.iter().copied().collect();
    let size: i32 = layout.size as i32;
    let bits: Vec<bool> = (0..size)
        .flat_map(|r| (0..size).map(move |c| Point::new(r, c)))
        .map(|p| stones.contains(&p))
        .collect();
    for chunk in bits.chunks(BITS_PER_DIGIT) {
        let mut value: u32 = 0;
        for i in 0..BITS_PER_DIGIT {
            value <<= 1;
            if chunk.get(i).copied().unwrap_or(false) {
                value |= 1;
            }
        }
        code.push(digit(value));
    }
    debug!("Level code: {code}");
    code
}

/// Decode a level code.
///
/// # Errors
///
/// The function returns an error if the code is not well formed, or if the described puzzle is
/// not consistent (dots outside the grid or on stones, for example).
pub fn decode(code: &str) -> Result<LevelLayout, LevelCodeError> {
    let code: String = code.trim().to_lowercase();
    let parts: Vec<&str> = code.split('.').collect();
    let [size_part, pairs_part, stones_part] = parts.as_slice() else {
        return Err(LevelCodeError::Malformed);
    };

    // Grid size
    let mut size_digits = size_part.chars();
    let size: u32 = match (size_digits.next(), size_digits.next()) {
        (Some(c), None) => value(c)?,
        _ => return Err(LevelCodeError::Malformed),
    };
    if !(MIN_SIZE..=MAX_SIZE).contains(&(size as usize)) {
        return Err(LevelCodeError::InvalidSize(size));
    }
    let size: usize = size as usize;

    // Pairs
    let coords: Vec<u32> = pairs_part.chars().map(value).collect::<Result<_, _>>()?;
    if coords.is_empty() {
        return Err(LevelCodeError::Malformed);
    }
    if coords.len() % 4 != 0 {
        return Err(LevelCodeError::Truncated);
    }
    let mut used: HashSet<Point> = HashSet::new();
    let mut pairs: Vec<(Point, Point)> = Vec::with_capacity(coords.len() / 4);
    for c in coords.chunks(4) {
        let start: Point = Point::new(c[0] as i32, c[1] as i32);
        let end: Point = Point::new(c[2] as i32, c[3] as i32);
        for p in [start, end] {
            if p.row as usize >= size || p.col as usize >= size {
                return Err(LevelCodeError::CoordinateOutOfRange(p));
            }
            if !used.insert(p) {
                return Err(LevelCodeError::Overlap(p));
            }
        }
        pairs.push((start, end));
    }

    // Stones
    let cells: usize = size * size;
    if stones_part.len() != cells.div_ceil(BITS_PER_DIGIT) {
        return Err(LevelCodeError::Truncated);
    }
    let mut stones: Vec<Point> = Vec::new();
    let mut index: usize = 0;
    for ch in stones_part.chars() {
        let v: u32 = value(ch)?;
        if v >= 1 << BITS_PER_DIGIT {
            return Err(LevelCodeError::InvalidDigit(ch));
        }
        for bit in (0..BITS_PER_DIGIT).rev() {
            if index < cells && (v >> bit) & 1 == 1 {
                let p: Point = Point::new((index / size) as i32, (index % size) as i32);
                if used.contains(&p) {
                    return Err(LevelCodeError::Overlap(p));
                }
                stones.push(p);
            }
            index += 1;
        }
    }

    Ok(LevelLayout {
        size,
        pairs,
        stones,
    })
}

/// Base 36 digit for a value below 36.
fn digit(v: u32) -> char {
    char::from_digit(v, RADIX).unwrap_or('0')
}

/// Value of a base 36 digit.
fn value(c: char) -> Result<u32, LevelCodeError> {
    c.to_digit(RADIX).ok_or(LevelCodeError::InvalidDigit(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Mode;

    fn layout() -> LevelLayout {
        LevelLayout {
            size: 5,
            pairs: vec![
                (Point::new(0, 0), Point::new(0, 4)),
                (Point::new(2, 0), Point::new(4, 4)),
            ],
            stones: vec![Point::new(1, 2), Point::new(4, 0)],
        }
    }

    #[test]
    fn test_encode_layout() {
        // Cells 7 and 20 are stones: 00000 00100 00000 00000 10000
        assert_eq!(encode_layout(&layout()), "5.00042044.0400g");
    }

    #[test]
    fn test_decode_layout() {
        assert_eq!(decode("5.00042044.0400g").unwrap(), layout());
        assert_eq!(decode("  5.00042044.0400G ").unwrap(), layout());
    }

    #[test]
    fn test_generated_puzzle_code() {
        let puzzle = Puzzle::generate(9, Mode::Normal, Some("SHARE")).unwrap();
        let decoded = decode(&encode(&puzzle)).unwrap();
        assert_eq!(decoded, LevelLayout::from_puzzle(&puzzle));

        // The generated routes exist, so every pair gets a hint
        let hints = decoded.hint_routes();
        assert_eq!(hints.len(), puzzle.pairs.len());
        for (hint, pair) in hints.iter().zip(puzzle.pairs.iter()) {
            let route = hint.as_ref().expect("hint route");
            assert_eq!(route.first(), Some(&pair.start));
            assert_eq!(route.last(), Some(&pair.end));
            assert!(route.len() <= pair.route.len());
        }
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(decode("5.0004"), Err(LevelCodeError::Malformed));
        assert_eq!(decode("5..00000"), Err(LevelCodeError::Malformed));
        assert_eq!(decode("4.0004.0000"), Err(LevelCodeError::InvalidSize(4)));
        assert_eq!(decode("5.000.00000"), Err(LevelCodeError::Truncated));
        assert_eq!(decode("5.0004.0000"), Err(LevelCodeError::Truncated));
        assert_eq!(
            decode("5.0005.00000"),
            Err(LevelCodeError::CoordinateOutOfRange(Point::new(0, 5)))
        );
        assert_eq!(
            decode("5.00040004.00000"),
            Err(LevelCodeError::Overlap(Point::new(0, 0)))
        );
        assert_eq!(
            decode("5.0004.g0000"),
            Err(LevelCodeError::Overlap(Point::new(0, 0)))
        );
        assert_eq!(decode("5.0004.z0000"), Err(LevelCodeError::InvalidDigit('z')));
        assert_eq!(decode("5.00-4.00000"), Err(LevelCodeError::InvalidDigit('-')));
    }

    #[test]
    fn test_hint_routes_avoid_stones_and_dots() {
        let layout = LevelLayout {
            size: 5,
            pairs: vec![
                (Point::new(0, 0), Point::new(0, 2)),
                (Point::new(1, 1), Point::new(3, 3)),
            ],
            stones: vec![Point::new(0, 1)],
        };
        let hints = layout.hint_routes();
        let first = hints[0].as_ref().unwrap();
        assert_eq!(first.len(), 7);
        assert!(!first.contains(&Point::new(0, 1)));
        assert!(!first.contains(&Point::new(1, 1)));
        assert!(hints[1].is_some());

        // Walled in by a stone and another dot
        let layout = LevelLayout {
            size: 5,
            pairs: vec![
                (Point::new(0, 0), Point::new(0, 2)),
                (Point::new(1, 0), Point::new(3, 3)),
            ],
            stones: vec![Point::new(0, 1)],
        };
        assert!(layout.hint_routes()[0].is_none());
    }
}
