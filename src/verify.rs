/*
verify.rs

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

//! Verify a player's solution.
//!
//! The submitted solution only carries the drawn paths (and optionally the stones).
//! The dots are not taken from the player: the puzzle is generated again from its size, mode,
//! and seed, and the solution is checked against that puzzle.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt;

use crate::generator::point::Point;
use crate::puzzle::{Mode, Puzzle, PuzzleError};

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum VerifyError {
    /// A seed is required to generate the puzzle again.
    MissingSeed,

    /// The puzzle cannot be generated.
    Puzzle(PuzzleError),
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VerifyError::MissingSeed => write!(f, "A seed is required to verify a solution"),
            VerifyError::Puzzle(e) => write!(f, "{e}"),
        }
    }
}

impl Error for VerifyError {}

impl From<PuzzleError> for VerifyError {
    fn from(e: PuzzleError) -> Self {
        VerifyError::Puzzle(e)
    }
}

/// Solution submitted by a player.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Solution {
    /// Drawn paths, each one from a dot to the other dot of the same pair.
    pub paths: Vec<Vec<Point>>,

    /// Stones as seen by the player.
    #[serde(default)]
    pub stones: Option<Vec<Point>>,
}

/// Issue found in a solution. Path numbers are indexes in [`Solution::paths`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Problem {
    TooShort { path: usize },
    OutOfGrid { path: usize, point: Point },
    NotContiguous { path: usize, point: Point },
    OnStone { path: usize, point: Point },
    Crossing { point: Point },
    NotAPair { path: usize },
    PairDrawnTwice { pair: usize },
    StonesMismatch,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Problem::TooShort { path } => write!(f, "Path {path} is too short"),
            Problem::OutOfGrid { path, point } => {
                write!(f, "Path {path} goes outside the grid at {point}")
            }
            Problem::NotContiguous { path, point } => {
                write!(f, "Path {path} jumps to {point}")
            }
            Problem::OnStone { path, point } => {
                write!(f, "Path {path} goes through the stone at {point}")
            }
            Problem::Crossing { point } => write!(f, "Several paths use the cell {point}"),
            Problem::NotAPair { path } => write!(f, "Path {path} does not join two matching dots"),
            Problem::PairDrawnTwice { pair } => write!(f, "Pair {pair} is drawn more than once"),
            Problem::StonesMismatch => write!(f, "The stones do not match the puzzle"),
        }
    }
}

/// Result of the verification.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Verdict {
    /// Every pair is joined and no problem was found.
    pub solved: bool,

    /// Number of pairs joined by a path.
    pub connected: usize,

    /// Number of pairs in the puzzle.
    pub pairs: usize,

    /// Number of cells covered by the paths.
    pub covered: usize,

    /// Number of cells that are not stones.
    pub open_cells: usize,

    pub problems: Vec<Problem>,
}

impl Verdict {
    /// Whether the paths cover all the cells that are not stones.
    pub fn is_complete(&self) -> bool {
        self.covered == self.open_cells
    }
}

/// Puzzle generated again and the verdict for the submitted solution.
#[derive(Debug, Clone)]
pub struct Verification {
    pub puzzle: Puzzle,
    pub verdict: Verdict,
}

/// Generate the puzzle again and check the solution against it.
///
/// # Errors
///
/// The function returns an error if the seed is missing or if the puzzle cannot be generated.
/// Problems in the solution itself are reported in the [`Verdict`].
pub fn verify(
    size: usize,
    mode: Mode,
    seed: &str,
    solution: &Solution,
) -> Result<Verification, VerifyError> {
    let seed: &str = seed.trim();
    if seed.is_empty() {
        return Err(VerifyError::MissingSeed);
    }
    let puzzle: Puzzle = Puzzle::generate(size, mode, Some(seed))?;
    let verdict: Verdict = check_solution(&puzzle, solution);
    info!(
        "Solution for seed {seed}: solved = {}, {}/{} pairs, {} problems",
        verdict.solved,
        verdict.connected,
        verdict.pairs,
        verdict.problems.len()
    );
    Ok(Verification { puzzle, verdict })
}

/// Check a solution against a puzzle.
pub fn check_solution(puzzle: &Puzzle, solution: &Solution) -> Verdict {
    let mut problems: Vec<Problem> = Vec::new();
    let size: i32 = puzzle.size as i32;
    let stones: HashSet<Point> = puzzle.stones.iter().copied().collect();

    if let Some(submitted) = &solution.stones {
        let submitted: HashSet<Point> = submitted.iter().copied().collect();
        if submitted != stones {
            report(&mut problems, Problem::StonesMismatch);
        }
    }

    // Dot cell -> pair ID
    let dots: HashMap<Point, usize> = puzzle
        .pairs
        .iter()
        .flat_map(|p| [(p.start, p.id), (p.end, p.id)])
        .collect();

    let mut used: HashSet<Point> = HashSet::new();
    let mut crossings: HashSet<Point> = HashSet::new();
    let mut joined: HashSet<usize> = HashSet::new();

    for (i, path) in solution.paths.iter().enumerate() {
        let (Some(first), Some(last)) = (path.first(), path.last()) else {
            report(&mut problems, Problem::TooShort { path: i });
            continue;
        };
        if path.len() < 2 {
            report(&mut problems, Problem::TooShort { path: i });
            continue;
        }

        let mut valid: bool = true;
        for (k, p) in path.iter().enumerate() {
            if p.row < 0 || p.col < 0 || p.row >= size || p.col >= size {
                report(&mut problems, Problem::OutOfGrid { path: i, point: *p });
                valid = false;
                break;
            }
            if k > 0 && !path[k - 1].is_adjacent(*p) {
                report(&mut problems, Problem::NotContiguous { path: i, point: *p });
                valid = false;
            }
            if stones.contains(p) {
                report(&mut problems, Problem::OnStone { path: i, point: *p });
                valid = false;
            }
            if !used.insert(*p) {
                if crossings.insert(*p) {
                    report(&mut problems, Problem::Crossing { point: *p });
                }
                valid = false;
            }
            // A path can only go through dots at its ends
            if k > 0 && k + 1 < path.len() && dots.contains_key(p) {
                report(&mut problems, Problem::NotAPair { path: i });
                valid = false;
            }
        }

        match (dots.get(first), dots.get(last)) {
            (Some(a), Some(b)) if a == b && first != last => {
                if !joined.insert(*a) {
                    report(&mut problems, Problem::PairDrawnTwice { pair: *a });
                } else if !valid {
                    joined.remove(a);
                }
            }
            _ => report(&mut problems, Problem::NotAPair { path: i }),
        }
    }

    let open_cells: usize = (puzzle.size * puzzle.size).saturating_sub(stones.len());
    let verdict = Verdict {
        solved: problems.is_empty() && joined.len() == puzzle.pairs.len(),
        connected: joined.len(),
        pairs: puzzle.pairs.len(),
        covered: used.len(),
        open_cells,
        problems,
    };
    debug!("Verdict: {verdict:?}");
    verdict
}

/// Add a problem unless it was already reported.
fn report(problems: &mut Vec<Problem>, problem: Problem) {
    if !problems.contains(&problem) {
        problems.push(problem);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::grid::Grid;
    use crate::generator::path::PointType;

    fn solved_by_generator(puzzle: &Puzzle) -> Solution {
        Solution {
            paths: puzzle.pairs.iter().map(|p| p.route.clone()).collect(),
            stones: Some(puzzle.stones.clone()),
        }
    }

    #[test]
    fn test_generator_solution_is_accepted() {
        let puzzle = Puzzle::generate(7, Mode::Normal, Some("VERIFY")).unwrap();
        let v = verify(7, Mode::Normal, "VERIFY", &solved_by_generator(&puzzle)).unwrap();
        assert!(v.verdict.solved, "{:?}", v.verdict.problems);
        assert!(v.verdict.is_complete());
        assert_eq!(v.verdict.connected, puzzle.pairs.len());
        assert_eq!(v.puzzle.pairs, puzzle.pairs);
    }

    #[test]
    fn test_reversed_paths_are_accepted() {
        let puzzle = Puzzle::generate(6, Mode::Hard, Some("REV")).unwrap();
        let mut solution = solved_by_generator(&puzzle);
        for path in &mut solution.paths {
            path.reverse();
        }
        solution.stones = None;
        assert!(check_solution(&puzzle, &solution).solved);
    }

    #[test]
    fn test_missing_pair() {
        let puzzle = Puzzle::generate(6, Mode::Normal, Some("MISS")).unwrap();
        let mut solution = solved_by_generator(&puzzle);
        solution.paths.pop();
        let verdict = check_solution(&puzzle, &solution);
        assert!(!verdict.solved);
        assert!(verdict.problems.is_empty());
        assert_eq!(verdict.connected, puzzle.pairs.len() - 1);
        assert!(!verdict.is_complete());
    }

    #[test]
    fn test_broken_solutions() {
        let puzzle = Puzzle::generate(6, Mode::Normal, Some("BROKEN")).unwrap();

        // Jump in a path
        let mut solution = solved_by_generator(&puzzle);
        solution.paths[0].remove(1);
        let verdict = check_solution(&puzzle, &solution);
        assert!(!verdict.solved);
        assert!(verdict.problems.contains(&Problem::NotContiguous {
            path: 0,
            point: solution.paths[0][1]
        }));

        // Same path twice
        let mut solution = solved_by_generator(&puzzle);
        solution.paths.push(solution.paths[0].clone());
        let verdict = check_solution(&puzzle, &solution);
        assert!(verdict.problems.contains(&Problem::PairDrawnTwice { pair: 1 }));
        assert!(
            verdict
                .problems
                .iter()
                .any(|p| matches!(p, Problem::Crossing { .. }))
        );

        // Wrong stones
        let mut solution = solved_by_generator(&puzzle);
        solution.stones = Some(vec![Point::new(9, 9)]);
        let verdict = check_solution(&puzzle, &solution);
        assert_eq!(verdict.problems, vec![Problem::StonesMismatch]);

        // Outside the grid
        let solution = Solution {
            paths: vec![vec![Point::new(0, 0), Point::new(-1, 0)]],
            stones: None,
        };
        let verdict = check_solution(&puzzle, &solution);
        assert!(verdict.problems.contains(&Problem::OutOfGrid {
            path: 0,
            point: Point::new(-1, 0)
        }));
    }

    #[test]
    fn test_problems_reported_once() {
        let mut grid = Grid::new(3);
        grid.push_path(
            &[Point::new(0, 0), Point::new(0, 1), Point::new(0, 2)],
            PointType::Core,
            false,
        );
        grid.push_path(
            &[
                Point::new(1, 0),
                Point::new(2, 0),
                Point::new(2, 1),
                Point::new(2, 2),
            ],
            PointType::Core,
            false,
        );
        let puzzle = Puzzle::from_grid(&grid, Mode::Normal, "TEST");

        // Through the other pair's dot and a stone, ending on a free cell
        let solution = Solution {
            paths: vec![vec![
                Point::new(0, 0),
                Point::new(1, 0),
                Point::new(1, 1),
                Point::new(2, 1),
            ]],
            stones: None,
        };
        let verdict = check_solution(&puzzle, &solution);
        assert_eq!(
            verdict.problems,
            vec![
                Problem::NotAPair { path: 0 },
                Problem::OnStone {
                    path: 0,
                    point: Point::new(1, 1)
                },
            ]
        );
        assert!(!verdict.solved);
    }

    #[test]
    fn test_solution_from_json() {
        let json = r#"{"paths": [[{"row": 0, "col": 0}, {"row": 0, "col": 1}]]}"#;
        let solution: Solution = serde_json::from_str(json).unwrap();
        assert_eq!(solution.paths[0].len(), 2);
        assert!(solution.stones.is_none());
    }

    #[test]
    fn test_missing_seed() {
        let solution = Solution::default();
        assert_eq!(
            verify(8, Mode::Normal, "  ", &solution).unwrap_err(),
            VerifyError::MissingSeed
        );
        assert_eq!(
            verify(3, Mode::Normal, "S", &solution).unwrap_err(),
            VerifyError::Puzzle(PuzzleError::InvalidSize(3))
        );
    }
}
