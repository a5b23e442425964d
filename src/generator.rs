/*
generator.rs

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

//! Generate random connect-the-dots puzzles.
//!
//! A puzzle is a [`grid::Grid`] holding a list of [`path::Path`] objects.
//! Each path joins two dots with a thin, non-crossing, rectilinear route, and no two paths share
//! a cell.
//!
//! To generate a puzzle, create an empty [`grid::Grid`], bind it to a
//! [`flow_generator::Generator`] object together with a [`seeded_random::SeededRandom`] object,
//! and call [`flow_generator::Generator::generate`].
//! The same seed, grid size, and mode always give the same puzzle.
//!
//! The generator can fail after too many attempts, for grids that are too small for example.
//! In that case the caller should retry with another seed.

pub mod flow_generator;
pub mod grid;
pub mod packing;
pub mod path;
pub mod point;
pub mod routing;
pub mod seeded_random;
