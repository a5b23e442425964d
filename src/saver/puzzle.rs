/*
puzzle.rs

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

//! Save and restore generated puzzles.
//!
//! The saved object is a [`SavedPuzzle`] serialized in JSON format by using [`serde`].
//! It contains the [`Puzzle`] object, its level code, and the time it was saved.

use chrono::{Local, SecondsFormat};
use log::debug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::{File, remove_file};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::PathBuf;

use crate::level_code;
use crate::puzzle::Puzzle;

/// Content of the save file.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SavedPuzzle {
    /// Local time when the puzzle was saved, in RFC 3339 format.
    pub generated_at: String,

    /// Level code for sharing the puzzle.
    pub level_code: String,

    pub puzzle: Puzzle,
}

/// Object to save and restore a puzzle.
pub struct SaverPuzzle {
    /// Path to the save file.
    save_file: PathBuf,
}

impl SaverPuzzle {
    /// Create a [`SaverPuzzle`] object for the given file.
    pub fn new(save_file: PathBuf) -> Self {
        debug!("Puzzle file: {save_file:?}");
        Self { save_file }
    }

    /// Retrieve the saved puzzle.
    ///
    /// Return the [`SavedPuzzle`] object or None if the file does not exist.
    pub fn get_puzzle(&self) -> Result<Option<SavedPuzzle>, Box<dyn Error>> {
        let file: File;
        match File::open(&self.save_file) {
            Ok(f) => file = f,
            Err(error) => match error.kind() {
                ErrorKind::NotFound => return Ok(None),
                _ => return Err(Box::new(error)),
            },
        }
        let reader: BufReader<File> = BufReader::new(file);
        let saved: SavedPuzzle = serde_json::from_reader(reader)?;
        Ok(Some(saved))
    }

    /// Save the provided [`Puzzle`] object.
    pub fn save_puzzle(&self, puzzle: &Puzzle) -> Result<(), Box<dyn Error>> {
        let saved = SavedPuzzle {
            generated_at: Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            level_code: level_code::encode(puzzle),
            puzzle: puzzle.clone(),
        };
        let file: File = File::create(&self.save_file)?;
        let mut writer: BufWriter<File> = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, &saved)?;
        writer.flush()?;
        Ok(())
    }

    /// Delete the save file.
    pub fn delete_save(&self) {
        let _ = remove_file(&self.save_file);
    }
}
